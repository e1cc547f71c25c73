//! Upload gatekeeping: extension allow-list, size bound and temp staging.
//!
//! A staged upload lives in a [`NamedTempFile`] under the upload directory
//! and is removed when the [`StagedUpload`] is dropped, whichever way the
//! request ends.

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::ServiceError;
use crate::models::config::UploadConfig;

/// How an accepted upload is turned into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    /// Read the embedded text layer.
    Pdf,
    /// Run OCR on the image.
    Image,
}

impl UploadKind {
    fn from_extension(extension: &str) -> Self {
        if extension == "pdf" {
            UploadKind::Pdf
        } else {
            UploadKind::Image
        }
    }
}

/// Accepted file extensions, lowercase and without the leading dot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowedExtensions(Vec<String>);

impl AllowedExtensions {
    pub fn from_list<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list: Vec<String> = Vec::new();
        for ext in extensions {
            let ext = ext.as_ref().trim().trim_start_matches('.').to_lowercase();
            if !ext.is_empty() && !list.contains(&ext) {
                list.push(ext);
            }
        }
        Self(list)
    }

    pub fn contains(&self, extension: &str) -> bool {
        self.0.iter().any(|e| e == extension)
    }
}

impl Default for AllowedExtensions {
    fn default() -> Self {
        Self::from_list(UploadConfig::default().allowed_extensions)
    }
}

impl fmt::Display for AllowedExtensions {
    /// Formats as ".pdf, .png, .jpg, .jpeg".
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dotted: Vec<String> = self.0.iter().map(|e| format!(".{}", e)).collect();
        f.write_str(&dotted.join(", "))
    }
}

/// Lowercased extension of a filename, if it has one.
pub fn file_extension(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
}

/// Checks uploads against the allow-list and size limit, and stages them.
#[derive(Debug, Clone)]
pub struct UploadGate {
    allowed: AllowedExtensions,
    upload_dir: PathBuf,
    max_file_size: u64,
}

impl UploadGate {
    pub fn new(config: &UploadConfig) -> Self {
        Self {
            allowed: AllowedExtensions::from_list(&config.allowed_extensions),
            upload_dir: config.upload_dir.clone(),
            max_file_size: config.max_file_size,
        }
    }

    /// How `filename` would be processed, or `None` if its extension is not allowed.
    pub fn kind_of(&self, filename: &str) -> Option<UploadKind> {
        file_extension(filename)
            .filter(|ext| self.allowed.contains(ext))
            .map(|ext| UploadKind::from_extension(&ext))
    }

    /// Validate an upload before any processing.
    ///
    /// The extension check runs first so a wrong file type is reported even
    /// when the file is also too large.
    pub fn check(&self, filename: &str, size: u64) -> Result<UploadKind, ServiceError> {
        let extension = file_extension(filename).unwrap_or_default();

        if !self.allowed.contains(&extension) {
            warn!("Rejected upload {:?}: extension {:?} not allowed", filename, extension);
            return Err(ServiceError::UnsupportedFileType {
                extension,
                supported: self.allowed.to_string(),
            });
        }

        if size > self.max_file_size {
            warn!(
                "Rejected upload {:?}: {} bytes exceeds {} byte limit",
                filename, size, self.max_file_size
            );
            return Err(ServiceError::FileTooLarge {
                size,
                limit: self.max_file_size,
            });
        }

        Ok(UploadKind::from_extension(&extension))
    }

    /// Write the upload to a temporary file in the upload directory.
    ///
    /// The file keeps the original extension so external tools can sniff it.
    pub fn stage(&self, filename: &str, data: &[u8]) -> io::Result<StagedUpload> {
        fs::create_dir_all(&self.upload_dir)?;

        let suffix = file_extension(filename)
            .map(|ext| format!(".{}", ext))
            .unwrap_or_default();

        let mut file = tempfile::Builder::new()
            .prefix("upload-")
            .suffix(&suffix)
            .tempfile_in(&self.upload_dir)?;
        file.write_all(data)?;
        file.flush()?;

        debug!("Staged {} bytes at {}", data.len(), file.path().display());

        Ok(StagedUpload { file })
    }
}

impl Default for UploadGate {
    fn default() -> Self {
        Self::new(&UploadConfig::default())
    }
}

/// A temporary copy of an upload, deleted on drop.
#[derive(Debug)]
pub struct StagedUpload {
    file: NamedTempFile,
}

impl StagedUpload {
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}
