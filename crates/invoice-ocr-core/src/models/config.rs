//! Configuration structures for the invoice OCR pipeline.
//!
//! Settings come from a JSON file and are then overridden by environment
//! variables. Both are read once at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::InvoiceOcrError;

/// Main configuration for the invoice-ocr pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Admin account.
    pub auth: AuthConfig,

    /// Upload gatekeeping.
    pub upload: UploadConfig,

    /// OCR engine configuration.
    pub ocr: OcrConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// The single admin account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Admin username.
    pub username: String,

    /// Admin password (plain text; hashed when the gate is built).
    pub password: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            password: "password".to_string(),
        }
    }
}

/// Upload gatekeeper configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Accepted file extensions, without the leading dot.
    pub allowed_extensions: Vec<String>,

    /// Directory for temporary copies of uploads.
    pub upload_dir: PathBuf,

    /// Largest accepted upload in bytes.
    pub max_file_size: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            allowed_extensions: ["pdf", "png", "jpg", "jpeg"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            upload_dir: PathBuf::from("uploaded_files"),
            max_file_size: 10 * 1024 * 1024,
        }
    }
}

/// OCR engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Path to (or name of) the tesseract executable.
    pub tesseract_cmd: PathBuf,

    /// Tesseract page segmentation mode.
    pub page_segmentation_mode: u8,

    /// Tesseract language code; engine default when unset.
    pub language: Option<String>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            tesseract_cmd: PathBuf::from("tesseract"),
            // Single column of text of variable sizes.
            page_segmentation_mode: 4,
            language: None,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (e.g. "info", "invoice_ocr_core=debug").
    pub level: String,

    /// Append log lines to this file as well as stderr.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Override settings from the process environment.
    pub fn apply_env(&mut self) -> Result<(), InvoiceOcrError> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Override settings from a variable lookup.
    ///
    /// Recognised variables: `API_USERNAME`, `API_PASSWORD`,
    /// `ALLOWED_EXTENSIONS`, `UPLOAD_DIR`, `MAX_UPLOAD_BYTES`,
    /// `TESSERACT_CMD_PATH`, `TESSERACT_LANG`, `LOG_LEVEL`, `LOG_FILE`.
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<(), InvoiceOcrError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(username) = var("API_USERNAME") {
            self.auth.username = username;
        }
        if let Some(password) = var("API_PASSWORD") {
            self.auth.password = password;
        }
        if let Some(extensions) = var("ALLOWED_EXTENSIONS") {
            self.upload.allowed_extensions = parse_extension_list(&extensions);
        }
        if let Some(dir) = var("UPLOAD_DIR") {
            self.upload.upload_dir = PathBuf::from(dir);
        }
        if let Some(max) = var("MAX_UPLOAD_BYTES") {
            self.upload.max_file_size = max.trim().parse().map_err(|_| {
                InvoiceOcrError::Config(format!("MAX_UPLOAD_BYTES is not a number: {}", max))
            })?;
        }
        if let Some(cmd) = var("TESSERACT_CMD_PATH") {
            self.ocr.tesseract_cmd = PathBuf::from(cmd);
        }
        if let Some(lang) = var("TESSERACT_LANG") {
            self.ocr.language = Some(lang);
        }
        if let Some(level) = var("LOG_LEVEL") {
            self.logging.level = level.to_lowercase();
        }
        if let Some(file) = var("LOG_FILE") {
            self.logging.file = Some(PathBuf::from(file));
        }

        Ok(())
    }

    /// Copy of the configuration that is safe to print.
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        config.auth.password = "********".to_string();
        config
    }
}

/// Split a comma separated extension list ("pdf, .PNG,jpg").
pub fn parse_extension_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
        .filter(|ext| !ext.is_empty())
        .collect()
}
