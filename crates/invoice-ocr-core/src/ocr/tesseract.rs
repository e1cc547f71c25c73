//! Tesseract OCR engine.
//!
//! Runs the Tesseract command-line tool and reads the transcript from stdout.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;

use tracing::{debug, info};

use super::{OcrEngine, OcrResult};
use crate::error::OcrError;
use crate::models::config::OcrConfig;

/// OCR engine wrapping the `tesseract` CLI tool.
pub struct TesseractEngine {
    command: PathBuf,
    page_segmentation_mode: u8,
    language: Option<String>,
}

impl TesseractEngine {
    /// Create an engine using `tesseract` from `PATH`.
    pub fn new() -> Self {
        Self::with_config(&OcrConfig::default())
    }

    /// Create an engine from configuration.
    pub fn with_config(config: &OcrConfig) -> Self {
        Self {
            command: config.tesseract_cmd.clone(),
            page_segmentation_mode: config.page_segmentation_mode,
            language: config.language.clone(),
        }
    }

    /// Arguments passed after the executable.
    fn args(&self, image_path: &Path) -> Vec<String> {
        let mut args = vec![
            image_path.to_string_lossy().into_owned(),
            "stdout".to_string(),
            "--psm".to_string(),
            self.page_segmentation_mode.to_string(),
        ];
        if let Some(lang) = &self.language {
            args.push("-l".to_string());
            args.push(lang.clone());
        }
        args
    }

    fn not_found(&self) -> OcrError {
        OcrError::EngineNotAvailable(format!(
            "{} not found (install tesseract-ocr or set TESSERACT_CMD_PATH)",
            self.command.display()
        ))
    }
}

impl Default for TesseractEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl OcrEngine for TesseractEngine {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    fn is_available(&self) -> bool {
        Command::new(&self.command)
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn recognize(&self, image_path: &Path) -> Result<OcrResult, OcrError> {
        let start = Instant::now();
        let args = self.args(image_path);

        debug!("Running {} {}", self.command.display(), args.join(" "));

        let output = match Command::new(&self.command).args(&args).output() {
            Ok(output) => output,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(self.not_found()),
            Err(e) => return Err(OcrError::Io(e)),
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::Recognition(format!(
                "tesseract exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        let elapsed = start.elapsed().as_millis() as u64;

        info!(
            "Tesseract recognized {} characters from {} in {}ms",
            text.len(),
            image_path.display(),
            elapsed
        );

        Ok(OcrResult::new(text, self.name(), elapsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args() {
        let engine = TesseractEngine::new();
        assert_eq!(
            engine.args(Path::new("/tmp/scan.png")),
            vec!["/tmp/scan.png", "stdout", "--psm", "4"]
        );
    }

    #[test]
    fn test_language_args() {
        let config = OcrConfig {
            language: Some("eng+deu".to_string()),
            page_segmentation_mode: 6,
            ..OcrConfig::default()
        };
        let engine = TesseractEngine::with_config(&config);
        assert_eq!(
            engine.args(Path::new("a.jpg")),
            vec!["a.jpg", "stdout", "--psm", "6", "-l", "eng+deu"]
        );
    }

    #[test]
    fn test_missing_binary() {
        let config = OcrConfig {
            tesseract_cmd: PathBuf::from("/nonexistent/bin/tesseract-missing"),
            ..OcrConfig::default()
        };
        let engine = TesseractEngine::with_config(&config);

        assert!(!engine.is_available());
        let err = engine.recognize(Path::new("scan.png")).unwrap_err();
        assert!(matches!(err, OcrError::EngineNotAvailable(_)));
    }
}
