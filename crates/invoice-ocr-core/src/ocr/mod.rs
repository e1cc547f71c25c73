//! OCR engines that turn an invoice image into a text transcript.

mod tesseract;

pub use tesseract::TesseractEngine;

use std::path::Path;

use image::ImageReader;
use serde::{Deserialize, Serialize};

use crate::error::OcrError;

/// Result of OCR processing on an image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrResult {
    /// Full transcript as produced by the engine.
    pub text: String,

    /// Name of the engine that produced the text.
    pub engine: String,

    /// Processing time in milliseconds.
    pub processing_time_ms: u64,

    /// Image dimensions (width, height), when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_size: Option<(u32, u32)>,
}

impl OcrResult {
    pub fn new(text: impl Into<String>, engine: impl Into<String>, processing_time_ms: u64) -> Self {
        Self {
            text: text.into(),
            engine: engine.into(),
            processing_time_ms,
            image_size: None,
        }
    }

    pub fn with_image_size(mut self, width: u32, height: u32) -> Self {
        self.image_size = Some((width, height));
        self
    }
}

/// An OCR engine working on image files.
///
/// Engines hold no per-request state and may be shared across threads.
pub trait OcrEngine: Send + Sync {
    /// Short engine name for logs and metadata.
    fn name(&self) -> &'static str;

    /// Whether the engine can run on this machine.
    fn is_available(&self) -> bool;

    /// Recognize the text in an image file.
    fn recognize(&self, image_path: &Path) -> Result<OcrResult, OcrError>;
}

/// Decode an image to make sure it is readable, returning its dimensions.
///
/// The format is guessed from the file contents rather than the extension.
pub fn probe_image(path: &Path) -> Result<(u32, u32), OcrError> {
    let reader = ImageReader::open(path)?
        .with_guessed_format()
        .map_err(OcrError::Io)?;
    let image = reader
        .decode()
        .map_err(|e| OcrError::InvalidImage(e.to_string()))?;
    Ok((image.width(), image.height()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    #[test]
    fn test_probe_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.png");
        ImageBuffer::from_pixel(12, 7, Rgb([255u8, 255, 255]))
            .save(&path)
            .unwrap();

        assert_eq!(probe_image(&path).unwrap(), (12, 7));
    }

    #[test]
    fn test_probe_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.png");
        std::fs::write(&path, b"definitely not an image").unwrap();

        assert!(matches!(probe_image(&path), Err(OcrError::InvalidImage(_))));
    }

    #[test]
    fn test_ocr_result_builder() {
        let result = OcrResult::new("hello", "tesseract", 12).with_image_size(100, 50);
        assert_eq!(result.text, "hello");
        assert_eq!(result.image_size, Some((100, 50)));
    }
}
