//! End-to-end processing of one uploaded invoice file.

use std::fs;
use std::path::Path;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::error::{InvoiceOcrError, ServiceError};
use crate::invoice::{InvoiceParser, RegexInvoiceParser};
use crate::models::config::AppConfig;
use crate::models::invoice::ExtractionResponse;
use crate::ocr::{probe_image, OcrEngine, TesseractEngine};
use crate::upload::{StagedUpload, UploadGate, UploadKind};

/// Gatekeeper, text acquisition and field extraction in one place.
pub struct InvoiceProcessor<E: OcrEngine = TesseractEngine> {
    gate: UploadGate,
    engine: E,
    parser: RegexInvoiceParser,
}

impl InvoiceProcessor<TesseractEngine> {
    /// Build a processor backed by Tesseract.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            UploadGate::new(&config.upload),
            TesseractEngine::with_config(&config.ocr),
        )
    }
}

impl<E: OcrEngine> InvoiceProcessor<E> {
    pub fn new(gate: UploadGate, engine: E) -> Self {
        Self {
            gate,
            engine,
            parser: RegexInvoiceParser::new(),
        }
    }

    pub fn gate(&self) -> &UploadGate {
        &self.gate
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Process an upload held in memory.
    pub fn process_upload(
        &self,
        filename: &str,
        data: &[u8],
    ) -> Result<ExtractionResponse, ServiceError> {
        let start = Instant::now();
        let kind = self.gate.check(filename, data.len() as u64)?;

        let staged = self
            .gate
            .stage(filename, data)
            .map_err(|e| ServiceError::from(InvoiceOcrError::Io(e)))?;

        let text = match self.acquire_text(kind, &staged) {
            Ok(text) => text,
            Err(e) => {
                warn!("Failed to read text from {}: {}", filename, e);
                return Err(e.into());
            }
        };
        drop(staged);

        let result = self.parser.parse(&text);
        for warning in &result.warnings {
            debug!("{}: {}", filename, warning);
        }

        info!(
            "Processed {} in {}ms ({} of 5 fields found)",
            filename,
            start.elapsed().as_millis(),
            result.record.found_fields()
        );

        Ok(ExtractionResponse {
            filename: filename.to_string(),
            extracted_data: result.record,
        })
    }

    /// Process a file on disk. The extension and size limit are checked before reading.
    pub fn process_path(&self, path: &Path) -> Result<ExtractionResponse, ServiceError> {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        self.gate.check(&filename, 0)?;
        let size = fs::metadata(path).map_err(InvoiceOcrError::Io)?.len();
        self.gate.check(&filename, size)?;

        let data = fs::read(path).map_err(InvoiceOcrError::Io)?;
        self.process_upload(&filename, &data)
    }

    fn acquire_text(&self, kind: UploadKind, staged: &StagedUpload) -> Result<String, InvoiceOcrError> {
        match kind {
            UploadKind::Image => {
                let (width, height) = probe_image(staged.path())?;
                let ocr = self
                    .engine
                    .recognize(staged.path())?
                    .with_image_size(width, height);
                debug!(
                    engine = %ocr.engine,
                    image_size = ?ocr.image_size,
                    elapsed_ms = ocr.processing_time_ms,
                    "OCR finished"
                );
                Ok(ocr.text)
            }
            UploadKind::Pdf => read_pdf_text(staged.path()),
        }
    }
}

#[cfg(feature = "pdf")]
fn read_pdf_text(path: &Path) -> Result<String, InvoiceOcrError> {
    let data = fs::read(path)?;
    Ok(crate::pdf::extract_text_from_bytes(&data)?)
}

#[cfg(not(feature = "pdf"))]
fn read_pdf_text(_path: &Path) -> Result<String, InvoiceOcrError> {
    Err(crate::error::PdfError::Unsupported.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OcrError;
    use crate::models::config::UploadConfig;
    use crate::ocr::OcrResult;
    use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::io::Cursor;
    use std::path::PathBuf;
    use std::str::FromStr;
    use std::sync::Mutex;

    struct MockEngine {
        transcript: Option<String>,
        seen: Mutex<Vec<PathBuf>>,
    }

    impl MockEngine {
        fn returning(text: &str) -> Self {
            Self {
                transcript: Some(text.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                transcript: None,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl OcrEngine for MockEngine {
        fn name(&self) -> &'static str {
            "mock"
        }

        fn is_available(&self) -> bool {
            true
        }

        fn recognize(&self, image_path: &Path) -> Result<OcrResult, OcrError> {
            assert!(image_path.exists());
            self.seen.lock().unwrap().push(image_path.to_path_buf());
            match &self.transcript {
                Some(text) => Ok(OcrResult::new(text.clone(), "mock", 0)),
                None => Err(OcrError::Recognition("engine crashed".to_string())),
            }
        }
    }

    fn png_bytes() -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(8, 8, Rgb([0u8, 0, 0])));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn processor(dir: &Path, engine: MockEngine) -> InvoiceProcessor<MockEngine> {
        let gate = UploadGate::new(&UploadConfig {
            upload_dir: dir.to_path_buf(),
            ..UploadConfig::default()
        });
        InvoiceProcessor::new(gate, engine)
    }

    fn dir_is_empty(dir: &Path) -> bool {
        fs::read_dir(dir).map(|mut d| d.next().is_none()).unwrap_or(true)
    }

    #[test]
    fn test_image_upload_success() {
        let dir = tempfile::tempdir().unwrap();
        let processor = processor(
            dir.path(),
            MockEngine::returning("INVOICE #12345\nDate: 01/01/2023\nTotal: $500.00"),
        );

        let response = processor.process_upload("scan.png", &png_bytes()).unwrap();

        assert_eq!(response.filename, "scan.png");
        assert_eq!(response.extracted_data.invoice_number, Some("12345".to_string()));
        assert_eq!(
            response.extracted_data.total_amount,
            Some(Decimal::from_str("500.00").unwrap())
        );

        let seen = processor.engine().seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(!seen[0].exists());
        assert!(dir_is_empty(dir.path()));
    }

    #[test]
    fn test_ocr_failure_is_processing_error_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let processor = processor(dir.path(), MockEngine::failing());

        let err = processor.process_upload("scan.jpg", &png_bytes()).unwrap_err();

        assert_eq!(err.status_code(), 500);
        assert!(err.to_string().starts_with("Error processing invoice:"));
        assert!(err.to_string().contains("engine crashed"));
        assert!(dir_is_empty(dir.path()));
    }

    #[test]
    fn test_undecodable_image_never_reaches_engine() {
        let dir = tempfile::tempdir().unwrap();
        let processor = processor(dir.path(), MockEngine::returning("unused"));

        let err = processor.process_upload("scan.png", b"garbage").unwrap_err();

        assert!(matches!(err, ServiceError::Processing(_)));
        assert!(processor.engine().seen.lock().unwrap().is_empty());
        assert!(dir_is_empty(dir.path()));
    }

    #[test]
    fn test_rejected_extension_is_not_staged() {
        let dir = tempfile::tempdir().unwrap();
        let uploads = dir.path().join("uploads");
        let processor = processor(&uploads, MockEngine::returning("unused"));

        let err = processor.process_upload("notes.txt", b"hello").unwrap_err();

        assert_eq!(err.status_code(), 400);
        assert!(!uploads.exists());
    }

    #[test]
    fn test_broken_pdf_is_processing_error() {
        let dir = tempfile::tempdir().unwrap();
        let processor = processor(dir.path(), MockEngine::returning("unused"));

        let err = processor.process_upload("invoice.pdf", b"%PDF-garbage").unwrap_err();

        assert_eq!(err.status_code(), 500);
        assert!(processor.engine().seen.lock().unwrap().is_empty());
        assert!(dir_is_empty(dir.path()));
    }

    #[test]
    fn test_process_path() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("receipt.PNG");
        fs::write(&input, png_bytes()).unwrap();

        let uploads = dir.path().join("uploads");
        let processor = processor(&uploads, MockEngine::returning("Vendor: Acme Corp"));
        let response = processor.process_path(&input).unwrap();

        assert_eq!(response.filename, "receipt.PNG");
        assert_eq!(response.extracted_data.vendor, Some("Acme Corp".to_string()));
        assert_eq!(response.extracted_data.raw_text, "Vendor: Acme Corp");
        assert!(dir_is_empty(&uploads));
    }

    #[test]
    fn test_process_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let processor = processor(dir.path(), MockEngine::returning("unused"));
        let err = processor
            .process_path(&dir.path().join("missing.png"))
            .unwrap_err();
        assert!(matches!(err, ServiceError::Processing(_)));
    }

    #[test]
    fn test_missing_path_with_bad_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let processor = processor(dir.path(), MockEngine::returning("unused"));
        let err = processor
            .process_path(&dir.path().join("notes.txt"))
            .unwrap_err();
        assert!(matches!(err, ServiceError::UnsupportedFileType { .. }));
        assert_eq!(err.status_code(), 400);
    }
}
