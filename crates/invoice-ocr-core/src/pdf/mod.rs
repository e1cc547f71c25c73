//! PDF text-layer extraction.
//!
//! Only PDFs with embedded text are supported. Scanned PDFs are rejected
//! with [`PdfError::NoTextLayer`] since pages are never rasterized.

mod extractor;

pub use extractor::PdfExtractor;

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Extract the text layer of a PDF held in memory.
pub fn extract_text_from_bytes(data: &[u8]) -> Result<String> {
    let mut extractor = PdfExtractor::new();
    extractor.load(data)?;
    extractor.extract_text()
}
