//! Invoice number extraction.

use super::patterns::INVOICE_NUMBER_PATTERNS;
use super::{first_match, non_empty_trimmed, ExtractionMatch, FieldExtractor};

/// Invoice number field extractor.
pub struct InvoiceNumberExtractor;

impl InvoiceNumberExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for InvoiceNumberExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for InvoiceNumberExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        first_match(&INVOICE_NUMBER_PATTERNS, text, non_empty_trimmed)
    }
}
