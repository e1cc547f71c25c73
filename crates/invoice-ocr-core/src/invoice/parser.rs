//! Regex-based invoice parser combining the per-field extractors.

use std::fmt;
use std::time::Instant;

use tracing::debug;

use crate::models::invoice::InvoiceRecord;
use crate::ocr::OcrResult;

use super::rules::{
    DueDateExtractor, ExtractionMatch, FieldExtractor, InvoiceNumberExtractor, IssueDateExtractor,
    TotalAmountExtractor, VendorExtractor,
};

/// Result of invoice extraction.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Extracted invoice data.
    pub record: InvoiceRecord,
    /// Missing-field warnings.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Trait for invoice parsing.
///
/// Parsing never fails: fields that cannot be found are left empty.
pub trait InvoiceParser {
    /// Parse invoice from text.
    fn parse(&self, text: &str) -> ExtractionResult;

    /// Parse invoice from an OCR result.
    fn parse_ocr(&self, ocr_result: &OcrResult) -> ExtractionResult {
        self.parse(&ocr_result.text)
    }
}

/// Invoice parser built on ordered, first-match-wins regex tables.
pub struct RegexInvoiceParser {
    invoice_number: InvoiceNumberExtractor,
    date: IssueDateExtractor,
    due_date: DueDateExtractor,
    vendor: VendorExtractor,
    total_amount: TotalAmountExtractor,
}

impl RegexInvoiceParser {
    /// Create a new parser with default settings.
    pub fn new() -> Self {
        Self {
            invoice_number: InvoiceNumberExtractor::new(),
            date: IssueDateExtractor::new(),
            due_date: DueDateExtractor::new(),
            vendor: VendorExtractor::new(),
            total_amount: TotalAmountExtractor::new(),
        }
    }

    /// Set the maximum vendor name length.
    pub fn with_vendor_max_len(mut self, max_len: usize) -> Self {
        self.vendor = VendorExtractor::new().with_max_len(max_len);
        self
    }

    /// Build the record without timing or warnings.
    pub fn extract_record(&self, text: &str) -> InvoiceRecord {
        let invoice_number = self.invoice_number.extract(text);
        let date = self.date.extract(text);
        let due_date = self.due_date.extract(text);
        let vendor = self.vendor.extract(text);
        let total_amount = self.total_amount.extract(text);

        log_match("invoice_number", &invoice_number);
        log_match("date", &date);
        log_match("due_date", &due_date);
        log_match("vendor", &vendor);
        log_match("total_amount", &total_amount);

        InvoiceRecord {
            invoice_number: invoice_number.map(|m| m.value),
            date: date.map(|m| m.value),
            due_date: due_date.map(|m| m.value),
            vendor: vendor.map(|m| m.value),
            total_amount: total_amount.map(|m| m.value),
            // TODO: parse line items once table regions are available from OCR.
            items: Vec::new(),
            raw_text: text.to_string(),
        }
    }
}

impl Default for RegexInvoiceParser {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceParser for RegexInvoiceParser {
    fn parse(&self, text: &str) -> ExtractionResult {
        let start = Instant::now();

        debug!("Parsing invoice from {} characters of text", text.len());

        let record = self.extract_record(text);
        let warnings = record.validate();

        debug!(
            "Extracted {} of 5 fields ({} warnings)",
            record.found_fields(),
            warnings.len()
        );

        ExtractionResult {
            record,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}

fn log_match<T: fmt::Debug>(field: &str, found: &Option<ExtractionMatch<T>>) {
    match found {
        Some(m) => debug!(
            field,
            pattern = ?m.pattern_index,
            position = ?m.position,
            matched = %m.source,
            value = ?m.value,
            "Field matched"
        ),
        None => debug!(field, "Field not found"),
    }
}

/// Extract structured invoice data from an OCR transcript.
pub fn extract_invoice_data(text: &str) -> InvoiceRecord {
    RegexInvoiceParser::new().extract_record(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    const SAMPLE: &str = "INVOICE #12345\nDate: 01/01/2023\nDue Date: 01/31/2023\nAmount: $500.00\nFrom: Test Company Inc.";

    #[test]
    fn test_parse_sample_invoice() {
        let record = extract_invoice_data(SAMPLE);

        assert_eq!(
            record,
            InvoiceRecord {
                invoice_number: Some("12345".to_string()),
                date: Some("01/01/2023".to_string()),
                due_date: Some("01/31/2023".to_string()),
                vendor: Some("Test Company Inc.".to_string()),
                total_amount: Some(Decimal::from_str("500.00").unwrap()),
                items: Vec::new(),
                raw_text: SAMPLE.to_string(),
            }
        );
    }

    #[test]
    fn test_unlabeled_text_only_has_vendor_fallback() {
        let text = "  Blue Whale Bakery\n12 Harbour Street\nThank you for shopping!";
        let record = extract_invoice_data(text);

        assert_eq!(record.invoice_number, None);
        assert_eq!(record.date, None);
        assert_eq!(record.due_date, None);
        assert_eq!(record.total_amount, None);
        assert_eq!(record.vendor, Some("Blue Whale Bakery".to_string()));
        assert!(record.items.is_empty());
    }

    #[test]
    fn test_empty_text() {
        let record = extract_invoice_data("");
        assert_eq!(record, InvoiceRecord::empty(""));
    }

    #[test]
    fn test_raw_text_passes_through_verbatim() {
        let text = "  \tINV-9 \r\n garbled ~~ text\n";
        assert_eq!(extract_invoice_data(text).raw_text, text);
    }

    #[test]
    fn test_parse_is_idempotent() {
        let parser = RegexInvoiceParser::new();
        let first = parser.parse(SAMPLE);
        let second = parser.parse(SAMPLE);
        assert_eq!(first.record, second.record);
        assert_eq!(first.warnings, second.warnings);
    }

    #[test]
    fn test_warnings_list_missing_fields() {
        let result = RegexInvoiceParser::new().parse("Bill Date: 03/04/2024");
        assert_eq!(result.record.date, Some("03/04/2024".to_string()));
        assert_eq!(
            result.warnings,
            vec![
                "Invoice number not found".to_string(),
                "Total amount not found".to_string(),
            ]
        );
    }

    #[test]
    fn test_items_always_empty() {
        let text = "Invoice #7\nQty Description Price\n2 Widgets 10.00\n1 Gadget 5.00\nTotal: 25.00";
        let record = extract_invoice_data(text);
        assert!(record.items.is_empty());
        assert_eq!(record.total_amount, Some(Decimal::from_str("25.00").unwrap()));
    }

    #[test]
    fn test_parse_ocr_uses_transcript() {
        let ocr = OcrResult::new("Invoice No: A-77", "test", 3);
        let result = RegexInvoiceParser::new().parse_ocr(&ocr);
        assert_eq!(result.record.invoice_number, Some("A-77".to_string()));
    }

    #[test]
    fn test_custom_vendor_length() {
        let record = RegexInvoiceParser::new()
            .with_vendor_max_len(5)
            .extract_record("Vendor: Initech Ltd");
        assert_eq!(record.vendor, Some("Inite".to_string()));
    }
}
