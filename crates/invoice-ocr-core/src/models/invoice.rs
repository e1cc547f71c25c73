//! Invoice data models produced by field extraction.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A line item on an invoice.
///
/// Line-item extraction is not implemented, so records never carry any;
/// the type stays an open JSON object until table parsing exists.
pub type LineItem = serde_json::Map<String, serde_json::Value>;

/// Structured data extracted from one OCR transcript.
///
/// Absent fields mean no pattern matched, never "confirmed empty".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    /// Invoice identification number.
    pub invoice_number: Option<String>,

    /// Invoice date, exactly as it appeared in the text.
    pub date: Option<String>,

    /// Payment due date, exactly as it appeared in the text.
    pub due_date: Option<String>,

    /// Vendor/supplier name, at most 50 characters.
    pub vendor: Option<String>,

    /// Total amount with thousands separators removed.
    #[serde(with = "rust_decimal::serde::float_option", default)]
    pub total_amount: Option<Decimal>,

    /// Line items (always empty).
    #[serde(default)]
    pub items: Vec<LineItem>,

    /// The OCR transcript the record was built from.
    pub raw_text: String,
}

impl InvoiceRecord {
    /// Create a record with no fields set.
    pub fn empty(raw_text: impl Into<String>) -> Self {
        Self {
            invoice_number: None,
            date: None,
            due_date: None,
            vendor: None,
            total_amount: None,
            items: Vec::new(),
            raw_text: raw_text.into(),
        }
    }

    /// Check that the minimum useful fields were found.
    ///
    /// Returns a list of problems, empty when the record looks complete.
    /// A total of zero is reported the same as a missing total.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.invoice_number.is_none() {
            issues.push("Invoice number not found".to_string());
        }

        if self.date.is_none() {
            issues.push("Invoice date not found".to_string());
        }

        if self.total_amount.is_none_or(|amount| amount.is_zero()) {
            issues.push("Total amount not found".to_string());
        }

        issues
    }

    /// Number of scalar fields that were extracted.
    pub fn found_fields(&self) -> usize {
        [
            self.invoice_number.is_some(),
            self.date.is_some(),
            self.due_date.is_some(),
            self.vendor.is_some(),
            self.total_amount.is_some(),
        ]
        .iter()
        .filter(|found| **found)
        .count()
    }
}

/// Response for a processed upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResponse {
    /// Original name of the uploaded file.
    pub filename: String,

    /// Data extracted from the file.
    pub extracted_data: InvoiceRecord,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    #[test]
    fn test_validate_empty_record() {
        let record = InvoiceRecord::empty("");
        assert_eq!(
            record.validate(),
            vec![
                "Invoice number not found".to_string(),
                "Invoice date not found".to_string(),
                "Total amount not found".to_string(),
            ]
        );
        assert_eq!(record.found_fields(), 0);
    }

    #[test]
    fn test_validate_complete_record() {
        let record = InvoiceRecord {
            invoice_number: Some("INV-1".to_string()),
            date: Some("01/01/2023".to_string()),
            total_amount: Some(Decimal::from_str("10.00").unwrap()),
            ..InvoiceRecord::empty("text")
        };
        assert!(record.validate().is_empty());
        assert_eq!(record.found_fields(), 3);
    }

    #[test]
    fn test_validate_zero_total() {
        let record = InvoiceRecord {
            invoice_number: Some("INV-1".to_string()),
            date: Some("01/01/2023".to_string()),
            total_amount: Some(Decimal::from_str("0.00").unwrap()),
            ..InvoiceRecord::empty("Total: 0.00")
        };
        assert_eq!(record.validate(), vec!["Total amount not found".to_string()]);
        assert_eq!(record.found_fields(), 3);
    }

    #[test]
    fn test_serialize_keeps_absent_fields() {
        let record = InvoiceRecord {
            total_amount: Some(Decimal::from_str("1234.56").unwrap()),
            ..InvoiceRecord::empty("Total: $1,234.56")
        };
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["invoice_number"], serde_json::Value::Null);
        assert_eq!(json["vendor"], serde_json::Value::Null);
        assert_eq!(json["total_amount"], serde_json::json!(1234.56));
        assert_eq!(json["items"], serde_json::json!([]));
        assert_eq!(json["raw_text"], "Total: $1,234.56");
    }

    #[test]
    fn test_response_shape() {
        let response = ExtractionResponse {
            filename: "invoice.png".to_string(),
            extracted_data: InvoiceRecord::empty("abc"),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["filename"], "invoice.png");
        assert_eq!(json["extracted_data"]["raw_text"], "abc");
    }
}
