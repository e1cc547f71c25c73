//! Ordered regex tables for invoice field extraction.
//!
//! Each table runs from most to least specific. Every pattern is
//! case-insensitive and puts the value in capture group 1.

use lazy_static::lazy_static;
use regex::Regex;

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("built-in pattern must compile"))
        .collect()
}

lazy_static! {
    // Invoice number: "invoice #", "invoice number", "inv no" ...
    pub static ref INVOICE_NUMBER_PATTERNS: Vec<Regex> = compile(&[
        r"(?i)invoice\s*(?:#|number|num|no)?[:\s]*([A-Z0-9\-]+)",
        r"(?i)inv\s*(?:#|number|num|no)?[:\s]*([A-Z0-9\-]+)",
    ]);

    // Invoice date: labeled first, then generic day-first, then year-first
    pub static ref DATE_PATTERNS: Vec<Regex> = compile(&[
        r"(?i)(?:invoice|bill|statement)\s*date\s*(?::|is|of)?[:\s]*(\d{1,2}[/-]\d{1,2}[/-]\d{2,4})",
        r"(?i)date\s*(?::|of|is)?[:\s]*(\d{1,2}[/-]\d{1,2}[/-]\d{2,4})",
        r"(?i)date\s*(?::|of|is)?[:\s]*(\d{2,4}[/-]\d{1,2}[/-]\d{1,2})",
    ]);

    pub static ref DUE_DATE_PATTERNS: Vec<Regex> = compile(&[
        r"(?i)(?:due|payment)\s*date\s*(?::|is)?[:\s]*(\d{1,2}[/-]\d{1,2}[/-]\d{2,4})",
        r"(?i)due\s*(?::|by|on)?[:\s]*(\d{1,2}[/-]\d{1,2}[/-]\d{2,4})",
        r"(?i)(?:payment|pay\s+by)\s*(?::|due|on)?[:\s]*(\d{1,2}[/-]\d{1,2}[/-]\d{2,4})",
    ]);

    // Vendor: "From:" label, vendor-ish label, then any name ending in a corporate suffix
    pub static ref VENDOR_PATTERNS: Vec<Regex> = compile(&[
        r"(?i)from\s*:?\s*([A-Za-z0-9\s,\.]+(?:Inc|LLC|Ltd|Corp|Corporation|Company|Co)?)",
        r"(?i)(?:vendor|supplier|biller)\s*:?\s*([A-Za-z0-9\s,\.]+(?:Inc|LLC|Ltd|Corp|Corporation|Company|Co)?)",
        r"(?i)([A-Za-z0-9\s,\.]+(?:Inc|LLC|Ltd|Corp|Corporation|Company|Co))",
    ]);

    // Total amount: label, optional currency symbol, two decimal places
    pub static ref TOTAL_AMOUNT_PATTERNS: Vec<Regex> = compile(&[
        r"(?i)total\s*(?:amount|payment|due)?[:\s]*[\$£€]?([0-9,]+\.[0-9]{2})",
        r"(?i)amount\s*(?:due|total)?[:\s]*[\$£€]?([0-9,]+\.[0-9]{2})",
        r"(?i)(?:sub)?total\s*(?:due)?[:\s]*[\$£€]?([0-9,]+\.[0-9]{2})",
        r"(?i)balance\s*(?:due)?[:\s]*[\$£€]?([0-9,]+\.[0-9]{2})",
        r"(?i)(?:please\s+)?pay\s*(?:this\s+amount)?[:\s]*[\$£€]?([0-9,]+\.[0-9]{2})",
    ]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_compile() {
        assert_eq!(INVOICE_NUMBER_PATTERNS.len(), 2);
        assert_eq!(DATE_PATTERNS.len(), 3);
        assert_eq!(DUE_DATE_PATTERNS.len(), 3);
        assert_eq!(VENDOR_PATTERNS.len(), 3);
        assert_eq!(TOTAL_AMOUNT_PATTERNS.len(), 5);
    }

    #[test]
    fn test_patterns_are_case_insensitive() {
        assert!(INVOICE_NUMBER_PATTERNS[0].is_match("INVOICE NO: A-1"));
        assert!(DUE_DATE_PATTERNS[1].is_match("DUE BY 02/03/2024"));
        assert!(TOTAL_AMOUNT_PATTERNS[3].is_match("BALANCE DUE: 10.00"));
    }
}
