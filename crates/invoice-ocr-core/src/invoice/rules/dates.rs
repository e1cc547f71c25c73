//! Invoice date and due date extraction.
//!
//! Dates are returned exactly as matched. No calendar validation and no
//! normalization between day-first and year-first layouts.

use super::patterns::{DATE_PATTERNS, DUE_DATE_PATTERNS};
use super::{first_match, non_empty_trimmed, ExtractionMatch, FieldExtractor};

/// Invoice (issue) date extractor.
pub struct IssueDateExtractor;

impl IssueDateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for IssueDateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for IssueDateExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        first_match(&DATE_PATTERNS, text, non_empty_trimmed)
    }
}

/// Payment due date extractor.
pub struct DueDateExtractor;

impl DueDateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DueDateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DueDateExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        first_match(&DUE_DATE_PATTERNS, text, non_empty_trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labeled_invoice_date_wins() {
        let m = IssueDateExtractor::new()
            .extract("Date: 01/01/2020\nInvoice Date: 15/03/2024")
            .unwrap();
        assert_eq!(m.value, "15/03/2024");
        assert_eq!(m.pattern_index, Some(0));
    }

    #[test]
    fn test_generic_day_first() {
        let m = IssueDateExtractor::new()
            .extract("INVOICE #12345\nDate: 01/01/2023\nDue Date: 01/31/2023")
            .unwrap();
        assert_eq!(m.value, "01/01/2023");
        assert_eq!(m.pattern_index, Some(1));
    }

    #[test]
    fn test_year_first() {
        let m = IssueDateExtractor::new().extract("Date: 2023-01-15").unwrap();
        assert_eq!(m.value, "2023-01-15");
        assert_eq!(m.pattern_index, Some(2));
    }

    #[test]
    fn test_dates_are_not_validated() {
        let m = IssueDateExtractor::new().extract("Statement date is 45/13/99").unwrap();
        assert_eq!(m.value, "45/13/99");
    }

    #[test]
    fn test_generic_label_matches_inside_due_date() {
        // "Due Date" contains "Date", and the leftmost match wins.
        let m = IssueDateExtractor::new()
            .extract("Due Date: 01/31/2023\nDate: 01/01/2023")
            .unwrap();
        assert_eq!(m.value, "01/31/2023");
    }

    #[test]
    fn test_due_date_label() {
        let m = DueDateExtractor::new()
            .extract("Date: 01/01/2023\nDue Date: 01/31/2023")
            .unwrap();
        assert_eq!(m.value, "01/31/2023");
        assert_eq!(m.pattern_index, Some(0));
    }

    #[test]
    fn test_due_on() {
        let m = DueDateExtractor::new().extract("Payment due on 5-6-24").unwrap();
        assert_eq!(m.value, "5-6-24");
        assert_eq!(m.pattern_index, Some(1));
    }

    #[test]
    fn test_pay_by() {
        let m = DueDateExtractor::new().extract("Pay by: 12/12/2024").unwrap();
        assert_eq!(m.value, "12/12/2024");
        assert_eq!(m.pattern_index, Some(2));
    }

    #[test]
    fn test_missing_dates() {
        assert!(IssueDateExtractor::new().extract("no dates at all").is_none());
        assert!(DueDateExtractor::new().extract("Date: 01/01/2023").is_none());
    }
}
