//! Rule-based field extractors for invoice transcripts.

pub mod amounts;
pub mod dates;
pub mod invoice_number;
pub mod patterns;
pub mod vendor;

pub use amounts::{parse_amount, TotalAmountExtractor};
pub use dates::{DueDateExtractor, IssueDateExtractor};
pub use invoice_number::InvoiceNumberExtractor;
pub use vendor::{VendorExtractor, DEFAULT_VENDOR_MAX_LEN};

use regex::Regex;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;
}

/// A field value together with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Index of the winning pattern in its table; `None` for fallbacks.
    pub pattern_index: Option<usize>,
    /// Position of the whole match in the source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            pattern_index: None,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_pattern(mut self, index: usize) -> Self {
        self.pattern_index = Some(index);
        self
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}

/// Run `patterns` in order and return the first capture that `convert` accepts.
///
/// A pattern whose capture is rejected counts as a non-match and the scan
/// moves on to the next pattern.
pub fn first_match<T, F>(patterns: &[Regex], text: &str, mut convert: F) -> Option<ExtractionMatch<T>>
where
    F: FnMut(&str) -> Option<T>,
{
    patterns.iter().enumerate().find_map(|(index, pattern)| {
        let caps = pattern.captures(text)?;
        let whole = caps.get(0)?;
        let value = convert(caps.get(1)?.as_str())?;
        Some(
            ExtractionMatch::new(value, whole.as_str())
                .with_pattern(index)
                .with_position(whole.start(), whole.end()),
        )
    })
}

/// Trim a capture, treating an all-whitespace capture as no match.
pub(crate) fn non_empty_trimmed(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_match_respects_table_order() {
        let patterns = vec![
            Regex::new(r"b=(\d+)").unwrap(),
            Regex::new(r"a=(\d+)").unwrap(),
        ];
        let m = first_match(&patterns, "a=1 b=2", |s| Some(s.to_string())).unwrap();
        assert_eq!(m.value, "2");
        assert_eq!(m.pattern_index, Some(0));
        assert_eq!(m.position, Some((4, 7)));
        assert_eq!(m.source, "b=2");
    }

    #[test]
    fn test_rejected_capture_falls_through() {
        let patterns = vec![
            Regex::new(r"x=(\w+)").unwrap(),
            Regex::new(r"y=(\w+)").unwrap(),
        ];
        let m = first_match(&patterns, "x=abc y=42", |s| s.parse::<u32>().ok()).unwrap();
        assert_eq!(m.value, 42);
        assert_eq!(m.pattern_index, Some(1));
    }

    #[test]
    fn test_no_match() {
        let patterns = vec![Regex::new(r"z=(\d+)").unwrap()];
        assert!(first_match(&patterns, "nothing here", |s| Some(s.to_string())).is_none());
    }

    #[test]
    fn test_non_empty_trimmed() {
        assert_eq!(non_empty_trimmed("  ACME \n"), Some("ACME".to_string()));
        assert_eq!(non_empty_trimmed(" \n\t"), None);
    }
}
