//! Vendor name extraction.

use super::patterns::VENDOR_PATTERNS;
use super::{first_match, non_empty_trimmed, ExtractionMatch, FieldExtractor};

/// Longest vendor name kept, in characters.
pub const DEFAULT_VENDOR_MAX_LEN: usize = 50;

/// Vendor field extractor.
///
/// Tries the labeled and suffix patterns first. When none match, the first
/// non-blank line is used, since invoice headers usually lead with the
/// issuer's name. The result is cut to `max_len` characters.
pub struct VendorExtractor {
    max_len: usize,
}

impl VendorExtractor {
    pub fn new() -> Self {
        Self {
            max_len: DEFAULT_VENDOR_MAX_LEN,
        }
    }

    /// Set the truncation length.
    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }

    /// Cut to `max_len` characters, dropping whitespace left at the cut.
    fn truncate(&self, name: &str) -> Option<String> {
        let cut: String = name.chars().take(self.max_len).collect();
        non_empty_trimmed(&cut)
    }
}

impl Default for VendorExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for VendorExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        if let Some(m) = first_match(&VENDOR_PATTERNS, text, non_empty_trimmed) {
            let value = self.truncate(&m.value)?;
            return Some(ExtractionMatch { value, ..m });
        }

        let line = text.lines().map(str::trim).find(|l| !l.is_empty())?;
        Some(ExtractionMatch::new(self.truncate(line)?, line))
    }
}
