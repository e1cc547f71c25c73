//! Total amount extraction.

use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::warn;

use super::patterns::TOTAL_AMOUNT_PATTERNS;
use super::{first_match, ExtractionMatch, FieldExtractor};

/// Total amount field extractor.
pub struct TotalAmountExtractor;

impl TotalAmountExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TotalAmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for TotalAmountExtractor {
    type Output = ExtractionMatch<Decimal>;

    /// The first label that matches owns the field. An amount too large for
    /// `Decimal` leaves the field empty instead of deferring to a later label.
    fn extract(&self, text: &str) -> Option<Self::Output> {
        let found = first_match(&TOTAL_AMOUNT_PATTERNS, text, |s| Some(parse_amount(s)))?;
        match found.value {
            Some(value) => Some(ExtractionMatch {
                value,
                pattern_index: found.pattern_index,
                position: found.position,
                source: found.source,
            }),
            None => {
                warn!(
                    "Total amount {:?} (pattern {:?}) is out of range, leaving it empty",
                    found.source, found.pattern_index
                );
                None
            }
        }
    }
}

/// Parse an amount with comma thousands separators (e.g. "1,234.56").
///
/// Returns `None` when the value does not fit a `Decimal` (about 29 integer
/// digits) or is not a number at all.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned = s.trim().replace(',', "");
    Decimal::from_str(&cleaned).ok()
}
