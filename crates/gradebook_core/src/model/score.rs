//! Lenient numeric parsing for score text.
//!
//! # Responsibility
//! - Turn raw form/storage text into a number using prefix semantics.
//!
//! # Invariants
//! - Leading whitespace is ignored; trailing garbage after a numeric prefix
//!   is ignored (`"7abc"` -> `7`).
//! - Text without a numeric prefix yields `None` (not-a-number).

use once_cell::sync::Lazy;
use regex::Regex;

static NUMERIC_PREFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:Infinity|(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)")
        .expect("valid numeric prefix regex")
});

/// Parses the longest numeric prefix of `text`.
///
/// Returns `None` when no prefix is numeric. `"Infinity"` yields an infinite
/// value; range checks are left to the caller.
pub fn parse_numeric_prefix(text: &str) -> Option<f64> {
    let prefix = NUMERIC_PREFIX_RE.find(text.trim_start())?;
    prefix.as_str().parse::<f64>().ok()
}

/// Parses score text for storage migration: anything unusable becomes `0`.
pub fn coerce_score_text(text: &str) -> f64 {
    parse_numeric_prefix(text)
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}
