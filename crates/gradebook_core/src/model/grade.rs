//! Grade calculation policy.
//!
//! # Responsibility
//! - Derive `average` and `status` from three scores.
//! - Own the fixed-point formatting used for stored and displayed averages.
//!
//! # Invariants
//! - `status` is decided on the rounded average, never on the raw mean.
//! - Computation is total: no validation, no side effects.

use serde::{Deserialize, Serialize};

/// Minimum average (inclusive) required to pass.
pub const PASS_THRESHOLD: f64 = 6.0;
/// Decimal digits kept for the stored/displayed average.
pub const AVERAGE_DECIMALS: usize = 1;
/// Lowest accepted score (inclusive).
pub const MIN_SCORE: f64 = 0.0;
/// Highest accepted score (inclusive).
pub const MAX_SCORE: f64 = 10.0;

// Digits inspected when checking whether a value sits exactly on a rounding tie.
const TIE_SCAN_DIGITS: usize = 40;

/// Pass/fail verdict derived from the rounded average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GradeStatus {
    Passed,
    Failed,
}

impl GradeStatus {
    /// Stable wire/display label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Passed => "Passed",
            Self::Failed => "Failed",
        }
    }
}

/// Derived fields produced by [`compute`].
#[derive(Debug, Clone, PartialEq)]
pub struct GradeOutcome {
    /// Mean of the three scores as fixed-point text, e.g. `"8.0"`.
    pub average: String,
    pub status: GradeStatus,
}

/// Rounding and threshold policy for grade derivation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradePolicy {
    pub pass_threshold: f64,
    pub average_decimals: usize,
}

impl Default for GradePolicy {
    fn default() -> Self {
        Self {
            pass_threshold: PASS_THRESHOLD,
            average_decimals: AVERAGE_DECIMALS,
        }
    }
}

impl GradePolicy {
    /// Computes average and status under this policy.
    pub fn compute(&self, score1: f64, score2: f64, score3: f64) -> GradeOutcome {
        let mean = (score1 + score2 + score3) / 3.0;
        let average = format_fixed(mean, self.average_decimals);
        // Compare on the displayed value so text and verdict never disagree.
        let rounded = average.parse::<f64>().unwrap_or(mean);
        let status = if rounded >= self.pass_threshold {
            GradeStatus::Passed
        } else {
            GradeStatus::Failed
        };

        GradeOutcome { average, status }
    }
}

/// Computes average and status with the default policy.
pub fn compute(score1: f64, score2: f64, score3: f64) -> GradeOutcome {
    GradePolicy::default().compute(score1, score2, score3)
}

/// Formats `value` with exactly `decimals` fractional digits.
///
/// Values are rounded to the nearest decimal of that width; exact binary ties
/// (e.g. `6.25` at one digit) round away from zero. Non-finite values render
/// as `Infinity`, `-Infinity` or `NaN`.
pub fn format_fixed(value: f64, decimals: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        let sign = if value.is_sign_negative() { "-" } else { "" };
        return format!("{sign}Infinity");
    }

    if is_exact_tie(value, decimals) {
        let factor = 10f64.powi(decimals as i32);
        // On a tie, `value * factor` is an exact half-integer.
        let away_from_zero = (value * factor).round() / factor;
        return format!("{away_from_zero:.decimals$}");
    }

    format!("{value:.decimals$}")
}

fn is_exact_tie(value: f64, decimals: usize) -> bool {
    let expanded = format!("{:.*}", decimals + TIE_SCAN_DIGITS, value.abs());
    let Some((_, fraction)) = expanded.split_once('.') else {
        return false;
    };
    let mut digits = fraction.chars().skip(decimals);
    digits.next() == Some('5') && digits.all(|digit| digit == '0')
}
