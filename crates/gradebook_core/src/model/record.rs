//! Student record domain model.
//!
//! # Responsibility
//! - Define the canonical record persisted under the roster key.
//! - Define input validation errors raised before a record exists.
//!
//! # Invariants
//! - `average` and `status` always derive from the three scores under the
//!   active `GradePolicy`.
//! - Records carry no identity; position in the roster is the only key.

use crate::model::grade::{compute, GradeStatus};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// One student's grade entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub name: String,
    pub score1: f64,
    pub score2: f64,
    pub score3: f64,
    /// Fixed-point text, e.g. `"8.0"`.
    pub average: String,
    pub status: GradeStatus,
}

impl StudentRecord {
    /// Builds a record and derives `average`/`status` from the scores.
    ///
    /// Does not validate; callers own range checks.
    pub fn new(name: impl Into<String>, score1: f64, score2: f64, score3: f64) -> Self {
        let outcome = compute(score1, score2, score3);
        Self {
            name: name.into(),
            score1,
            score2,
            score3,
            average: outcome.average,
            status: outcome.status,
        }
    }

    /// Returns the three scores in entry order.
    pub fn scores(&self) -> [f64; 3] {
        [self.score1, self.score2, self.score3]
    }

    pub fn is_passing(&self) -> bool {
        self.status == GradeStatus::Passed
    }
}

/// Rejection reason for raw roster input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Name or one of the score fields is empty.
    MissingField,
    /// A score field does not start with a number.
    NotANumber,
    /// A parsed score lies outside `[MIN_SCORE, MAX_SCORE]`.
    OutOfRange,
}

impl ValidationError {
    /// Stable machine-readable code, used in logs.
    pub fn code(self) -> &'static str {
        match self {
            Self::MissingField => "missing-field",
            Self::NotANumber => "not-a-number",
            Self::OutOfRange => "out-of-range",
        }
    }

    /// Human-readable reason shown to the user.
    pub fn user_message(self) -> &'static str {
        match self {
            Self::MissingField => "Please fill in all fields, including score 3.",
            Self::NotANumber => "Scores must be numeric values.",
            Self::OutOfRange => "Scores must be values between 0 and 10.",
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.user_message())
    }
}

impl Error for ValidationError {}
