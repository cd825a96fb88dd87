//! Roster domain model.
//!
//! # Responsibility
//! - Define the student record and its derived grade fields.
//! - Keep rounding and pass/fail policy in one auditable place.
//!
//! # Invariants
//! - Derived fields are recomputed, never trusted from input or storage.

pub mod grade;
pub mod record;
pub mod score;
