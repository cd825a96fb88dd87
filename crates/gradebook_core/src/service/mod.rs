//! Core use-case services.
//!
//! # Responsibility
//! - Turn user actions into validated store mutations.
//! - Keep CLI/UI layers decoupled from storage and grading details.

pub mod roster_service;
