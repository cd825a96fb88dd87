//! In-memory roster state mirrored to persistent storage.
//!
//! # Responsibility
//! - Keep the authoritative record list and its persisted copy equivalent.
//! - Migrate stored payloads from older schemas during load.

pub mod record_store;
