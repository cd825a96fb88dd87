//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the string-valued key-value contract the roster persists into.
//! - Isolate SQLite query details from store/service orchestration.
//!
//! # Invariants
//! - Values are opaque text; callers own encoding and decoding.

pub mod kv_repo;
