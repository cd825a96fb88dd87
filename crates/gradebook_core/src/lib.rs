//! Core domain logic for Gradebook.
//! This crate is the single source of truth for roster invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod notify;
pub mod repo;
pub mod service;
pub mod store;
pub mod view;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::grade::{compute, format_fixed, GradeOutcome, GradePolicy, GradeStatus};
pub use model::record::{StudentRecord, ValidationError};
pub use notify::{Notice, NoticeKind, NoticePhase, NoticeTiming, NotificationSlot, Notifier};
pub use repo::kv_repo::{KeyValueStore, RepoError, RepoResult, SqliteKeyValueStore};
pub use service::roster_service::RosterController;
pub use store::record_store::{PersistenceError, RecordStore, DEFAULT_STORAGE_KEY};
pub use view::ViewRenderer;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
