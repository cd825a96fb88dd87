//! Authoritative roster list and its persisted mirror.
//!
//! # Responsibility
//! - Own the ordered in-memory record list.
//! - Persist the full list after every mutation.
//! - Upgrade legacy payloads on load and write the upgraded form back.
//!
//! # Invariants
//! - After `append`/`remove_at` return, storage holds exactly `all()` unless
//!   the write failed (reported through the notifier, never raised).
//! - `average`/`status` from storage are ignored and recomputed.
//! - Out-of-range removal is a silent no-op and performs no write.

use crate::model::record::StudentRecord;
use crate::model::score::coerce_score_text;
use crate::notify::{NoticeKind, Notifier};
use crate::repo::kv_repo::{KeyValueStore, RepoError};
use log::{error, info, warn};
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage key the roster is persisted under.
pub const DEFAULT_STORAGE_KEY: &str = "alunosData";

const LOAD_FAILED_MESSAGE: &str = "Failed to load saved data.";
const SAVE_FAILED_MESSAGE: &str = "Failed to save data.";

// Current field name paired with the name written by older releases.
const NAME_FIELD: (&str, &str) = ("name", "nome");
const SCORE_FIELDS: [(&str, &str); 3] = [
    ("score1", "nota1"),
    ("score2", "nota2"),
    ("score3", "nota3"),
];

/// Failure while mirroring the roster to or from storage.
#[derive(Debug)]
pub enum PersistenceError {
    /// Backend read failed.
    ReadBackend(RepoError),
    /// Stored payload could not be decoded as a roster.
    ReadMalformed(String),
    /// Roster could not be encoded.
    WriteEncode(serde_json::Error),
    /// Backend write failed.
    WriteBackend(RepoError),
}

impl PersistenceError {
    /// Stable error code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ReadBackend(_) => "read_backend_failed",
            Self::ReadMalformed(_) => "read_malformed",
            Self::WriteEncode(_) => "write_encode_failed",
            Self::WriteBackend(_) => "write_backend_failed",
        }
    }
}

impl Display for PersistenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReadBackend(err) => write!(f, "failed to read roster: {err}"),
            Self::ReadMalformed(details) => write!(f, "malformed roster payload: {details}"),
            Self::WriteEncode(err) => write!(f, "failed to encode roster: {err}"),
            Self::WriteBackend(err) => write!(f, "failed to write roster: {err}"),
        }
    }
}

impl Error for PersistenceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ReadBackend(err) | Self::WriteBackend(err) => Some(err),
            Self::WriteEncode(err) => Some(err),
            Self::ReadMalformed(_) => None,
        }
    }
}

/// Ordered roster backed by a key-value store.
pub struct RecordStore<S: KeyValueStore> {
    kv: S,
    key: String,
    records: Vec<StudentRecord>,
}

impl<S: KeyValueStore> RecordStore<S> {
    /// Creates an empty store over `kv` using [`DEFAULT_STORAGE_KEY`].
    ///
    /// Nothing is read until [`RecordStore::load`] is called.
    pub fn new(kv: S) -> Self {
        Self::with_key(kv, DEFAULT_STORAGE_KEY)
    }

    /// Creates an empty store persisting under a custom key.
    pub fn with_key(kv: S, key: impl Into<String>) -> Self {
        Self {
            kv,
            key: key.into(),
            records: Vec::new(),
        }
    }

    /// Replaces the in-memory list with the migrated stored roster.
    ///
    /// Absent or empty payloads leave the list empty and write nothing. A
    /// successfully migrated payload is written straight back. Decoding
    /// failures keep the records migrated so far and are reported through
    /// `notifier`.
    pub fn load(&mut self, notifier: &mut dyn Notifier) {
        self.records.clear();

        match self.read_and_migrate() {
            Ok(Some(migrated)) => {
                info!(
                    "event=records_load module=store status=ok count={migrated} migrated=true"
                );
                self.save(notifier);
            }
            Ok(None) => {
                info!("event=records_load module=store status=ok count=0 migrated=false");
            }
            Err(err) => {
                error!(
                    "event=records_load module=store status=error error_code={} kept={} error={}",
                    err.code(),
                    self.records.len(),
                    err
                );
                notifier.notify(LOAD_FAILED_MESSAGE, NoticeKind::Error);
            }
        }
    }

    /// Writes the full list to storage, reporting failures to `notifier`.
    pub fn save(&mut self, notifier: &mut dyn Notifier) {
        match self.write_all() {
            Ok(()) => {
                info!(
                    "event=records_save module=store status=ok count={}",
                    self.records.len()
                );
            }
            Err(err) => {
                error!(
                    "event=records_save module=store status=error error_code={} error={}",
                    err.code(),
                    err
                );
                notifier.notify(SAVE_FAILED_MESSAGE, NoticeKind::Error);
            }
        }
    }

    /// Appends `record` at the end and persists.
    pub fn append(&mut self, record: StudentRecord, notifier: &mut dyn Notifier) {
        self.records.push(record);
        self.save(notifier);
    }

    /// Removes the record at `position` and persists.
    ///
    /// Returns the removed record, or `None` without touching storage when
    /// `position` is out of range.
    pub fn remove_at(
        &mut self,
        position: usize,
        notifier: &mut dyn Notifier,
    ) -> Option<StudentRecord> {
        if position >= self.records.len() {
            warn!(
                "event=record_remove module=store status=skipped position={position} len={}",
                self.records.len()
            );
            return None;
        }

        let removed = self.records.remove(position);
        self.save(notifier);
        Some(removed)
    }

    /// Returns the current ordered list.
    pub fn all(&self) -> &[StudentRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Storage key this roster is mirrored under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read-only access to the backing store.
    pub fn backend(&self) -> &S {
        &self.kv
    }

    fn read_and_migrate(&mut self) -> Result<Option<usize>, PersistenceError> {
        let raw = self
            .kv
            .get_item(&self.key)
            .map_err(PersistenceError::ReadBackend)?;
        let Some(raw) = raw.filter(|value| !value.is_empty()) else {
            return Ok(None);
        };

        let payload: Value = serde_json::from_str(&raw)
            .map_err(|err| PersistenceError::ReadMalformed(err.to_string()))?;
        let Value::Array(entries) = payload else {
            return Err(PersistenceError::ReadMalformed(
                "expected a list of records".to_string(),
            ));
        };

        for (position, entry) in entries.iter().enumerate() {
            let fields = entry.as_object().ok_or_else(|| {
                PersistenceError::ReadMalformed(format!(
                    "entry {position} is not a record object"
                ))
            })?;
            self.records.push(migrate_entry(fields));
        }

        Ok(Some(self.records.len()))
    }

    fn write_all(&mut self) -> Result<(), PersistenceError> {
        let payload =
            serde_json::to_string(&self.records).map_err(PersistenceError::WriteEncode)?;
        self.kv
            .set_item(&self.key, &payload)
            .map_err(PersistenceError::WriteBackend)
    }
}

/// Upgrades one stored entry to the current record shape.
///
/// Missing or unusable scores become `0`; derived fields are recomputed.
fn migrate_entry(fields: &Map<String, Value>) -> StudentRecord {
    let name = lookup(fields, NAME_FIELD).map_or_else(String::new, coerce_name);
    let [score1, score2, score3] =
        SCORE_FIELDS.map(|names| lookup(fields, names).map_or(0.0, coerce_score));

    StudentRecord::new(name, score1, score2, score3)
}

fn lookup<'a>(
    fields: &'a Map<String, Value>,
    (current, legacy): (&str, &str),
) -> Option<&'a Value> {
    fields.get(current).or_else(|| fields.get(legacy))
}

fn coerce_score(value: &Value) -> f64 {
    match value {
        Value::Number(number) => number
            .as_f64()
            .filter(|score| score.is_finite())
            .unwrap_or(0.0),
        Value::String(text) => coerce_score_text(text),
        _ => 0.0,
    }
}

fn coerce_name(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        _ => String::new(),
    }
}
