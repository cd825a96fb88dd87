//! Roster use-case service.
//!
//! # Responsibility
//! - Validate raw form input and build records through the grade policy.
//! - Drive store mutation, re-render and user feedback for each action.
//!
//! # Invariants
//! - Rejected input never reaches the store: no mutation, no write.
//! - Every accepted mutation is followed by exactly one full re-render.
//! - Out-of-range deletion is silent (no render, no notice).

use crate::model::grade::{MAX_SCORE, MIN_SCORE};
use crate::model::record::{StudentRecord, ValidationError};
use crate::model::score::parse_numeric_prefix;
use crate::notify::{NoticeKind, Notifier};
use crate::repo::kv_repo::KeyValueStore;
use crate::store::record_store::RecordStore;
use crate::view::ViewRenderer;
use log::{info, warn};

/// Mediates between raw user input and the record store.
pub struct RosterController<S: KeyValueStore, N: Notifier, V: ViewRenderer> {
    store: RecordStore<S>,
    notifier: N,
    renderer: V,
}

impl<S, N, V> RosterController<S, N, V>
where
    S: KeyValueStore,
    N: Notifier,
    V: ViewRenderer,
{
    /// Loads the roster from `kv` and performs the initial render.
    pub fn open(kv: S, notifier: N, renderer: V) -> Self {
        Self::with_store(RecordStore::new(kv), notifier, renderer)
    }

    /// Binds an unloaded store, loads it, and performs the initial render.
    pub fn with_store(store: RecordStore<S>, notifier: N, renderer: V) -> Self {
        let mut controller = Self {
            store,
            notifier,
            renderer,
        };
        controller.store.load(&mut controller.notifier);
        controller.render();
        controller
    }

    /// Validates raw input and appends the resulting record.
    ///
    /// # Contract
    /// - `raw_name` is trimmed; empty name or score text is `MissingField`.
    /// - Scores use numeric-prefix parsing; no prefix is `NotANumber`.
    /// - Scores outside `[MIN_SCORE, MAX_SCORE]` are `OutOfRange`.
    /// - The outcome is always reported through the notifier.
    pub fn submit(
        &mut self,
        raw_name: &str,
        raw_score1: &str,
        raw_score2: &str,
        raw_score3: &str,
    ) -> Result<StudentRecord, ValidationError> {
        let record = match validate_submission(raw_name, [raw_score1, raw_score2, raw_score3]) {
            Ok(record) => record,
            Err(err) => {
                warn!(
                    "event=record_submit module=service status=error error_code={}",
                    err.code()
                );
                self.notifier.notify(err.user_message(), NoticeKind::Error);
                return Err(err);
            }
        };

        self.store.append(record.clone(), &mut self.notifier);
        info!(
            "event=record_submit module=service status=ok position={} result={}",
            self.store.len() - 1,
            record.status.as_str()
        );
        self.render();
        self.notifier.notify(
            &format!("Student {} registered successfully!", record.name),
            NoticeKind::Success,
        );
        Ok(record)
    }

    /// Deletes the record at `position`; `display_name` is used for feedback.
    ///
    /// Returns whether a record was removed.
    pub fn delete_record(&mut self, position: usize, display_name: &str) -> bool {
        if self.store.remove_at(position, &mut self.notifier).is_none() {
            return false;
        }

        info!("event=record_delete module=service status=ok position={position}");
        self.render();
        self.notifier.notify(
            &format!("Student {display_name} removed successfully."),
            NoticeKind::Info,
        );
        true
    }

    /// Re-renders the full roster.
    pub fn render(&mut self) {
        self.renderer.render_all(self.store.all());
    }

    /// Current ordered roster.
    pub fn records(&self) -> &[StudentRecord] {
        self.store.all()
    }

    pub fn store(&self) -> &RecordStore<S> {
        &self.store
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    pub fn renderer(&self) -> &V {
        &self.renderer
    }
}

/// Runs the three validation stages in order and builds the record.
fn validate_submission(
    raw_name: &str,
    raw_scores: [&str; 3],
) -> Result<StudentRecord, ValidationError> {
    let name = raw_name.trim();
    if name.is_empty() || raw_scores.iter().any(|raw| raw.is_empty()) {
        return Err(ValidationError::MissingField);
    }

    let mut scores = [0.0; 3];
    for (slot, raw) in scores.iter_mut().zip(raw_scores) {
        *slot = parse_numeric_prefix(raw).ok_or(ValidationError::NotANumber)?;
    }

    if scores
        .iter()
        .any(|score| !(MIN_SCORE..=MAX_SCORE).contains(score))
    {
        return Err(ValidationError::OutOfRange);
    }

    let [score1, score2, score3] = scores;
    Ok(StudentRecord::new(name, score1, score2, score3))
}
