use gradebook_core::db::open_db_in_memory;
use gradebook_core::{
    GradeStatus, KeyValueStore, NoticeKind, Notifier, RecordStore, RepoError, RepoResult,
    SqliteKeyValueStore, StudentRecord, DEFAULT_STORAGE_KEY,
};
use serde_json::{json, Value};
use std::collections::HashMap;

#[derive(Default)]
struct RecordingNotifier {
    notices: Vec<(String, NoticeKind)>,
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, message: &str, kind: NoticeKind) {
        self.notices.push((message.to_string(), kind));
    }
}

/// In-memory backend that counts writes and can be told to fail reads or writes.
#[derive(Default)]
struct CountingStore {
    items: HashMap<String, String>,
    writes: usize,
    fail_reads: bool,
    fail_writes: bool,
}

impl CountingStore {
    fn seeded(value: &str) -> Self {
        let mut store = Self::default();
        store
            .items
            .insert(DEFAULT_STORAGE_KEY.to_string(), value.to_string());
        store
    }

    fn stored(&self) -> Option<Value> {
        self.items
            .get(DEFAULT_STORAGE_KEY)
            .map(|raw| serde_json::from_str(raw).unwrap())
    }
}

impl KeyValueStore for CountingStore {
    fn get_item(&self, key: &str) -> RepoResult<Option<String>> {
        if self.fail_reads {
            return Err(RepoError::Unavailable("storage disabled".to_string()));
        }
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> RepoResult<()> {
        if self.fail_writes {
            return Err(RepoError::Unavailable("quota exceeded".to_string()));
        }
        self.writes += 1;
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> RepoResult<()> {
        self.items.remove(key);
        Ok(())
    }
}

#[test]
fn load_without_payload_stays_empty_and_writes_nothing() {
    let mut notifier = RecordingNotifier::default();
    let mut store = RecordStore::new(CountingStore::default());

    store.load(&mut notifier);

    assert!(store.is_empty());
    assert_eq!(store.backend().writes, 0);
    assert!(notifier.notices.is_empty());
}

#[test]
fn empty_payload_text_is_treated_as_absent() {
    let mut notifier = RecordingNotifier::default();
    let mut store = RecordStore::new(CountingStore::seeded(""));

    store.load(&mut notifier);

    assert!(store.is_empty());
    assert_eq!(store.backend().writes, 0);
    assert!(notifier.notices.is_empty());
}

#[test]
fn save_then_load_on_fresh_store_roundtrips() {
    let conn = open_db_in_memory().unwrap();
    let mut notifier = RecordingNotifier::default();

    let mut first = RecordStore::new(SqliteKeyValueStore::new(&conn));
    first.load(&mut notifier);
    first.append(StudentRecord::new("Ana", 7.0, 8.0, 9.0), &mut notifier);
    first.append(StudentRecord::new("Bruno", 4.0, 5.0, 3.0), &mut notifier);
    first.append(StudentRecord::new("Carla", 6.5, 5.5, 6.25), &mut notifier);
    let before = first.all().to_vec();

    let mut second = RecordStore::new(SqliteKeyValueStore::new(&conn));
    second.load(&mut notifier);

    assert_eq!(second.all(), before.as_slice());
    assert!(notifier.notices.is_empty());
}

#[test]
fn legacy_entry_without_third_score_is_backfilled_and_repersisted() {
    let legacy = json!([
        {"name": "Ana", "score1": 9, "score2": 9, "average": "9.0", "status": "Passed"}
    ]);
    let mut notifier = RecordingNotifier::default();
    let mut store = RecordStore::new(CountingStore::seeded(&legacy.to_string()));

    store.load(&mut notifier);

    let record = &store.all()[0];
    assert_eq!(record.score3, 0.0);
    assert_eq!(record.average, "6.0");
    assert_eq!(record.status, GradeStatus::Passed);

    assert_eq!(store.backend().writes, 1);
    let stored = store.backend().stored().unwrap();
    assert_eq!(stored[0]["score3"], 0.0);
    assert_eq!(stored[0]["average"], "6.0");
}

#[test]
fn stored_derived_fields_are_never_trusted() {
    let tampered = json!([
        {"name": "Bruno", "score1": 4, "score2": 5, "score3": 3, "average": "9.9", "status": "Passed"}
    ]);
    let mut notifier = RecordingNotifier::default();
    let mut store = RecordStore::new(CountingStore::seeded(&tampered.to_string()));

    store.load(&mut notifier);

    assert_eq!(store.all()[0].average, "4.0");
    assert_eq!(store.all()[0].status, GradeStatus::Failed);
}

#[test]
fn numeric_text_scores_and_legacy_field_names_are_migrated() {
    let legacy = json!([
        {"nome": "Carla", "nota1": "7.5", "nota2": "8", "nota3": "n/a"},
        {"name": "Davi", "score1": "10", "score2": null, "score3": "9abc"}
    ]);
    let mut notifier = RecordingNotifier::default();
    let mut store = RecordStore::new(CountingStore::seeded(&legacy.to_string()));

    store.load(&mut notifier);

    let records = store.all();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].name, "Carla");
    assert_eq!(records[0].scores(), [7.5, 8.0, 0.0]);
    assert_eq!(records[0].average, "5.2");
    assert_eq!(records[1].name, "Davi");
    assert_eq!(records[1].scores(), [10.0, 0.0, 9.0]);

    let stored = store.backend().stored().unwrap();
    assert_eq!(stored[0]["name"], "Carla");
    assert!(stored[0].get("nome").is_none());
}

#[test]
fn load_twice_yields_same_list() {
    let legacy = json!([
        {"name": "Ana", "score1": "7", "score2": 8},
        {"name": "Bruno", "score1": 4, "score2": 5, "score3": 3}
    ]);
    let mut notifier = RecordingNotifier::default();
    let mut store = RecordStore::new(CountingStore::seeded(&legacy.to_string()));

    store.load(&mut notifier);
    let first = store.all().to_vec();
    let first_payload = store.backend().items[DEFAULT_STORAGE_KEY].clone();

    store.load(&mut notifier);

    assert_eq!(store.all(), first.as_slice());
    assert_eq!(store.backend().items[DEFAULT_STORAGE_KEY], first_payload);
}

#[test]
fn malformed_payload_reports_error_and_leaves_list_empty() {
    let mut notifier = RecordingNotifier::default();
    let mut store = RecordStore::new(CountingStore::seeded("{not json"));

    store.load(&mut notifier);

    assert!(store.is_empty());
    assert_eq!(store.backend().writes, 0);
    assert_eq!(notifier.notices.len(), 1);
    assert_eq!(notifier.notices[0].1, NoticeKind::Error);
}

#[test]
fn non_list_payload_is_a_read_error() {
    let mut notifier = RecordingNotifier::default();
    let mut store = RecordStore::new(CountingStore::seeded("{\"name\":\"Ana\"}"));

    store.load(&mut notifier);

    assert!(store.is_empty());
    assert_eq!(notifier.notices.len(), 1);
}

#[test]
fn non_object_entry_keeps_prefix_and_skips_self_heal() {
    let payload = json!([{"name": "Ana", "score1": 7, "score2": 8, "score3": 9}, null]);
    let mut notifier = RecordingNotifier::default();
    let mut store = RecordStore::new(CountingStore::seeded(&payload.to_string()));

    store.load(&mut notifier);

    assert_eq!(store.len(), 1);
    assert_eq!(store.all()[0].name, "Ana");
    assert_eq!(store.backend().writes, 0);
    assert_eq!(notifier.notices.len(), 1);
    assert_eq!(notifier.notices[0].1, NoticeKind::Error);
}

#[test]
fn primitive_entries_are_not_turned_into_records() {
    let mut notifier = RecordingNotifier::default();
    let mut store = RecordStore::new(CountingStore::seeded("[5, \"x\"]"));

    store.load(&mut notifier);

    assert!(store.is_empty());
    assert_eq!(store.backend().writes, 0);
    assert_eq!(notifier.notices.len(), 1);
}

#[test]
fn unreadable_backend_reports_load_failure_and_writes_nothing() {
    let payload = json!([{"name": "Ana", "score1": 7, "score2": 8, "score3": 9}]);
    let mut notifier = RecordingNotifier::default();
    let backend = CountingStore {
        fail_reads: true,
        ..CountingStore::seeded(&payload.to_string())
    };
    let mut store = RecordStore::new(backend);

    store.load(&mut notifier);

    assert!(store.is_empty());
    assert_eq!(store.backend().writes, 0);
    assert_eq!(
        notifier.notices,
        vec![("Failed to load saved data.".to_string(), NoticeKind::Error)]
    );
}

#[test]
fn failed_self_heal_write_keeps_migrated_list() {
    let legacy = json!([{"nome": "Ana", "nota1": 9, "nota2": 9}]);
    let mut notifier = RecordingNotifier::default();
    let backend = CountingStore {
        fail_writes: true,
        ..CountingStore::seeded(&legacy.to_string())
    };
    let mut store = RecordStore::new(backend);

    store.load(&mut notifier);

    assert_eq!(store.len(), 1);
    assert_eq!(store.all()[0].name, "Ana");
    assert_eq!(store.all()[0].average, "6.0");
    assert_eq!(store.backend().writes, 0);
    assert_eq!(store.backend().stored().unwrap()[0]["nome"], "Ana");
    assert_eq!(
        notifier.notices,
        vec![("Failed to save data.".to_string(), NoticeKind::Error)]
    );
}

#[test]
fn append_preserves_order_and_persists_each_time() {
    let mut notifier = RecordingNotifier::default();
    let mut store = RecordStore::new(CountingStore::default());

    store.append(StudentRecord::new("Ana", 7.0, 8.0, 9.0), &mut notifier);
    store.append(StudentRecord::new("Bruno", 4.0, 5.0, 3.0), &mut notifier);

    let names: Vec<&str> = store.all().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["Ana", "Bruno"]);
    assert_eq!(store.backend().writes, 2);

    let stored = store.backend().stored().unwrap();
    assert_eq!(stored.as_array().unwrap().len(), 2);
    assert_eq!(stored[1]["name"], "Bruno");
}

#[test]
fn remove_at_out_of_range_is_silent_noop() {
    let mut notifier = RecordingNotifier::default();
    let mut store = RecordStore::new(CountingStore::default());
    store.append(StudentRecord::new("Ana", 7.0, 8.0, 9.0), &mut notifier);
    let writes_before = store.backend().writes;

    assert!(store.remove_at(1, &mut notifier).is_none());
    assert!(store.remove_at(usize::MAX, &mut notifier).is_none());

    assert_eq!(store.len(), 1);
    assert_eq!(store.backend().writes, writes_before);
    assert!(notifier.notices.is_empty());
}

#[test]
fn remove_at_removes_exactly_one_and_persists() {
    let mut notifier = RecordingNotifier::default();
    let mut store = RecordStore::new(CountingStore::default());
    store.append(StudentRecord::new("Ana", 7.0, 8.0, 9.0), &mut notifier);
    store.append(StudentRecord::new("Bruno", 4.0, 5.0, 3.0), &mut notifier);
    store.append(StudentRecord::new("Carla", 6.0, 6.0, 6.0), &mut notifier);

    let removed = store.remove_at(1, &mut notifier).unwrap();

    assert_eq!(removed.name, "Bruno");
    let names: Vec<&str> = store.all().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["Ana", "Carla"]);
    assert_eq!(store.backend().writes, 4);
    assert_eq!(store.backend().stored().unwrap()[1]["name"], "Carla");
}

#[test]
fn write_failure_is_reported_and_memory_stays_correct() {
    let mut notifier = RecordingNotifier::default();
    let backend = CountingStore {
        fail_writes: true,
        ..CountingStore::default()
    };
    let mut store = RecordStore::new(backend);

    store.append(StudentRecord::new("Ana", 7.0, 8.0, 9.0), &mut notifier);

    assert_eq!(store.len(), 1);
    assert!(store.backend().stored().is_none());
    assert_eq!(
        notifier.notices,
        vec![("Failed to save data.".to_string(), NoticeKind::Error)]
    );
}

#[test]
fn custom_key_isolates_rosters() {
    let conn = open_db_in_memory().unwrap();
    let mut notifier = RecordingNotifier::default();

    let mut term_one = RecordStore::with_key(SqliteKeyValueStore::new(&conn), "term-1");
    term_one.append(StudentRecord::new("Ana", 7.0, 8.0, 9.0), &mut notifier);

    let mut default_roster = RecordStore::new(SqliteKeyValueStore::new(&conn));
    default_roster.load(&mut notifier);

    assert_eq!(term_one.key(), "term-1");
    assert!(default_roster.is_empty());
}
