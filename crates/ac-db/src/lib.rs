//! Storage layer for the complementary-activity credit tracker.
//!
//! Collections persist as whole JSON documents in a string-keyed table, one
//! row per collection. The core never touches this layer directly; it
//! operates on the materialized `Vec`s this crate loads and saves.
//!
//! # Thread Safety
//!
//! [`Store`] wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! Use one `Store` per thread or serialize access externally.
//!
//! # Serialization
//!
//! Payloads are JSON. `chrono` types serialize as ISO 8601 / RFC 3339 text,
//! so `DateTime` and `NaiveDate` fields round-trip losslessly.

use std::path::Path;

use chrono::{SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use ac_core::model::{Activity, CompletedActivity, Event, Student};

/// Fixed keys, one per persisted collection.
const KEY_ACTIVITIES: &str = "activities";
const KEY_EVENTS: &str = "events";
const KEY_COMPLETIONS: &str = "completions";
const KEY_STUDENTS: &str = "students";

/// Storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// A collection payload failed to (de)serialize.
    #[error("serialization error for collection '{key}': {source}")]
    Serde {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
    /// The activity is still referenced by at least one event.
    #[error("activity {id} is referenced by event '{event_slug}' and cannot be removed")]
    ActivityInUse { id: u64, event_slug: String },
}

/// Collection store backed by a single sqlite file.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Opens a store at the given path, creating it if necessary.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init()?;
        Ok(store)
    }

    /// Opens an in-memory store. Useful for testing.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init()?;
        Ok(store)
    }

    /// Initializes the schema. Idempotent.
    fn init(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS collections (
                key TEXT PRIMARY KEY,
                data TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            ",
        )?;
        Ok(())
    }

    fn load<T: DeserializeOwned>(&self, key: &'static str) -> Result<Vec<T>, StoreError> {
        let data: Option<String> = self
            .conn
            .query_row(
                "SELECT data FROM collections WHERE key = ?",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        match data {
            Some(json) => {
                serde_json::from_str(&json).map_err(|source| StoreError::Serde { key, source })
            }
            None => Ok(Vec::new()),
        }
    }

    fn save<T: Serialize>(&self, key: &'static str, items: &[T]) -> Result<(), StoreError> {
        let json =
            serde_json::to_string(items).map_err(|source| StoreError::Serde { key, source })?;
        let updated_at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        self.conn.execute(
            "
            INSERT INTO collections (key, data, updated_at) VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET data = excluded.data, updated_at = excluded.updated_at
            ",
            params![key, json, updated_at],
        )?;
        Ok(())
    }

    // ========== Activities ==========

    pub fn load_activities(&self) -> Result<Vec<Activity>, StoreError> {
        self.load(KEY_ACTIVITIES)
    }

    pub fn save_activities(&self, activities: &[Activity]) -> Result<(), StoreError> {
        self.save(KEY_ACTIVITIES, activities)
    }

    /// Inserts or replaces an activity by id. An id of 0 gets the next free
    /// id assigned. Returns the stored id.
    pub fn upsert_activity(&self, mut activity: Activity) -> Result<u64, StoreError> {
        let mut activities = self.load_activities()?;
        if activity.id == 0 {
            activity.id = activities.iter().map(|a| a.id).max().unwrap_or(0) + 1;
        }
        let id = activity.id;
        if let Some(existing) = activities.iter_mut().find(|a| a.id == id) {
            *existing = activity;
        } else {
            activities.push(activity);
        }
        self.save_activities(&activities)?;
        Ok(id)
    }

    /// Removes an activity, refusing while any event still references it.
    ///
    /// Returns `false` when no activity with the id exists. Completions for
    /// the removed activity are removed with it.
    pub fn remove_activity(&self, id: u64) -> Result<bool, StoreError> {
        let events = self.load_events()?;
        if let Some(event) = events.iter().find(|e| e.activity_ids.contains(&id)) {
            return Err(StoreError::ActivityInUse {
                id,
                event_slug: event.slug.clone(),
            });
        }

        let mut activities = self.load_activities()?;
        let before = activities.len();
        activities.retain(|a| a.id != id);
        if activities.len() == before {
            return Ok(false);
        }

        let mut completions = self.load_completions()?;
        completions.retain(|c| c.activity_id != id);

        // Both collections change together or not at all; a failure after
        // the first save must not leave dangling completions behind.
        let tx = self.conn.unchecked_transaction()?;
        self.save_activities(&activities)?;
        self.save(KEY_COMPLETIONS, &completions)?;
        tx.commit()?;
        Ok(true)
    }

    // ========== Events ==========

    pub fn load_events(&self) -> Result<Vec<Event>, StoreError> {
        self.load(KEY_EVENTS)
    }

    pub fn save_events(&self, events: &[Event]) -> Result<(), StoreError> {
        self.save(KEY_EVENTS, events)
    }

    /// Adds an event. An id of 0 gets the next free id assigned. Returns
    /// `None` without writing when the id or slug is already taken (slugs
    /// are routing keys and must stay unique), otherwise the stored id.
    pub fn add_event(&self, mut event: Event) -> Result<Option<u64>, StoreError> {
        let mut events = self.load_events()?;
        let taken = events
            .iter()
            .any(|e| e.slug == event.slug || (event.id != 0 && e.id == event.id));
        if taken {
            tracing::debug!(slug = event.slug, "event already exists, skipping insert");
            return Ok(None);
        }
        if event.id == 0 {
            event.id = events.iter().map(|e| e.id).max().unwrap_or(0) + 1;
        }
        let id = event.id;
        events.push(event);
        self.save_events(&events)?;
        Ok(Some(id))
    }

    pub fn find_event_by_slug(&self, slug: &str) -> Result<Option<Event>, StoreError> {
        Ok(self.load_events()?.into_iter().find(|e| e.slug == slug))
    }

    // ========== Completions ==========

    pub fn load_completions(&self) -> Result<Vec<CompletedActivity>, StoreError> {
        self.load(KEY_COMPLETIONS)
    }

    /// Records a completion. A duplicate (student, activity) pair is a
    /// no-op returning `false` — the one-completion-per-pair invariant lives
    /// here, not in the callers.
    pub fn add_completion(&self, completion: CompletedActivity) -> Result<bool, StoreError> {
        let mut completions = self.load_completions()?;
        let duplicate = completions.iter().any(|c| {
            c.student_id == completion.student_id && c.activity_id == completion.activity_id
        });
        if duplicate {
            tracing::debug!(
                student_id = completion.student_id,
                activity_id = completion.activity_id,
                "completion already recorded, skipping insert"
            );
            return Ok(false);
        }
        completions.push(completion);
        self.save(KEY_COMPLETIONS, &completions)?;
        Ok(true)
    }

    // ========== Students ==========

    pub fn load_students(&self) -> Result<Vec<Student>, StoreError> {
        self.load(KEY_STUDENTS)
    }

    /// Adds a student. Returns `false` without writing when the registration
    /// number is already taken. An id of 0 gets the next free id assigned.
    pub fn add_student(&self, mut student: Student) -> Result<bool, StoreError> {
        let mut students = self.load_students()?;
        if students.iter().any(|s| s.registration == student.registration) {
            return Ok(false);
        }
        if student.id == 0 {
            student.id = students.iter().map(|s| s.id).max().unwrap_or(0) + 1;
        }
        students.push(student);
        self.save(KEY_STUDENTS, &students)?;
        Ok(true)
    }

    pub fn find_student(&self, registration: &str) -> Result<Option<Student>, StoreError> {
        Ok(self
            .load_students()?
            .into_iter()
            .find(|s| s.registration == registration))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ac_core::types::CurriculumPolicy;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn activity(id: u64, name: &str) -> Activity {
        Activity {
            id,
            name: name.to_string(),
            description: None,
            start: Utc
                .with_ymd_and_hms(2025, 5, 12, 8, 0, 0)
                .single()
                .expect("valid test timestamp"),
            end: None,
            responsible: String::new(),
            duration: 2.0,
            category: Some("Palestra".to_string()),
        }
    }

    fn event(id: u64, slug: &str, activity_ids: Vec<u64>) -> Event {
        Event {
            id,
            slug: slug.to_string(),
            name: "Semana Acadêmica".to_string(),
            description: String::new(),
            location: String::new(),
            start_date: NaiveDate::from_ymd_opt(2025, 5, 12).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 5, 16).unwrap(),
            activity_ids,
        }
    }

    fn completion(student_id: u64, activity_id: u64) -> CompletedActivity {
        CompletedActivity {
            student_id,
            activity_id,
            proof: Some("certificado.pdf".to_string()),
            completed_at: NaiveDate::from_ymd_opt(2025, 5, 16),
        }
    }

    #[test]
    fn missing_collections_load_empty() {
        let store = Store::open_in_memory().unwrap();
        assert!(store.load_activities().unwrap().is_empty());
        assert!(store.load_events().unwrap().is_empty());
        assert!(store.load_completions().unwrap().is_empty());
        assert!(store.load_students().unwrap().is_empty());
    }

    #[test]
    fn activities_roundtrip_preserves_dates() {
        let store = Store::open_in_memory().unwrap();
        let mut a = activity(1, "Palestra sobre IA");
        a.end = Some(a.start + chrono::Duration::minutes(90));
        store.save_activities(std::slice::from_ref(&a)).unwrap();
        let loaded = store.load_activities().unwrap();
        assert_eq!(loaded, vec![a]);
    }

    #[test]
    fn upsert_assigns_next_id_for_zero() {
        let store = Store::open_in_memory().unwrap();
        store.save_activities(&[activity(3, "existing")]).unwrap();

        let id = store.upsert_activity(activity(0, "new")).unwrap();
        assert_eq!(id, 4);
        assert_eq!(store.load_activities().unwrap().len(), 2);
    }

    #[test]
    fn upsert_replaces_by_id() {
        let store = Store::open_in_memory().unwrap();
        store.upsert_activity(activity(1, "before")).unwrap();
        store.upsert_activity(activity(1, "after")).unwrap();

        let loaded = store.load_activities().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "after");
    }

    #[test]
    fn duplicate_completion_is_noop() {
        let store = Store::open_in_memory().unwrap();
        assert!(store.add_completion(completion(7, 1)).unwrap());
        assert!(!store.add_completion(completion(7, 1)).unwrap());
        // Same activity for another student is fine.
        assert!(store.add_completion(completion(8, 1)).unwrap());
        assert_eq!(store.load_completions().unwrap().len(), 2);
    }

    #[test]
    fn remove_activity_refused_while_referenced() {
        let store = Store::open_in_memory().unwrap();
        store.upsert_activity(activity(1, "palestra")).unwrap();
        store.add_event(event(1, "semana-2025", vec![1])).unwrap();

        let err = store.remove_activity(1).unwrap_err();
        assert!(matches!(err, StoreError::ActivityInUse { id: 1, .. }));
        assert_eq!(store.load_activities().unwrap().len(), 1);
    }

    #[test]
    fn remove_activity_drops_its_completions() {
        let store = Store::open_in_memory().unwrap();
        store.upsert_activity(activity(1, "palestra")).unwrap();
        store.add_completion(completion(7, 1)).unwrap();

        assert!(store.remove_activity(1).unwrap());
        assert!(store.load_activities().unwrap().is_empty());
        assert!(store.load_completions().unwrap().is_empty());
    }

    #[test]
    fn remove_activity_commits_both_collections() {
        let store = Store::open_in_memory().unwrap();
        store.upsert_activity(activity(1, "palestra")).unwrap();
        store.upsert_activity(activity(2, "minicurso")).unwrap();
        store.add_completion(completion(7, 1)).unwrap();
        store.add_completion(completion(7, 2)).unwrap();

        assert!(store.remove_activity(1).unwrap());

        // The transaction must be committed, not left open: subsequent
        // writes go through and both collections reflect the removal.
        let activities = store.load_activities().unwrap();
        assert_eq!(activities.len(), 1);
        assert_eq!(activities[0].id, 2);
        let completions = store.load_completions().unwrap();
        assert_eq!(completions.len(), 1);
        assert_eq!(completions[0].activity_id, 2);
        assert!(store.add_completion(completion(8, 2)).unwrap());
    }

    #[test]
    fn remove_unknown_activity_returns_false() {
        let store = Store::open_in_memory().unwrap();
        assert!(!store.remove_activity(42).unwrap());
    }

    #[test]
    fn add_event_rejects_duplicate_slug() {
        let store = Store::open_in_memory().unwrap();
        assert_eq!(store.add_event(event(1, "semana-2025", vec![])).unwrap(), Some(1));
        assert!(store.add_event(event(2, "semana-2025", vec![])).unwrap().is_none());
        assert_eq!(store.load_events().unwrap().len(), 1);
    }

    #[test]
    fn add_event_assigns_next_id_for_zero() {
        let store = Store::open_in_memory().unwrap();
        store.add_event(event(3, "semana-2025", vec![])).unwrap();

        let id = store.add_event(event(0, "hackathon-2025", vec![])).unwrap();
        assert_eq!(id, Some(4));
        assert_eq!(store.load_events().unwrap().len(), 2);
    }

    #[test]
    fn find_event_by_slug() {
        let store = Store::open_in_memory().unwrap();
        store.add_event(event(1, "semana-2025", vec![1, 2])).unwrap();
        let found = store.find_event_by_slug("semana-2025").unwrap().unwrap();
        assert_eq!(found.id, 1);
        assert!(store.find_event_by_slug("nope").unwrap().is_none());
    }

    #[test]
    fn add_student_rejects_duplicate_registration() {
        let store = Store::open_in_memory().unwrap();
        let student = Student {
            id: 0,
            name: "Ana".to_string(),
            registration: "2021001".to_string(),
            email: String::new(),
            policy: CurriculumPolicy::New,
        };
        assert!(store.add_student(student.clone()).unwrap());
        assert!(!store.add_student(student).unwrap());

        let found = store.find_student("2021001").unwrap().unwrap();
        assert_eq!(found.id, 1);
        assert_eq!(found.name, "Ana");
    }

    #[test]
    fn on_disk_store_persists_across_reopen() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("ac.db");

        {
            let store = Store::open(&path).unwrap();
            store.upsert_activity(activity(1, "palestra")).unwrap();
        }

        let store = Store::open(&path).unwrap();
        assert_eq!(store.load_activities().unwrap().len(), 1);
    }
}
