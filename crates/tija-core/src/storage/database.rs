//! SQLite storage for tasks, finished focus sessions and tracker state.
//!
//! Tasks are stored as JSON documents keyed by id, so the lenient record
//! decoding in [`Task`] applies to rows written by older versions too.
//! A `kv` table holds small blobs such as the persisted tracker state.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use super::{data_dir, migrations};
use crate::error::{CoreError, DatabaseError, Result};
use crate::focus::{FocusSession, TrackerState};
use crate::task::{Task, TaskUpdate};

/// kv key holding the serialized [`TrackerState`].
pub const TRACKER_STATE_KEY: &str = "focus_tracker_state";

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open `<data_dir>/tija.db`, creating the file and schema as needed.
    ///
    /// # Errors
    /// Returns an error if the data directory is unavailable or the
    /// database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        Self::open_at(data_dir()?.join("tija.db"))
    }

    /// Open a database file at an explicit path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or migrated.
    pub fn open_at(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: PathBuf::from(path),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        debug!(path = %path.display(), "database opened");
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    ///
    /// # Errors
    /// Returns an error if the schema cannot be created.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| DatabaseError::OpenFailed {
            path: PathBuf::from(":memory:"),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        migrations::migrate(&self.conn)?;
        Ok(())
    }

    // ── Tasks ───────────────────────────────────────────────────────

    /// Insert or replace a task record.
    pub fn upsert_task(&self, task: &Task) -> Result<()> {
        let data = serde_json::to_string(task)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO tasks (id, data, completed, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![task.id, data, task.completed, task.created_at.to_rfc3339()],
        )?;
        Ok(())
    }

    /// Insert a new task, failing if the id is already taken.
    pub fn create_task(&self, task: &Task) -> Result<()> {
        if self.get_task(&task.id)?.is_some() {
            return Err(CoreError::Custom(format!("task '{}' already exists", task.id)));
        }
        self.upsert_task(task)
    }

    pub fn get_task(&self, id: &str) -> Result<Option<Task>> {
        let data: Option<String> = self
            .conn
            .query_row("SELECT data FROM tasks WHERE id = ?1", params![id], |row| {
                row.get(0)
            })
            .optional()?;
        data.map(|d| decode_task(id, &d)).transpose()
    }

    /// All tasks in creation order; `include_completed = false` keeps only
    /// pending ones.
    pub fn list_tasks(&self, include_completed: bool) -> Result<Vec<Task>> {
        let sql = if include_completed {
            "SELECT id, data FROM tasks ORDER BY created_at, id"
        } else {
            "SELECT id, data FROM tasks WHERE completed = 0 ORDER BY created_at, id"
        };
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;
        let mut tasks = Vec::new();
        for row in rows {
            let (id, data) = row?;
            tasks.push(decode_task(&id, &data)?);
        }
        Ok(tasks)
    }

    /// Apply a partial update. `None` when the id is unknown.
    pub fn update_task(&self, id: &str, update: TaskUpdate) -> Result<Option<Task>> {
        let Some(mut task) = self.get_task(id)? else {
            return Ok(None);
        };
        update.apply(&mut task);
        self.upsert_task(&task)?;
        Ok(Some(task))
    }

    /// Mark a task done. `false` when the id is unknown.
    pub fn complete_task(&self, id: &str) -> Result<bool> {
        let Some(mut task) = self.get_task(id)? else {
            return Ok(false);
        };
        task.completed = true;
        self.upsert_task(&task)?;
        Ok(true)
    }

    /// Remove a task. Sessions referring to it are left alone.
    pub fn delete_task(&self, id: &str) -> Result<bool> {
        let n = self.conn.execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        Ok(n > 0)
    }

    // ── Sessions ────────────────────────────────────────────────────

    /// Persist a finished session. Re-recording the same id is a no-op.
    pub fn record_session(&self, session: &FocusSession) -> Result<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO sessions
                (id, task_id, start_time, end_time, planned, actual, completed)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                session.id,
                session.task_id,
                session.start_time.to_rfc3339(),
                session.end_time.map(|t| t.to_rfc3339()),
                session.planned,
                session.actual,
                session.completed,
            ],
        )?;
        info!(session_id = %session.id, actual = session.actual, "focus session recorded");
        Ok(())
    }

    /// All recorded sessions, oldest first.
    pub fn list_sessions(&self) -> Result<Vec<FocusSession>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, task_id, start_time, end_time, planned, actual, completed
             FROM sessions ORDER BY start_time, id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Option<String>>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, u64>(4)?,
                row.get::<_, u64>(5)?,
                row.get::<_, bool>(6)?,
            ))
        })?;

        let mut sessions = Vec::new();
        for row in rows {
            let (id, task_id, start, end, planned, actual, completed) = row?;
            let start_time = parse_timestamp(&id, &start)?;
            let end_time = end.as_deref().map(|e| parse_timestamp(&id, e)).transpose()?;
            sessions.push(FocusSession {
                id,
                start_time,
                end_time,
                task_id,
                planned,
                actual,
                completed,
            });
        }
        Ok(sessions)
    }

    // ── Tracker state ───────────────────────────────────────────────

    /// Persisted tracker state, or `None` on first use.
    ///
    /// The history is rebuilt from the `sessions` table; the kv blob only
    /// carries the live fields.
    pub fn load_tracker_state(&self) -> Result<Option<TrackerState>> {
        let Some(json) = self.kv_get(TRACKER_STATE_KEY)? else {
            return Ok(None);
        };
        let mut state: TrackerState = serde_json::from_str(&json)?;
        state.replace_history(self.list_sessions()?);
        Ok(Some(state))
    }

    /// Store the live tracker fields. Finished sessions belong in
    /// [`Database::record_session`].
    pub fn save_tracker_state(&self, state: &TrackerState) -> Result<()> {
        self.kv_set(
            TRACKER_STATE_KEY,
            &serde_json::to_string(&state.without_history())?,
        )
    }

    // ── kv ──────────────────────────────────────────────────────────

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}

fn decode_task(id: &str, data: &str) -> Result<Task> {
    serde_json::from_str(data).map_err(|e| {
        DatabaseError::CorruptRecord {
            id: id.to_string(),
            message: e.to_string(),
        }
        .into()
    })
}

fn parse_timestamp(id: &str, raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| {
            DatabaseError::CorruptRecord {
                id: id.to_string(),
                message: format!("bad timestamp '{raw}': {e}"),
            }
            .into()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Priority;
    use chrono::TimeZone;

    #[test]
    fn task_crud() {
        let db = Database::open_memory().unwrap();
        let task = Task::new("Write report").unwrap().with_priority(Priority::High);
        db.create_task(&task).unwrap();
        assert!(db.create_task(&task).is_err());

        let loaded = db.get_task(&task.id).unwrap().unwrap();
        assert_eq!(loaded, task);

        let updated = db
            .update_task(
                &task.id,
                TaskUpdate {
                    title: Some("Write final report".into()),
                    ..TaskUpdate::default()
                },
            )
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "Write final report");

        assert!(db.complete_task(&task.id).unwrap());
        assert!(db.list_tasks(false).unwrap().is_empty());
        assert_eq!(db.list_tasks(true).unwrap().len(), 1);

        assert!(db.delete_task(&task.id).unwrap());
        assert!(!db.delete_task(&task.id).unwrap());
        assert!(db.get_task(&task.id).unwrap().is_none());
    }

    #[test]
    fn unknown_ids_are_not_errors() {
        let db = Database::open_memory().unwrap();
        assert!(!db.complete_task("nope").unwrap());
        assert!(db.update_task("nope", TaskUpdate::default()).unwrap().is_none());
    }

    #[test]
    fn corrupt_task_row_is_reported() {
        let db = Database::open_memory().unwrap();
        db.conn()
            .execute(
                "INSERT INTO tasks (id, data, completed, created_at) VALUES ('bad', 'not json', 0, '')",
                [],
            )
            .unwrap();
        let err = db.list_tasks(true).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Database(DatabaseError::CorruptRecord { ref id, .. }) if id == "bad"
        ));
    }

    #[test]
    fn sessions_roundtrip() {
        let db = Database::open_memory().unwrap();
        let start = Utc.with_ymd_and_hms(2026, 2, 16, 9, 0, 0).unwrap();
        let session = FocusSession {
            id: "s1".into(),
            start_time: start,
            end_time: Some(start + chrono::Duration::minutes(25)),
            task_id: Some("t1".into()),
            planned: 1500,
            actual: 1500,
            completed: true,
        };
        db.record_session(&session).unwrap();
        db.record_session(&session).unwrap();
        assert_eq!(db.list_sessions().unwrap(), vec![session]);
    }

    #[test]
    fn tracker_state_roundtrip() {
        let db = Database::open_memory().unwrap();
        assert!(db.load_tracker_state().unwrap().is_none());
        let state = TrackerState::with_focus_duration(600);
        db.save_tracker_state(&state).unwrap();
        assert_eq!(db.load_tracker_state().unwrap(), Some(state));
    }

    #[test]
    fn tracker_history_comes_from_sessions_table() {
        use crate::focus::FocusSessionTracker;

        let db = Database::open_memory().unwrap();
        let mut tracker = FocusSessionTracker::new();
        for elapsed in [60, 90] {
            tracker.start().unwrap();
            tracker.tick(elapsed).unwrap();
            let event = tracker.complete().unwrap();
            db.record_session(event.completed_session().unwrap()).unwrap();
            db.save_tracker_state(tracker.state()).unwrap();
        }

        let blob = db.kv_get(TRACKER_STATE_KEY).unwrap().unwrap();
        let raw: serde_json::Value = serde_json::from_str(&blob).unwrap();
        assert_eq!(raw["history"], serde_json::json!([]));

        let restored = db.load_tracker_state().unwrap().unwrap();
        let actuals: Vec<u64> = restored.history().iter().map(|s| s.actual).collect();
        assert_eq!(actuals, vec![60, 90]);
        assert_eq!(restored.total_focus_time(), 150);
    }

    #[test]
    fn kv_store() {
        let db = Database::open_memory().unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
        db.kv_set("test", "hello").unwrap();
        assert_eq!(db.kv_get("test").unwrap().as_deref(), Some("hello"));
    }
}
