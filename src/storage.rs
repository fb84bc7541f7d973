//! Persistence port and its SQLite implementation

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::error::StoreError;
use crate::migration;
use crate::todo::{Priority, Task};

/// Synchronous persistence operations for tasks.
///
/// Implementations may block; callers on an async runtime go through
/// [`crate::repository::TaskRepository`], which moves each call off the runtime.
pub trait TaskDao: Send + Sync {
    /// Store a new task and return the assigned id. `task.id` is ignored.
    fn insert(&self, task: &Task) -> Result<i64, StoreError>;
    /// Overwrite every mutable column of an existing task.
    fn update(&self, task: &Task) -> Result<(), StoreError>;
    fn delete(&self, task: &Task) -> Result<(), StoreError>;
    fn get_by_id(&self, id: i64) -> Result<Option<Task>, StoreError>;
    /// Every stored task, in id order.
    fn list_all(&self) -> Result<Vec<Task>, StoreError>;
}

const SELECT_COLUMNS: &str = "SELECT id, title, priority, createdAt, dueDate, dueTime, \
     isDaily, dailyTime, dailyEndDate, completedAt FROM todos";

/// SQLite-backed task store.
///
/// A single connection behind a `Mutex`; all access is serialized.
pub struct SqliteTaskStore {
    file_path: Option<PathBuf>,
    conn: Mutex<Connection>,
}

impl SqliteTaskStore {
    /// Open (or create) the database file and bring its schema to the latest
    /// version.
    pub fn open(file_path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let file_path = file_path.as_ref().to_path_buf();
        if let Some(parent) = file_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(&file_path)?;
        let store = Self::with_connection(conn, Some(file_path))?;
        Ok(store)
    }

    /// In-memory store, mostly for tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?, None)
    }

    fn with_connection(
        mut conn: Connection,
        file_path: Option<PathBuf>,
    ) -> Result<Self, StoreError> {
        let version = migration::open_or_create(&mut conn)?;
        tracing::info!(
            path = ?file_path,
            schema_version = version,
            "task store opened"
        );
        Ok(Self {
            file_path,
            conn: Mutex::new(conn),
        })
    }

    /// Database file path, `None` for in-memory stores.
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl TaskDao for SqliteTaskStore {
    fn insert(&self, task: &Task) -> Result<i64, StoreError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO todos (title, priority, createdAt, dueDate, dueTime, \
             isDaily, dailyTime, dailyEndDate, completedAt) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                task.title,
                task.priority.as_str(),
                task.created_at.timestamp_millis(),
                task.due_date.map(date_to_millis),
                task.due_time,
                task.is_daily,
                task.daily_time,
                task.daily_end_date.map(date_to_millis),
                task.completed_at.map(|t| t.timestamp_millis()),
            ],
        )?;
        let id = conn.last_insert_rowid();
        tracing::debug!(id, "task inserted");
        Ok(id)
    }

    fn update(&self, task: &Task) -> Result<(), StoreError> {
        let conn = self.lock()?;
        let changed = conn.execute(
            "UPDATE todos SET title = ?1, priority = ?2, dueDate = ?3, dueTime = ?4, \
             isDaily = ?5, dailyTime = ?6, dailyEndDate = ?7, completedAt = ?8 \
             WHERE id = ?9",
            params![
                task.title,
                task.priority.as_str(),
                task.due_date.map(date_to_millis),
                task.due_time,
                task.is_daily,
                task.daily_time,
                task.daily_end_date.map(date_to_millis),
                task.completed_at.map(|t| t.timestamp_millis()),
                task.id,
            ],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(task.id));
        }
        tracing::debug!(id = task.id, "task updated");
        Ok(())
    }

    fn delete(&self, task: &Task) -> Result<(), StoreError> {
        let conn = self.lock()?;
        let changed = conn.execute("DELETE FROM todos WHERE id = ?1", params![task.id])?;
        if changed == 0 {
            return Err(StoreError::NotFound(task.id));
        }
        tracing::debug!(id = task.id, "task deleted");
        Ok(())
    }

    fn get_by_id(&self, id: i64) -> Result<Option<Task>, StoreError> {
        let conn = self.lock()?;
        let task = conn
            .query_row(
                &format!("{} WHERE id = ?1", SELECT_COLUMNS),
                params![id],
                row_to_task,
            )
            .optional()?;
        Ok(task)
    }

    fn list_all(&self) -> Result<Vec<Task>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!("{} ORDER BY id", SELECT_COLUMNS))?;
        let rows = stmt.query_map([], row_to_task)?;

        let mut tasks = Vec::new();
        for r in rows {
            tasks.push(r?);
        }
        Ok(tasks)
    }
}

/// Calendar dates are stored as epoch milliseconds of UTC midnight.
pub(crate) fn date_to_millis(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
}

fn conversion_error(idx: usize, msg: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Integer, msg.into())
}

fn timestamp_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let Some(ms) = row.get::<_, Option<i64>>(idx)? else {
        return Ok(None);
    };
    DateTime::from_timestamp_millis(ms)
        .map(Some)
        .ok_or_else(|| conversion_error(idx, format!("timestamp out of range: {}", ms)))
}

fn date_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<NaiveDate>> {
    Ok(timestamp_at(row, idx)?.map(|t| t.date_naive()))
}

fn row_to_task(row: &Row<'_>) -> rusqlite::Result<Task> {
    let priority_text: String = row.get(2)?;
    let priority: Priority = priority_text
        .parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?;
    let created_at = timestamp_at(row, 3)?
        .ok_or_else(|| conversion_error(3, "createdAt is NULL".to_string()))?;

    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        priority,
        created_at,
        due_date: date_at(row, 4)?,
        due_time: row.get(5)?,
        is_daily: row.get(6)?,
        daily_time: row.get(7)?,
        daily_end_date: date_at(row, 8)?,
        completed_at: timestamp_at(row, 9)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_date_column_encoding() {
        let date = NaiveDate::from_ymd_opt(1970, 1, 2).unwrap();
        assert_eq!(date_to_millis(date), 86_400_000);
    }

    #[test]
    fn test_insert_assigns_increasing_ids() {
        let store = SqliteTaskStore::open_in_memory().unwrap();
        let a = store.insert(&Task::new("a", Priority::Low)).unwrap();
        let b = store.insert(&Task::new("b", Priority::Low)).unwrap();
        assert!(a > 0);
        assert!(b > a);
    }

    #[test]
    fn test_update_missing_task_is_not_found() {
        let store = SqliteTaskStore::open_in_memory().unwrap();
        let mut task = Task::new("ghost", Priority::Low);
        task.id = 99;
        assert!(matches!(store.update(&task), Err(StoreError::NotFound(99))));
        assert!(matches!(store.delete(&task), Err(StoreError::NotFound(99))));
    }

    #[test]
    fn test_unknown_priority_text_is_a_conversion_error() {
        let store = SqliteTaskStore::open_in_memory().unwrap();
        {
            let conn = store.lock().unwrap();
            conn.execute(
                "INSERT INTO todos (title, priority, createdAt) VALUES ('x', 'URGENT', 0)",
                [],
            )
            .unwrap();
        }
        assert!(matches!(
            store.list_all(),
            Err(StoreError::Sqlite(rusqlite::Error::FromSqlConversionFailure(2, _, _)))
        ));
    }

    #[test]
    fn test_completed_at_round_trips() {
        let store = SqliteTaskStore::open_in_memory().unwrap();
        let mut task = Task::new("done", Priority::High);
        task.completed_at = Some(Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 59).unwrap());
        let id = store.insert(&task).unwrap();

        let loaded = store.get_by_id(id).unwrap().unwrap();
        assert_eq!(loaded.completed_at, task.completed_at);
    }
}
