//! Common test utilities for integration tests
#![allow(dead_code)]

use chrono::{NaiveDate, NaiveTime};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use todo_mcp::{
    ReminderScheduler, SqliteTaskStore, TaskRepository, TodoServerHandler, TodoService,
};
use todo_mcp::{Priority, Task};

/// Reminder port that only records what it was asked to do.
#[derive(Default)]
pub struct RecordingScheduler {
    scheduled: Mutex<HashMap<i64, (String, NaiveTime)>>,
    until: Mutex<HashMap<i64, Option<NaiveDate>>>,
    cancelled: Mutex<Vec<i64>>,
}

impl RecordingScheduler {
    pub fn scheduled(&self, task_id: i64) -> Option<(String, NaiveTime)> {
        self.scheduled.lock().unwrap().get(&task_id).cloned()
    }

    pub fn until(&self, task_id: i64) -> Option<NaiveDate> {
        self.until.lock().unwrap().get(&task_id).copied().flatten()
    }

    pub fn scheduled_count(&self) -> usize {
        self.scheduled.lock().unwrap().len()
    }

    pub fn was_cancelled(&self, task_id: i64) -> bool {
        self.cancelled.lock().unwrap().contains(&task_id)
    }
}

impl ReminderScheduler for RecordingScheduler {
    fn schedule(&self, task_id: i64, title: &str, at: NaiveTime, until: Option<NaiveDate>) {
        self.until.lock().unwrap().insert(task_id, until);
        self.scheduled
            .lock()
            .unwrap()
            .insert(task_id, (title.to_string(), at));
    }

    fn cancel(&self, task_id: i64) {
        self.scheduled.lock().unwrap().remove(&task_id);
        self.cancelled.lock().unwrap().push(task_id);
    }
}

/// Create a test handler backed by a database in a temporary directory
pub async fn get_test_handler() -> (TodoServerHandler, Arc<RecordingScheduler>, TempDir) {
    let dir = TempDir::new().unwrap();
    let store = SqliteTaskStore::open(dir.path().join("todo.db")).unwrap();
    let reminders = Arc::new(RecordingScheduler::default());
    let handler = TodoServerHandler::with_parts(Arc::new(store), reminders.clone())
        .await
        .unwrap();
    (handler, reminders, dir)
}

/// Create a service over an in-memory store
pub async fn get_test_service() -> (TodoService, Arc<RecordingScheduler>) {
    let repository = TaskRepository::new(Arc::new(SqliteTaskStore::open_in_memory().unwrap()));
    repository.refresh().await;
    let reminders = Arc::new(RecordingScheduler::default());
    (TodoService::new(repository, reminders.clone()), reminders)
}

/// Extract the task ID from an add() response
/// Response format: "Task created with ID: <id>\n..."
pub fn extract_id_from_response(response: &str) -> i64 {
    response
        .lines()
        .next()
        .and_then(|line| line.rsplit(' ').next())
        .and_then(|id| id.trim().parse().ok())
        .unwrap_or_else(|| panic!("no id in response: {response}"))
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn one_shot(title: &str, priority: Priority) -> Task {
    Task::new(title, priority)
}

pub fn daily(title: &str, time: Option<&str>) -> Task {
    Task {
        is_daily: true,
        daily_time: time.map(str::to_string),
        ..Task::new(title, Priority::Medium)
    }
}
