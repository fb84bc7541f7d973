use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

use super::lifecycle::{is_completed, is_expired};
use super::ordering::sort_tasks;
use super::task::Task;
use crate::error::ValidationError;

/// The three derived views over the task list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TaskFilter {
    /// Not completed and not expired
    #[default]
    Pending,
    /// Completed and not expired
    Completed,
    /// Daily and not expired, regardless of completion
    Daily,
}

impl TaskFilter {
    pub const ALL: [TaskFilter; 3] = [
        TaskFilter::Pending,
        TaskFilter::Completed,
        TaskFilter::Daily,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskFilter::Pending => "pending",
            TaskFilter::Completed => "completed",
            TaskFilter::Daily => "daily",
        }
    }

    /// Whether `task` belongs in this view on `today`
    pub fn matches(&self, task: &Task, today: NaiveDate) -> bool {
        if is_expired(task, today) {
            return false;
        }
        match self {
            TaskFilter::Pending => !is_completed(task, today),
            TaskFilter::Completed => is_completed(task, today),
            TaskFilter::Daily => task.is_daily,
        }
    }

    /// Filter and sort `tasks` into this view
    pub fn apply(&self, tasks: &[Task], today: NaiveDate) -> Vec<Task> {
        let mut view: Vec<Task> = tasks
            .iter()
            .filter(|t| self.matches(t, today))
            .cloned()
            .collect();
        sort_tasks(&mut view);
        view
    }
}

impl fmt::Display for TaskFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskFilter {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(TaskFilter::Pending),
            "completed" => Ok(TaskFilter::Completed),
            "daily" => Ok(TaskFilter::Daily),
            _ => Err(ValidationError::InvalidFilter(s.to_string())),
        }
    }
}

/// All three views computed from one snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskViews {
    pub pending: Vec<Task>,
    pub completed: Vec<Task>,
    pub daily: Vec<Task>,
}

impl TaskViews {
    pub fn derive(tasks: &[Task], today: NaiveDate) -> Self {
        Self {
            pending: TaskFilter::Pending.apply(tasks, today),
            completed: TaskFilter::Completed.apply(tasks, today),
            daily: TaskFilter::Daily.apply(tasks, today),
        }
    }

    pub fn get(&self, filter: TaskFilter) -> &[Task] {
        match filter {
            TaskFilter::Pending => &self.pending,
            TaskFilter::Completed => &self.completed,
            TaskFilter::Daily => &self.daily,
        }
    }
}
