use chrono::{DateTime, NaiveDate, SubsecRound, Utc};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Current time truncated to millisecond precision
///
/// Timestamps are persisted as epoch milliseconds, so anything finer would not
/// survive a round trip through the store.
pub fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Task priority
///
/// Variant order defines the ordinal: `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Column representation (`LOW`, `MEDIUM`, `HIGH`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "LOW",
            Priority::Medium => "MEDIUM",
            Priority::High => "HIGH",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(ValidationError::InvalidPriority(s.to_string())),
        }
    }
}

/// A to-do item
///
/// One-shot tasks are scheduled with `due_date`/`due_time`; daily tasks use
/// `daily_time`/`daily_end_date`. Completion is recorded only as a timestamp and
/// interpreted by [`crate::todo::is_completed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Store-assigned identity, 0 until the task has been inserted
    pub id: i64,
    pub title: String,
    pub priority: Priority,
    /// Creation time, never changed after insert
    pub created_at: DateTime<Utc>,
    pub due_date: Option<NaiveDate>,
    /// Due time as "HH:mm"
    pub due_time: Option<String>,
    pub is_daily: bool,
    /// Reminder time as "HH:mm", daily tasks only
    pub daily_time: Option<String>,
    /// Last day on which a daily task is active
    pub daily_end_date: Option<NaiveDate>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Default for Task {
    fn default() -> Self {
        Self {
            id: 0,
            title: String::new(),
            priority: Priority::default(),
            created_at: now_millis(),
            due_date: None,
            due_time: None,
            is_daily: false,
            daily_time: None,
            daily_end_date: None,
            completed_at: None,
        }
    }
}

impl Task {
    /// Create an unsaved task with the given title and priority
    pub fn new(title: impl Into<String>, priority: Priority) -> Self {
        Self {
            title: title.into(),
            priority,
            ..Default::default()
        }
    }

    /// Whether the task has been assigned an id by the store
    pub fn is_persisted(&self) -> bool {
        self.id > 0
    }

    /// Daily reminder time, if the task should have a reminder at all
    pub fn reminder_time(&self) -> Option<&str> {
        if !self.is_daily {
            return None;
        }
        self.daily_time
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}
