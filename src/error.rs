//! Error types for the to-do core
//!
//! Storage failures are caught at the repository boundary and returned as
//! [`StoreError`]. Input problems are [`ValidationError`]s and are rejected before
//! anything is written. [`ErrorInfo`] turns either into a message fit for the
//! person using the tool, plus a retry hint.

use crate::migration::MigrationError;

/// Failure while reading or writing the task store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// SQLite reported an error.
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Schema could not be brought to the current version.
    #[error("schema migration failed: {0}")]
    Migration(#[from] MigrationError),

    /// No task with the given id.
    #[error("task {0} not found")]
    NotFound(i64),

    /// The store's connection lock was poisoned by a panicking writer.
    #[error("database connection is unavailable")]
    Poisoned,

    /// The background worker running the query panicked or was cancelled.
    #[error("background task failed: {0}")]
    Background(#[from] tokio::task::JoinError),

    /// Filesystem error preparing the database location.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Rejected input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("title must not be empty")]
    EmptyTitle,

    #[error("invalid time '{0}', use HH:mm (e.g. '09:30')")]
    InvalidTime(String),

    #[error("invalid date '{0}', use YYYY-MM-DD (e.g. '2025-03-15')")]
    InvalidDate(String),

    #[error("invalid priority '{0}', valid priorities: low, medium, high")]
    InvalidPriority(String),

    #[error("invalid filter '{0}', valid filters: pending, completed, daily")]
    InvalidFilter(String),

    #[error("due time requires a due date")]
    TimeWithoutDate,

    #[error("daily time and end date apply only to daily tasks")]
    DailyFieldsOnOneShot,

    #[error("daily tasks use daily_time and daily_end_date instead of a due date")]
    DueFieldsOnDaily,

    #[error("limit must be at least 1")]
    ZeroLimit,
}

/// Any failure surfaced by the service layer.
#[derive(Debug, thiserror::Error)]
pub enum TodoError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, TodoError>;

/// Broad failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Database,
    Validation,
    Unknown,
}

/// A classified failure: technical message, user-facing message, and whether the
/// user should be offered a retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    pub kind: ErrorKind,
    pub message: String,
    pub user_message: String,
    pub retryable: bool,
}

impl ErrorInfo {
    /// Classify `err` and log it.
    pub fn from_error(err: &TodoError) -> Self {
        let info = match err {
            TodoError::Validation(v) => ErrorInfo {
                kind: ErrorKind::Validation,
                message: v.to_string(),
                user_message: format!("Please check your input: {}", v),
                retryable: false,
            },
            TodoError::Store(StoreError::NotFound(id)) => ErrorInfo {
                kind: ErrorKind::Validation,
                message: err.to_string(),
                user_message: format!(
                    "Task {} does not exist. Use list() to see available tasks.",
                    id
                ),
                retryable: false,
            },
            TodoError::Store(StoreError::Migration(_)) => ErrorInfo {
                kind: ErrorKind::Database,
                message: err.to_string(),
                user_message: "The task database uses an unsupported schema version.".to_string(),
                retryable: false,
            },
            TodoError::Store(StoreError::Sqlite(_) | StoreError::Io(_) | StoreError::Poisoned) => {
                ErrorInfo {
                    kind: ErrorKind::Database,
                    message: err.to_string(),
                    user_message: "Could not access the task database, please try again."
                        .to_string(),
                    retryable: true,
                }
            }
            TodoError::Store(StoreError::Background(_)) => ErrorInfo {
                kind: ErrorKind::Unknown,
                message: err.to_string(),
                user_message: "Something went wrong, please try again.".to_string(),
                retryable: true,
            },
        };
        tracing::error!(kind = ?info.kind, retryable = info.retryable, "{}", info.message);
        info
    }
}

impl From<StoreError> for ErrorInfo {
    fn from(err: StoreError) -> Self {
        ErrorInfo::from_error(&TodoError::Store(err))
    }
}

impl From<ValidationError> for ErrorInfo {
    fn from(err: ValidationError) -> Self {
        ErrorInfo::from_error(&TodoError::Validation(err))
    }
}
