//! Completion and expiry predicates
//!
//! Both predicates are evaluated against the caller's notion of "today" at read
//! time. Nothing here writes to the store: a daily task completed yesterday simply
//! stops counting as completed once the date changes.

use chrono::{Local, NaiveDate};

use super::task::Task;

/// Get the current date in local timezone
pub fn local_date_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Whether `task` counts as completed on `today`
///
/// One-shot tasks stay completed once `completed_at` is set. Daily tasks count
/// only when the completion happened on `today` (local calendar day).
pub fn is_completed(task: &Task, today: NaiveDate) -> bool {
    let Some(completed_at) = task.completed_at else {
        return false;
    };
    if !task.is_daily {
        return true;
    }
    completed_at.with_timezone(&Local).date_naive() == today
}

/// Whether a daily task's recurrence has ended as of `today`
///
/// Expiry starts the day after `daily_end_date`. One-shot tasks and open-ended
/// daily tasks never expire.
pub fn is_expired(task: &Task, today: NaiveDate) -> bool {
    if !task.is_daily {
        return false;
    }
    task.daily_end_date.is_some_and(|end| today > end)
}
