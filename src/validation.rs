//! Validation helper functions
//!
//! Parsing of user-supplied strings (dates, times, priorities, filters) and the
//! checks a task must pass before it is written.

use chrono::{NaiveDate, NaiveTime};

use crate::error::ValidationError;
use crate::todo::{Priority, Task, TaskFilter};

/// Trim and check a title.
pub fn validate_title(title: &str) -> Result<String, ValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    Ok(trimmed.to_string())
}

/// Parse a date in YYYY-MM-DD format
pub fn parse_date(date_str: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(date_str.to_string()))
}

/// Parse an optional date; absent or blank input gives `None`
pub fn parse_optional_date(date_str: Option<&str>) -> Result<Option<NaiveDate>, ValidationError> {
    match date_str.map(str::trim) {
        Some(s) if !s.is_empty() => parse_date(s).map(Some),
        _ => Ok(None),
    }
}

/// Parse a time of day in HH:mm format
pub fn parse_time(time_str: &str) -> Result<NaiveTime, ValidationError> {
    NaiveTime::parse_from_str(time_str.trim(), "%H:%M")
        .map_err(|_| ValidationError::InvalidTime(time_str.to_string()))
}

/// Normalize a time to zero-padded "HH:mm" so string ordering matches
/// chronological ordering ("9:05" becomes "09:05").
pub fn normalize_time(time_str: &str) -> Result<String, ValidationError> {
    Ok(parse_time(time_str)?.format("%H:%M").to_string())
}

pub fn parse_priority(priority_str: &str) -> Result<Priority, ValidationError> {
    priority_str.parse()
}

pub fn parse_filter(filter_str: &str) -> Result<TaskFilter, ValidationError> {
    filter_str.parse()
}

/// Check a task before insert or update, normalizing title and times in place.
///
/// One-shot tasks may carry a due date and time; daily tasks a reminder time and
/// end date. Mixing the two groups is rejected, as is a due time without a date.
pub fn validate_task(task: &mut Task) -> Result<(), ValidationError> {
    task.title = validate_title(&task.title)?;
    task.due_time = normalize_optional_time(task.due_time.take())?;
    task.daily_time = normalize_optional_time(task.daily_time.take())?;

    if task.is_daily {
        if task.due_date.is_some() || task.due_time.is_some() {
            return Err(ValidationError::DueFieldsOnDaily);
        }
    } else {
        if task.daily_time.is_some() || task.daily_end_date.is_some() {
            return Err(ValidationError::DailyFieldsOnOneShot);
        }
        if task.due_time.is_some() && task.due_date.is_none() {
            return Err(ValidationError::TimeWithoutDate);
        }
    }
    Ok(())
}

fn normalize_optional_time(time: Option<String>) -> Result<Option<String>, ValidationError> {
    match time {
        Some(t) if !t.trim().is_empty() => Ok(Some(normalize_time(&t)?)),
        _ => Ok(None),
    }
}
