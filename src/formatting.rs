//! Formatting helper functions for tool output

use chrono::{Local, NaiveDate};

use crate::todo::{Task, TaskFilter, TaskPage, is_completed, is_expired};

/// One task as a multi-line block
///
/// # Arguments
/// * `task` - Task to format
/// * `today` - Date used to evaluate completion and expiry
pub fn format_task(task: &Task, today: NaiveDate) -> String {
    let mark = if is_completed(task, today) { "x" } else { " " };
    let mut result = format!(
        "- [{}] #{} {} (priority: {})\n",
        mark, task.id, task.title, task.priority
    );

    if task.is_daily {
        result.push_str("  Daily");
        if let Some(ref time) = task.daily_time {
            result.push_str(&format!(" at {}", time));
        }
        if let Some(end) = task.daily_end_date {
            result.push_str(&format!(" until {}", end));
        }
        if is_expired(task, today) {
            result.push_str(" (ended)");
        }
        result.push('\n');
    } else if let Some(date) = task.due_date {
        match task.due_time {
            Some(ref time) => result.push_str(&format!("  Due: {} {}\n", date, time)),
            None => result.push_str(&format!("  Due: {}\n", date)),
        }
    }

    if let Some(completed_at) = task.completed_at {
        result.push_str(&format!(
            "  Completed: {}\n",
            completed_at.with_timezone(&Local).format("%Y-%m-%d %H:%M")
        ));
    }
    result
}

/// Format one page of a view into a display string
///
/// # Arguments
/// * `filter` - View the tasks were taken from, used in the heading
/// * `page` - Tasks in display order, with their position in the view
/// * `today` - Date used to evaluate completion and expiry
pub fn format_page(filter: TaskFilter, page: &TaskPage, today: NaiveDate) -> String {
    if page.total == 0 {
        return format!("No {} tasks", filter);
    }
    if page.tasks.is_empty() {
        return format!(
            "No {} tasks at offset {} ({} in total)",
            filter, page.offset, page.total
        );
    }

    let mut result = format!("Found {} {} task(s)", page.total, filter);
    if page.tasks.len() < page.total {
        result.push_str(&format!(
            ", showing {}-{}",
            page.offset + 1,
            page.offset + page.tasks.len()
        ));
    }
    result.push_str(":\n\n");
    for task in &page.tasks {
        result.push_str(&format_task(task, today));
    }
    if let Some(next) = page.next_offset() {
        result.push_str(&format!("\nMore tasks available, use offset={}\n", next));
    }
    result
}
