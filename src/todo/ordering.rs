use std::cmp::Ordering;

use super::task::Task;

/// Stand-in for a missing due time; sorts after every "HH:mm" value
pub const MISSING_TIME_SENTINEL: &str = "24:00";

fn time_key(task: &Task) -> &str {
    match task.due_time.as_deref().map(str::trim) {
        Some(t) if !t.is_empty() => t,
        _ => MISSING_TIME_SENTINEL,
    }
}

/// Display order: due date ascending (undated last), then due time ascending
/// (untimed last), then priority descending.
pub fn compare_tasks(a: &Task, b: &Task) -> Ordering {
    let by_date = match (a.due_date, b.due_date) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };

    by_date
        .then_with(|| time_key(a).cmp(time_key(b)))
        .then_with(|| b.priority.cmp(&a.priority))
}

/// Sort tasks in place; ties keep their incoming order
pub fn sort_tasks(tasks: &mut [Task]) {
    tasks.sort_by(compare_tasks);
}
