//! To-do domain model and pure task logic
//!
//! - `task`: the `Task` entity and `Priority`
//! - `lifecycle`: completion and expiry predicates, evaluated against a date
//! - `ordering`: display ordering (due date, due time, priority)
//! - `filter`: the pending / completed / daily views
//! - `paging`: offset/limit windows over a sorted view

mod filter;
mod lifecycle;
mod ordering;
mod paging;
mod task;

pub use filter::{TaskFilter, TaskViews};
pub use lifecycle::{is_completed, is_expired, local_date_today};
pub use ordering::{MISSING_TIME_SENTINEL, compare_tasks, sort_tasks};
pub use paging::{DEFAULT_PAGE_SIZE, TaskPage};
pub use task::{Priority, Task, now_millis};
