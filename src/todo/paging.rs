//! Offset/limit paging over a sorted view

use super::task::Task;

/// Page size used when the caller does not ask for one
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// One window of a filtered, sorted view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskPage {
    pub tasks: Vec<Task>,
    /// Position of the first task of this page within the whole view
    pub offset: usize,
    pub limit: usize,
    /// Size of the whole view
    pub total: usize,
}

impl TaskPage {
    /// Cut `[offset, offset + limit)` out of an already sorted view.
    ///
    /// An offset at or past the end gives an empty page; `total` is still set.
    pub fn slice(view: Vec<Task>, offset: usize, limit: usize) -> Self {
        let total = view.len();
        let tasks = view.into_iter().skip(offset).take(limit).collect();
        Self {
            tasks,
            offset,
            limit,
            total,
        }
    }

    /// Offset of the following page, if there is one
    pub fn next_offset(&self) -> Option<usize> {
        let end = self.offset.saturating_add(self.tasks.len());
        (!self.tasks.is_empty() && end < self.total).then_some(end)
    }
}
