//! To-do MCP Server Library
//!
//! A local to-do list with one-shot and daily tasks, served to MCP clients over
//! stdio. Tasks live in a SQLite database; whether a task is completed or
//! expired is derived from its timestamps and the current date at read time,
//! so daily tasks reset every day without anything being rewritten.
//!
//! # Architecture
//!
//! - **MCP Layer**: `TodoServerHandler` - tool definitions, delegating to `handlers`
//! - **Service Layer**: `service` - validation, completion toggle, reminder policy
//! - **Domain Layer**: `todo` - task model, completion/expiry predicates, ordering, views
//! - **Persistence Layer**: `storage` (SQLite DAO), `migration` (schema versions),
//!   `repository` (async offloading and change notification)
//!
//! # Example
//!
//! ```no_run
//! use todo_mcp::TodoServerHandler;
//! use anyhow::Result;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let handler = TodoServerHandler::new("todo.db", true).await?;
//!     // Use handler with MCP server...
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod feed;
pub mod formatting;
mod handlers;
pub mod migration;
pub mod reminder;
pub mod repository;
pub mod resource;
pub mod service;
pub mod storage;
pub mod todo;
pub mod validation;

use anyhow::Result;
use mcp_attr::Result as McpResult;
use mcp_attr::server::{McpServer, mcp_server};
use std::path::Path;
use std::sync::Arc;

// Re-export commonly used types
pub use config::Config;
pub use error::{ErrorInfo, ErrorKind, StoreError, TodoError, ValidationError};
pub use feed::TaskFeed;
pub use reminder::{DisabledReminders, ReminderFired, ReminderScheduler, TokioReminderScheduler};
pub use repository::TaskRepository;
pub use resource::Resource;
pub use service::TodoService;
pub use storage::{SqliteTaskStore, TaskDao};
pub use todo::{Priority, Task, TaskFilter, TaskPage, TaskViews, is_completed, is_expired};

/// MCP Server handler for to-do management
///
/// Every change is written to the SQLite database immediately; reminders for
/// daily tasks are re-armed when the handler starts.
pub struct TodoServerHandler {
    pub(crate) service: TodoService,
}

impl TodoServerHandler {
    /// Open the database at `database_path` and start the reminder scheduler
    ///
    /// # Arguments
    /// * `database_path` - Path to the SQLite file (created if missing)
    /// * `reminders_enabled` - Whether daily tasks get reminders
    ///
    /// # Returns
    /// Result containing the handler or an error
    pub async fn new(database_path: impl AsRef<Path>, reminders_enabled: bool) -> Result<Self> {
        let store = SqliteTaskStore::open(database_path)?;
        let reminders: Arc<dyn ReminderScheduler> = if reminders_enabled {
            Arc::new(TokioReminderScheduler::new())
        } else {
            Arc::new(DisabledReminders)
        };
        Self::with_parts(Arc::new(store), reminders).await
    }

    /// Build a handler from an existing DAO and reminder scheduler
    pub async fn with_parts(
        dao: Arc<dyn TaskDao>,
        reminders: Arc<dyn ReminderScheduler>,
    ) -> Result<Self> {
        let repository = TaskRepository::new(dao);
        repository.refresh().await;
        let service = TodoService::new(repository, reminders);
        service.restore_reminders().await?;
        Ok(Self { service })
    }

    pub fn service(&self) -> &TodoService {
        &self.service
    }
}

/// To-do list server: one-shot tasks with optional due dates, and daily tasks
/// that reset every day and can remind you at a fixed time.
///
/// Views:
/// - **pending**: not completed (daily tasks: not completed today) and not ended
/// - **completed**: completed (daily tasks: completed today) and not ended
/// - **daily**: every daily task that has not ended, done or not
///
/// Lists are ordered by due date, then due time, then priority (high first).
/// Task IDs are integers assigned on creation.
#[mcp_server]
impl McpServer for TodoServerHandler {
    /// **Add**: Create a task. One-shot tasks may have a due date/time; daily tasks
    /// repeat every day.
    /// **Daily**: set daily=true, optionally daily_time (reminder) and daily_end_date
    /// (last active day).
    #[allow(clippy::too_many_arguments)]
    #[tool]
    async fn add(
        &self,
        /// Title: brief description (required, non-empty)
        title: String,
        /// Priority: low/medium/high (default: medium)
        priority: Option<String>,
        /// Due date: YYYY-MM-DD, one-shot tasks only (optional)
        due_date: Option<String>,
        /// Due time: HH:mm, requires due_date (optional)
        due_time: Option<String>,
        /// Daily: true for a task that repeats every day (default: false)
        daily: Option<bool>,
        /// Daily reminder time: HH:mm, daily tasks only (optional)
        daily_time: Option<String>,
        /// Daily end date: YYYY-MM-DD, last day the daily task is active (optional)
        daily_end_date: Option<String>,
    ) -> McpResult<String> {
        self.handle_add(
            title,
            priority,
            due_date,
            due_time,
            daily,
            daily_time,
            daily_end_date,
        )
        .await
    }

    /// **List**: Show one view of the task list, sorted for display.
    /// **Views**: "pending" (default), "completed", "daily".
    /// **Paging**: 20 tasks per call by default; pass the offset shown at the end
    /// of the output to get the next page.
    #[tool]
    async fn list(
        &self,
        /// View: pending/completed/daily (default: pending)
        filter: Option<String>,
        /// Maximum number of tasks to return, at least 1 (default: 20)
        limit: Option<u32>,
        /// Number of tasks to skip from the start of the view (default: 0)
        offset: Option<u32>,
    ) -> McpResult<String> {
        self.handle_list(filter, limit, offset).await
    }

    /// **Get**: Show a single task with all of its fields.
    #[tool]
    async fn get(
        &self,
        /// Task ID
        id: i64,
    ) -> McpResult<String> {
        self.handle_get(id).await
    }

    /// **Update**: Edit a task. Omitted fields are kept.
    /// **Tip**: Use empty string "" to clear optional fields.
    #[allow(clippy::too_many_arguments)]
    #[tool]
    async fn update(
        &self,
        /// Task ID
        id: i64,
        /// New title (optional)
        title: Option<String>,
        /// New priority: low/medium/high (optional)
        priority: Option<String>,
        /// Due date YYYY-MM-DD, ""=clear (optional)
        due_date: Option<String>,
        /// Due time HH:mm, ""=clear (optional)
        due_time: Option<String>,
        /// Daily flag (optional)
        daily: Option<bool>,
        /// Daily reminder time HH:mm, ""=clear (optional)
        daily_time: Option<String>,
        /// Daily end date YYYY-MM-DD, ""=clear (optional)
        daily_end_date: Option<String>,
    ) -> McpResult<String> {
        self.handle_update(
            id,
            title,
            priority,
            due_date,
            due_time,
            daily,
            daily_time,
            daily_end_date,
        )
        .await
    }

    /// **Toggle complete**: Mark a task done, or reopen it if it is already done.
    /// **Daily tasks**: completion counts for today only and resets tomorrow.
    #[tool]
    async fn toggle_complete(
        &self,
        /// Task ID
        id: i64,
    ) -> McpResult<String> {
        self.handle_toggle_complete(id).await
    }

    /// **Delete**: Permanently remove a task and its reminder.
    #[tool]
    async fn delete(
        &self,
        /// Task ID
        id: i64,
    ) -> McpResult<String> {
        self.handle_delete(id).await
    }
}
