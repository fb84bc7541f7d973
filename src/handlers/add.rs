//! Add handler

use crate::TodoServerHandler;
use crate::handlers::describe_failure;
use crate::todo::{Priority, Task, local_date_today};
use crate::{formatting, validation};
use mcp_attr::{Result as McpResult, bail_public};

impl TodoServerHandler {
    /// Builds a task from tool arguments and inserts it through the service.
    #[allow(clippy::too_many_arguments)]
    pub async fn handle_add(
        &self,
        title: String,
        priority: Option<String>,
        due_date: Option<String>,
        due_time: Option<String>,
        daily: Option<bool>,
        daily_time: Option<String>,
        daily_end_date: Option<String>,
    ) -> McpResult<String> {
        let priority = match priority.as_deref().map(validation::parse_priority) {
            None => Priority::default(),
            Some(Ok(p)) => p,
            Some(Err(e)) => bail_public!(_, "{}", e),
        };

        let due_date = match validation::parse_optional_date(due_date.as_deref()) {
            Ok(d) => d,
            Err(e) => bail_public!(_, "{}", e),
        };
        let daily_end_date = match validation::parse_optional_date(daily_end_date.as_deref()) {
            Ok(d) => d,
            Err(e) => bail_public!(_, "{}", e),
        };

        let task = Task {
            title,
            priority,
            due_date,
            due_time,
            is_daily: daily.unwrap_or(false),
            daily_time,
            daily_end_date,
            ..Default::default()
        };

        let task = match self.service.add_task(task).await {
            Ok(t) => t,
            Err(e) => bail_public!(_, "Failed to add task: {}", describe_failure(&e)),
        };

        Ok(format!(
            "Task created with ID: {}\n{}",
            task.id,
            formatting::format_task(&task, local_date_today())
        ))
    }
}
