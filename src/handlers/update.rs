//! Update handler

use crate::TodoServerHandler;
use crate::formatting;
use crate::handlers::describe_failure;
use crate::todo::local_date_today;
use crate::validation;
use mcp_attr::{Result as McpResult, bail_public};

impl TodoServerHandler {
    /// **Edit**: Change task details. Omitted fields are kept.
    /// **Tip**: Use ""(empty string) to clear optional fields.
    /// **Note**: Switching a task between one-shot and daily requires clearing the
    /// fields of the other kind in the same call.
    #[allow(clippy::too_many_arguments)]
    pub async fn handle_update(
        &self,
        id: i64,
        title: Option<String>,
        priority: Option<String>,
        due_date: Option<String>,
        due_time: Option<String>,
        daily: Option<bool>,
        daily_time: Option<String>,
        daily_end_date: Option<String>,
    ) -> McpResult<String> {
        let mut task = match self.service.get_task(id).await {
            Ok(t) => t,
            Err(e) => bail_public!(_, "{}", describe_failure(&e)),
        };

        if let Some(new_title) = title {
            task.title = new_title;
        }

        if let Some(p) = priority {
            task.priority = match validation::parse_priority(&p) {
                Ok(p) => p,
                Err(e) => bail_public!(_, "{}", e),
            };
        }

        // Empty string means clear
        if let Some(d) = due_date {
            task.due_date = match validation::parse_optional_date(Some(&d)) {
                Ok(d) => d,
                Err(e) => bail_public!(_, "{}", e),
            };
        }

        if let Some(t) = due_time {
            task.due_time = if t.trim().is_empty() { None } else { Some(t) };
        }

        if let Some(is_daily) = daily {
            task.is_daily = is_daily;
        }

        if let Some(t) = daily_time {
            task.daily_time = if t.trim().is_empty() { None } else { Some(t) };
        }

        if let Some(d) = daily_end_date {
            task.daily_end_date = match validation::parse_optional_date(Some(&d)) {
                Ok(d) => d,
                Err(e) => bail_public!(_, "{}", e),
            };
        }

        let task = match self.service.update_task(task).await {
            Ok(t) => t,
            Err(e) => bail_public!(_, "Failed to update task: {}", describe_failure(&e)),
        };

        Ok(format!(
            "Task {} updated successfully\n{}",
            task.id,
            formatting::format_task(&task, local_date_today())
        ))
    }
}
