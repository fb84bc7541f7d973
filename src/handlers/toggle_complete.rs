//! Toggle completion handler

use crate::TodoServerHandler;
use crate::handlers::describe_failure;
use crate::todo::now_millis;
use mcp_attr::{Result as McpResult, bail_public};

impl TodoServerHandler {
    /// Flips completion as of now and reports the resulting state.
    pub async fn handle_toggle_complete(&self, id: i64) -> McpResult<String> {
        let task = match self.service.toggle_completion(id, now_millis()).await {
            Ok(t) => t,
            Err(e) => bail_public!(_, "Failed to update task: {}", describe_failure(&e)),
        };

        let state = match (task.completed_at.is_some(), task.is_daily) {
            (true, true) => "completed for today",
            (true, false) => "completed",
            (false, _) => "reopened",
        };
        Ok(format!("Task {} {}", task.id, state))
    }
}
