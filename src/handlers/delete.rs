//! Delete handler

use crate::TodoServerHandler;
use crate::handlers::describe_failure;
use mcp_attr::{Result as McpResult, bail_public};

impl TodoServerHandler {
    pub async fn handle_delete(&self, id: i64) -> McpResult<String> {
        match self.service.delete_task(id).await {
            Ok(task) => Ok(format!("Deleted task {} ({})", task.id, task.title)),
            Err(e) => bail_public!(_, "Failed to delete task: {}", describe_failure(&e)),
        }
    }
}
