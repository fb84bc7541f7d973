//! Get handler

use crate::TodoServerHandler;
use crate::formatting;
use crate::handlers::describe_failure;
use crate::todo::local_date_today;
use mcp_attr::{Result as McpResult, bail_public};

impl TodoServerHandler {
    pub async fn handle_get(&self, id: i64) -> McpResult<String> {
        match self.service.get_task(id).await {
            Ok(task) => Ok(formatting::format_task(&task, local_date_today())),
            Err(e) => bail_public!(_, "{}", describe_failure(&e)),
        }
    }
}
