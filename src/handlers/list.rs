//! List handler

use crate::TodoServerHandler;
use crate::handlers::describe_failure;
use crate::todo::{DEFAULT_PAGE_SIZE, TaskFilter, local_date_today};
use crate::{formatting, validation};
use mcp_attr::{Result as McpResult, bail_public};

impl TodoServerHandler {
    /// Resolves the requested view, cuts the requested page out of it and formats
    /// it for display.
    pub async fn handle_list(
        &self,
        filter: Option<String>,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> McpResult<String> {
        let filter = match filter.as_deref().filter(|f| !f.trim().is_empty()) {
            None => TaskFilter::default(),
            Some(f) => match validation::parse_filter(f) {
                Ok(f) => f,
                Err(e) => bail_public!(_, "{}", e),
            },
        };
        let limit = limit.map_or(DEFAULT_PAGE_SIZE, |l| l as usize);
        let offset = offset.unwrap_or(0) as usize;

        let page = match self.service.list_page(filter, offset, limit).await {
            Ok(page) => page,
            Err(e) => bail_public!(_, "Failed to list tasks: {}", describe_failure(&e)),
        };

        Ok(formatting::format_page(filter, &page, local_date_today()))
    }
}
