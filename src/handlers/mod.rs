//! MCP tool handlers
//!
//! Each tool's body lives in its own file. Handlers parse string arguments,
//! call the service, and turn failures into public tool errors.

mod add;
mod delete;
mod get;
mod list;
mod toggle_complete;
mod update;

use crate::error::{ErrorInfo, TodoError};

/// User-facing text for a failed operation, with a retry hint when useful.
pub(crate) fn describe_failure(err: &TodoError) -> String {
    let info = ErrorInfo::from_error(err);
    if info.retryable {
        format!("{} (retryable)", info.user_message)
    } else {
        info.user_message
    }
}
