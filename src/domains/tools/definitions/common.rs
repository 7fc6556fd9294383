//! Helpers shared by the tool definitions.

use rmcp::model::{CallToolResult, Content, RawContent};
use tracing::warn;

use crate::domains::tools::client::ApiResponse;

/// Create an error result with a formatted message.
pub fn error_result(message: &str) -> CallToolResult {
    warn!("{}", message);
    CallToolResult::error(vec![Content::text(message.to_string())])
}

/// Create a success result with text content.
pub fn success_result(content: String) -> CallToolResult {
    CallToolResult::success(vec![Content::text(content)])
}

/// Body text for 2xx, `HTTP <code> <reason>: <body>` otherwise.
pub fn response_result(response: ApiResponse) -> CallToolResult {
    if response.is_success() {
        success_result(response.body)
    } else {
        error_result(&response.failure_message())
    }
}

/// JSON shape of a result as sent over the HTTP transport.
pub fn result_to_json(result: &CallToolResult) -> serde_json::Value {
    serde_json::json!({
        "content": result.content,
        "isError": result.is_error.unwrap_or(false)
    })
}

/// Text of the first content item, if it is text.
pub fn result_text(result: &CallToolResult) -> Option<&str> {
    result
        .content
        .first()
        .and_then(|c| match &c.raw {
            RawContent::Text(text) => Some(text.text.as_str()),
            _ => None,
        })
}
