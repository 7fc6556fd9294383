//! Tool handler trait.
//!
//! Tools are created at runtime from the loaded document, so each one is a
//! value behind this trait rather than a unit struct with associated consts.

use rmcp::model::{CallToolResult, JsonObject, Tool};

use super::error::ToolResult;

/// A tool that can be listed and called.
///
/// `call` returns `Ok` with an error result for failures the model should
/// see (upstream errors, timeouts), and `Err` for protocol-level failures
/// such as invalid arguments.
#[async_trait::async_trait]
pub trait ToolHandler: Send + Sync {
    /// Name of this tool as registered in MCP.
    fn name(&self) -> &str;

    /// Metadata sent in `tools/list`.
    fn to_tool(&self) -> Tool;

    /// Execute the tool with the given arguments.
    async fn call(&self, arguments: JsonObject) -> ToolResult<CallToolResult>;
}
