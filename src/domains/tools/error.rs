//! Tool-specific error types.

use rmcp::ErrorData as McpError;
use thiserror::Error;

/// Result type for tool operations.
pub type ToolResult<T> = Result<T, ToolError>;

/// Errors that can occur during tool operations.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The requested tool was not found.
    #[error("Tool not found: {0}")]
    NotFound(String),

    /// A tool with the same name is already registered.
    #[error("Tool already registered: {0}")]
    Duplicate(String),

    /// Invalid arguments were provided to the tool.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// No API base URL is configured.
    #[error("No API base URL configured; set MCP_API_BASE_URL or add a server to the OpenAPI document")]
    NoBaseUrl,

    /// The configured API base URL cannot be used to build request URLs.
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),

    /// The HTTP request to the API failed before a response arrived.
    #[error("Request failed: {0}")]
    Request(String),

    /// The HTTP request to the API timed out.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ToolError {
    /// Create a new "not found" error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Create a new "invalid arguments" error.
    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }

    /// Create a new "request failed" error.
    pub fn request(msg: impl Into<String>) -> Self {
        Self::Request(msg.into())
    }

    /// Create a new "internal" error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl From<ToolError> for McpError {
    fn from(err: ToolError) -> Self {
        match err {
            ToolError::NotFound(_) | ToolError::InvalidArguments(_) => {
                McpError::invalid_params(err.to_string(), None)
            }
            _ => McpError::internal_error(err.to_string(), None),
        }
    }
}
