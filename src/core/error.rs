//! Error types and handling for the MCP server.
//!
//! This module defines a unified error type that can represent errors from
//! all domains and external dependencies.

use thiserror::Error;

/// A specialized Result type for MCP server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the MCP server.
#[derive(Debug, Error)]
pub enum Error {
    /// Error originating from the tools domain.
    #[error("Tool error: {0}")]
    Tool(#[from] crate::domains::tools::ToolError),

    /// The OpenAPI document could not be loaded or used.
    #[error("OpenAPI error: {0}")]
    OpenApi(#[from] crate::domains::openapi::OpenApiError),

    /// The transport failed to start or stopped with an error.
    #[error("Transport error: {0}")]
    Transport(#[from] super::transport::TransportError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::openapi::OpenApiError;

    #[test]
    fn test_domain_errors_convert() {
        let err: Error = OpenApiError::NoOperations.into();
        assert!(matches!(err, Error::OpenApi(_)));
        assert!(err.to_string().starts_with("OpenAPI error: "));

        let err: Error = crate::domains::tools::ToolError::NoBaseUrl.into();
        assert!(matches!(err, Error::Tool(_)));
    }
}
