//! OpenAPI-specific error types.

use thiserror::Error;

/// Result type for OpenAPI operations.
pub type OpenApiResult<T> = Result<T, OpenApiError>;

/// Errors that can occur while loading an OpenAPI document.
#[derive(Debug, Error)]
pub enum OpenApiError {
    /// The document file does not exist.
    #[error("input file not found: {0}")]
    NotFound(String),

    /// The document could not be read.
    #[error("cannot read input: {0}")]
    Io(#[from] std::io::Error),

    /// The document could not be fetched over HTTP.
    #[error("failed to fetch OpenAPI document: {0}")]
    Fetch(String),

    /// The document is not valid JSON/YAML or not a valid OpenAPI document.
    #[error("invalid OpenAPI: {0}")]
    Parse(String),

    /// The document declares an OpenAPI version this server does not handle.
    #[error("{0}")]
    UnsupportedVersion(String),

    /// The document parsed fine but contains nothing to expose.
    #[error("no mappable operations found in OpenAPI document")]
    NoOperations,
}

impl OpenApiError {
    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a fetch error.
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    /// The error returned for Swagger / OpenAPI 2.0 documents.
    pub fn openapi2() -> Self {
        Self::UnsupportedVersion("OpenAPI 2.0 is not supported; use OpenAPI 3.x".to_string())
    }
}

impl From<serde_json::Error> for OpenApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<serde_yaml::Error> for OpenApiError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<reqwest::Error> for OpenApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Fetch(err.to_string())
    }
}
