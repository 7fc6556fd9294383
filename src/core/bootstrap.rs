//! Server assembly.
//!
//! Loads the configured OpenAPI document, builds one tool per operation and
//! hands the resulting registry to a new `McpServer`.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use super::config::Config;
use super::error::Result;
use super::server::McpServer;
use crate::domains::openapi::{self, ApiDocument, OpenApiError};
use crate::domains::tools::{ApiClient, ToolRegistry};

/// Build the server described by `config`.
///
/// Fails when the document cannot be loaded, is not OpenAPI 3.x, or has no
/// operations. Without a document the server starts with no tools, or only
/// the `ping` example when it is enabled.
pub async fn build_server(config: Config) -> Result<McpServer> {
    let document = match config.api.spec.as_deref() {
        Some(source) => Some(load_document(source).await?),
        None => {
            warn!("No OpenAPI document configured; starting without generated tools");
            None
        }
    };

    let base_url = config
        .api
        .base_url
        .clone()
        .or_else(|| document.as_ref().and_then(|d| d.base_url.clone()));
    match &base_url {
        Some(url) => info!("API base URL: {}", url),
        None => warn!("No API base URL configured; tool calls will fail until one is set"),
    }

    let client = Arc::new(
        ApiClient::new(base_url, Duration::from_secs(config.api.timeout_secs))?
            .with_bearer_token(config.api.bearer_token.clone()),
    );

    let mut registry = match &document {
        Some(document) => ToolRegistry::from_document(document, client.clone())?,
        None => ToolRegistry::new(),
    };
    if config.api.ping_tool {
        registry = registry.with_ping(client);
    }

    let server = McpServer::new(config, registry);
    Ok(match document {
        Some(document) => server.with_api_title(document.title),
        None => server,
    })
}

async fn load_document(source: &str) -> Result<ApiDocument> {
    info!("Loading OpenAPI document from {}", source);
    let document = openapi::load(source).await?;
    if document.operations.is_empty() {
        return Err(OpenApiError::NoOperations.into());
    }
    info!(
        "Loaded '{}' v{} with {} operations",
        document.title,
        document.version,
        document.operations.len()
    );
    Ok(document)
}
