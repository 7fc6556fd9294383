//! Tool Registry - central registration and dispatch for all tools.
//!
//! This module provides:
//! - The ordered list of tools built from the loaded document
//! - Dispatch for tool calls from the HTTP transport
//! - Tool metadata for listing

use std::sync::Arc;

use rmcp::model::Tool;
use tracing::{info, warn};

use super::client::ApiClient;
use super::definitions::{ApiTool, PingTool, arguments_object, common};
use super::error::{ToolError, ToolResult};
use super::handlers::ToolHandler;
use super::mapping::operations_to_definitions;
use crate::domains::openapi::ApiDocument;

/// Tool registry - manages all available tools.
///
/// Both the rmcp router (STDIO/TCP) and the HTTP transport are built from
/// this list, so they always expose the same tools in the same order.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    handlers: Vec<Arc<dyn ToolHandler>>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// One tool per operation of `document`, all sharing `client`.
    pub fn from_document(document: &ApiDocument, client: Arc<ApiClient>) -> ToolResult<Self> {
        let mut registry = Self::new();
        for definition in operations_to_definitions(&document.operations) {
            registry.register(Arc::new(ApiTool::new(definition, client.clone())))?;
        }
        info!("Registered {} tools from '{}'", registry.len(), document.title);
        Ok(registry)
    }

    /// Add a tool; names must be unique.
    pub fn register(&mut self, handler: Arc<dyn ToolHandler>) -> ToolResult<()> {
        if self.get(handler.name()).is_some() {
            return Err(ToolError::Duplicate(handler.name().to_string()));
        }
        self.handlers.push(handler);
        Ok(())
    }

    /// Add the `ping` example tool unless a tool of that name already exists.
    pub fn with_ping(mut self, client: Arc<ApiClient>) -> Self {
        if self.get(PingTool::NAME).is_some() {
            warn!(
                "The document already defines a '{}' tool; skipping the example",
                PingTool::NAME
            );
            return self;
        }
        self.handlers.push(Arc::new(PingTool::new(client)));
        self
    }

    /// Get all tool names.
    pub fn tool_names(&self) -> Vec<&str> {
        self.handlers.iter().map(|h| h.name()).collect()
    }

    /// Get all tools as Tool models (metadata).
    pub fn get_all_tools(&self) -> Vec<Tool> {
        self.handlers.iter().map(|h| h.to_tool()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn ToolHandler>> {
        self.handlers.iter().find(|h| h.name() == name)
    }

    pub fn handlers(&self) -> &[Arc<dyn ToolHandler>] {
        &self.handlers
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Dispatch a JSON tool call to the appropriate handler.
    ///
    /// This is used by the HTTP transport to call tools. Failures reported by
    /// the API come back as `Ok` with `isError: true`.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> ToolResult<serde_json::Value> {
        let Some(handler) = self.get(name) else {
            warn!("Unknown tool requested: {}", name);
            return Err(ToolError::not_found(name));
        };

        let result = handler.call(arguments_object(arguments)?).await?;
        Ok(common::result_to_json(&result))
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tool_names())
            .finish()
    }
}
