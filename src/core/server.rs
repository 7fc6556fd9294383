//! MCP Server implementation and lifecycle management.
//!
//! This module contains the main server handler that implements the MCP
//! protocol. The server only exposes tools; which tools exist is decided at
//! start-up by the `ToolRegistry` it is given.

use rmcp::{ServerHandler, handler::server::tool::ToolRouter, model::*, tool_handler};
use std::sync::Arc;

use super::config::Config;
use crate::domains::tools::{ToolRegistry, ToolResult, build_tool_router};

/// The main MCP server handler.
///
/// This struct implements the `ServerHandler` trait from rmcp. STDIO and TCP
/// sessions go through `tool_router`; the HTTP transport uses the registry.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// The tools this server exposes.
    registry: Arc<ToolRegistry>,

    /// Title of the API the tools were generated from.
    api_title: Option<String>,

    /// Tool router for handling tool calls.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a new MCP server exposing the tools in `registry`.
    pub fn new(config: Config, registry: ToolRegistry) -> Self {
        Self {
            tool_router: build_tool_router::<Self>(&registry),
            config: Arc::new(config),
            registry: Arc::new(registry),
            api_title: None,
        }
    }

    /// Name the API in the instructions sent to clients.
    pub fn with_api_title(mut self, title: impl Into<String>) -> Self {
        self.api_title = Some(title.into());
        self
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    fn instructions(&self) -> String {
        match &self.api_title {
            Some(title) => format!(
                "Tools of this server call the {} API. Each tool performs one HTTP operation \
                 and returns the response body.",
                title
            ),
            None => "This MCP server has no API document loaded.".to_string(),
        }
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// List all available tools (for HTTP transport).
    pub fn list_tools(&self) -> Vec<serde_json::Value> {
        self.registry
            .get_all_tools()
            .into_iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema,
                    "annotations": t.annotations
                })
            })
            .collect()
    }

    /// Call a tool by name (for HTTP transport).
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> ToolResult<serde_json::Value> {
        self.registry.call_tool(name, arguments).await
    }
}

/// ServerHandler implementation with tool_handler macro for automatic tool routing.
#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(self.instructions()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: self.config.server.name.clone(),
                version: self.config.server.version.clone(),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}
