//! Ping tool definition.
//!
//! The example tool of a freshly generated server: calls `GET /ping` on the
//! API and hands back whatever it answers.

use std::sync::Arc;

use reqwest::Method;
use rmcp::{
    handler::server::tool::cached_schema_for_type,
    model::{CallToolResult, JsonObject, Tool, ToolAnnotations},
};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{info, instrument};

use super::common::{error_result, success_result};
use crate::domains::tools::client::{ApiClient, ApiRequest};
use crate::domains::tools::error::ToolResult;
use crate::domains::tools::handlers::ToolHandler;

/// The ping tool takes no arguments.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct PingParams {}

/// Ping tool - checks that the API is reachable.
pub struct PingTool {
    client: Arc<ApiClient>,
}

impl PingTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "ping";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str =
        "Calls GET /ping on the API and returns the response (expected: 'pong')";

    const PATH: &'static str = "/ping";

    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl ToolHandler for PingTool {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn to_tool(&self) -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<PingParams>(),
            annotations: Some(ToolAnnotations::new().read_only(true).open_world(true)),
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    #[instrument(skip_all)]
    async fn call(&self, _arguments: JsonObject) -> ToolResult<CallToolResult> {
        info!("Ping tool called");

        let response = match self.client.send(ApiRequest::new(Method::GET, Self::PATH)).await {
            Ok(response) => response,
            Err(e) => return Ok(error_result(&e.to_string())),
        };

        if !response.is_success() {
            return Ok(error_result(&format!(
                "API responded with status {}: {}",
                response.status.as_u16(),
                response.status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        Ok(success_result(response.body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::definitions::common::result_text;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn ping_tool(base: String) -> PingTool {
        PingTool::new(Arc::new(
            ApiClient::new(Some(base), Duration::from_secs(5)).unwrap(),
        ))
    }

    #[test]
    fn test_ping_metadata() {
        let tool = ping_tool("http://localhost".into()).to_tool();
        assert_eq!(tool.name, "ping");
        assert_eq!(tool.description.as_deref(), Some(PingTool::DESCRIPTION));
        let annotations = tool.annotations.unwrap();
        assert_eq!(annotations.read_only_hint, Some(true));
        assert_eq!(annotations.open_world_hint, Some(true));
    }

    #[tokio::test]
    async fn test_ping_pong() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(200).set_body_string("pong"))
            .mount(&server)
            .await;

        let result = ping_tool(server.uri()).call(JsonObject::new()).await.unwrap();
        assert!(!result.is_error.unwrap_or(false));
        assert_eq!(result_text(&result), Some("pong"));
    }

    #[tokio::test]
    async fn test_ping_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let result = ping_tool(server.uri()).call(JsonObject::new()).await.unwrap();
        assert!(result.is_error.unwrap_or(false));
        assert_eq!(
            result_text(&result),
            Some("API responded with status 500: Internal Server Error")
        );
    }
}
