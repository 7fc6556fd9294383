//! Tool Router - builds the rmcp ToolRouter from the registry.
//!
//! This module builds the ToolRouter for STDIO/TCP transport. Every handler
//! in the registry becomes one dynamic route.

use std::sync::Arc;

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, ToolRouter},
};

use super::handlers::ToolHandler;
use super::registry::ToolRegistry;

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(registry: &ToolRegistry) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    registry
        .handlers()
        .iter()
        .cloned()
        .fold(ToolRouter::new(), |router, handler| {
            router.with_route(create_route(handler))
        })
}

/// Create a ToolRoute that forwards calls to `handler`.
pub fn create_route<S>(handler: Arc<dyn ToolHandler>) -> ToolRoute<S>
where
    S: Send + Sync + 'static,
{
    ToolRoute::new_dyn(handler.to_tool(), move |ctx: ToolCallContext<'_, S>| {
        let args = ctx.arguments.clone().unwrap_or_default();
        let handler = handler.clone();
        async move { handler.call(args).await.map_err(McpError::from) }.boxed()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::client::ApiClient;
    use crate::domains::tools::definitions::PingTool;
    use std::time::Duration;

    struct TestServer {}

    fn client() -> Arc<ApiClient> {
        Arc::new(ApiClient::new(None, Duration::from_secs(1)).unwrap())
    }

    #[test]
    fn test_build_router_empty() {
        let router: ToolRouter<TestServer> = build_tool_router(&ToolRegistry::new());
        assert!(router.list_all().is_empty());
    }

    #[test]
    fn test_build_router() {
        let registry = ToolRegistry::new().with_ping(client());
        let router: ToolRouter<TestServer> = build_tool_router(&registry);
        let tools = router.list_all();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, PingTool::NAME);
    }

    #[test]
    fn test_registry_matches_router() {
        // Ensure registry and router have the same tools
        let registry = ToolRegistry::new().with_ping(client());
        let registry_names = registry.tool_names();

        let router: ToolRouter<TestServer> = build_tool_router(&registry);
        let router_tools = router.list_all();
        let router_names: Vec<_> = router_tools.iter().map(|t| t.name.as_ref()).collect();

        assert_eq!(registry_names.len(), router_names.len());
        for name in registry_names {
            assert!(router_names.contains(&name));
        }
    }
}
