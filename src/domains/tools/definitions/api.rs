//! API operation tool.
//!
//! One `ApiTool` is registered per operation of the loaded document. Calling
//! it performs the operation against the API and returns the response body.

use std::sync::Arc;

use reqwest::Method;
use rmcp::model::{CallToolResult, JsonObject, Tool};
use serde_json::Value;
use tracing::{info, instrument};

use super::common::{error_result, response_result};
use crate::domains::openapi::ParamLocation;
use crate::domains::tools::client::{ApiClient, ApiRequest, param_to_string, query_pairs};
use crate::domains::tools::error::{ToolError, ToolResult};
use crate::domains::tools::handlers::ToolHandler;
use crate::domains::tools::mapping::{ToolDefinition, annotations_for};

/// Argument holding the request body.
pub const BODY_ARGUMENT: &str = "body";

/// Tool that proxies a single API operation.
pub struct ApiTool {
    definition: ToolDefinition,
    client: Arc<ApiClient>,
    tool: Tool,
}

impl ApiTool {
    pub fn new(definition: ToolDefinition, client: Arc<ApiClient>) -> Self {
        let tool = Tool {
            name: definition.name.clone().into(),
            description: Some(definition.description.clone().into()),
            input_schema: Arc::new(definition.input_schema.clone()),
            annotations: Some(annotations_for(&definition.operation.method)),
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        };

        Self {
            definition,
            client,
            tool,
        }
    }

    /// Turn tool arguments into an API request.
    ///
    /// Null arguments count as absent.
    pub fn build_request(&self, arguments: &JsonObject) -> ToolResult<ApiRequest> {
        let op = &self.definition.operation;
        let method = Method::from_bytes(op.method.as_bytes())
            .map_err(|e| ToolError::internal(format!("invalid method {}: {}", op.method, e)))?;
        let mut request = ApiRequest::new(method, op.path.clone());

        for param in &op.parameters {
            let Some(value) = arguments.get(&param.name).filter(|v| !v.is_null()) else {
                if param.required {
                    return Err(ToolError::invalid_arguments(format!(
                        "missing required {} parameter '{}'",
                        param.location, param.name
                    )));
                }
                continue;
            };

            let entry = || (param.name.clone(), param_to_string(value));
            match param.location {
                ParamLocation::Path => request.path_params.push(entry()),
                ParamLocation::Query => request.query.extend(query_pairs(&param.name, value)),
                ParamLocation::Header => request.headers.push(entry()),
                ParamLocation::Cookie => request.cookies.push(entry()),
            }
        }

        if let Some(body) = &op.request_body {
            match arguments.get(BODY_ARGUMENT).filter(|v| !v.is_null()) {
                Some(value) => request.body = Some(value.clone()),
                None if body.required => {
                    return Err(ToolError::invalid_arguments(
                        "missing required request body 'body'",
                    ));
                }
                None => {}
            }
        }

        Ok(request)
    }
}

#[async_trait::async_trait]
impl ToolHandler for ApiTool {
    fn name(&self) -> &str {
        &self.definition.name
    }

    fn to_tool(&self) -> Tool {
        self.tool.clone()
    }

    #[instrument(skip_all, fields(tool = %self.definition.name))]
    async fn call(&self, arguments: JsonObject) -> ToolResult<CallToolResult> {
        let request = self.build_request(&arguments)?;
        info!(
            "Tool {} called: {} {}",
            self.definition.name, self.definition.operation.method, self.definition.operation.path
        );

        match self.client.send(request).await {
            Ok(response) => Ok(response_result(response)),
            Err(e) => Ok(error_result(&e.to_string())),
        }
    }
}

/// Interpret a raw JSON value as tool arguments.
pub fn arguments_object(arguments: Value) -> ToolResult<JsonObject> {
    match arguments {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(JsonObject::new()),
        other => Err(ToolError::invalid_arguments(format!(
            "arguments must be an object, got {}",
            other
        ))),
    }
}
