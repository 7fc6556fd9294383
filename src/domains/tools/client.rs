//! HTTP client for the proxied API.
//!
//! Every tool call ends up here: the request is assembled from the tool
//! arguments, sent with `reqwest`, and the response body is returned as text.

use std::sync::LazyLock;
use std::time::Duration;

use regex::{Captures, Regex};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use super::error::{ToolError, ToolResult};

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

static PATH_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^}]+)\}").expect("path parameter pattern is valid"));

/// A request against the API, before URL resolution.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,

    /// Path template relative to the base URL (e.g. `/users/{id}`).
    pub path: String,

    pub path_params: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub cookies: Vec<(String, String)>,

    /// JSON body, sent with `Content-Type: application/json`.
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            path_params: Vec::new(),
            query: Vec::new(),
            headers: Vec::new(),
            cookies: Vec::new(),
            body: None,
        }
    }
}

/// Status and text body of an API response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Message used when a proxied call answers with a non-2xx status.
    pub fn failure_message(&self) -> String {
        format!("HTTP {}: {}", self.status, self.body)
    }
}

/// Client for the API behind the tools.
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: Option<String>,
    bearer_token: Option<String>,
    timeout: Duration,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ApiClient {
    /// Create a client for the given base URL.
    pub fn new(base_url: Option<String>, timeout: Duration) -> ToolResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ToolError::internal(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.map(|url| url.trim_end_matches('/').to_string()),
            bearer_token: None,
            timeout,
        })
    }

    /// Send `Authorization: Bearer <token>` with every request.
    pub fn with_bearer_token(mut self, token: Option<String>) -> Self {
        self.bearer_token = token;
        self
    }

    /// Resolve a path template and query against the base URL.
    ///
    /// Path parameter values are percent-encoded as whole segments, so a `/`
    /// inside a value never introduces a new segment.
    pub fn build_url(
        &self,
        path: &str,
        path_params: &[(String, String)],
        query: &[(String, String)],
    ) -> ToolResult<Url> {
        let base = self.base_url.as_deref().ok_or(ToolError::NoBaseUrl)?;
        let mut url =
            Url::parse(base).map_err(|e| ToolError::InvalidBaseUrl(format!("{}: {}", base, e)))?;

        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ToolError::InvalidBaseUrl(base.to_string()))?;
            segments.pop_if_empty();
            for segment in path.trim_start_matches('/').split('/') {
                segments.push(&fill_segment(segment, path_params));
            }
        }

        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        Ok(url)
    }

    /// Perform the request and read the whole response body as text.
    #[instrument(skip_all, fields(method = %request.method, path = %request.path))]
    pub async fn send(&self, request: ApiRequest) -> ToolResult<ApiResponse> {
        let url = self.build_url(&request.path, &request.path_params, &request.query)?;
        debug!("Calling {} {}", request.method, url);

        let mut builder = self.client.request(request.method, url);

        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if !request.cookies.is_empty() {
            let cookie = request
                .cookies
                .iter()
                .map(|(name, value)| format!("{}={}", name, value))
                .collect::<Vec<_>>()
                .join("; ");
            builder = builder.header(reqwest::header::COOKIE, cookie);
        }
        if let Some(token) = &self.bearer_token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| self.request_error(e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| self.request_error(e))?;

        debug!("API answered {}", status);
        Ok(ApiResponse { status, body })
    }

    fn request_error(&self, err: reqwest::Error) -> ToolError {
        if err.is_timeout() {
            ToolError::Timeout(self.timeout.as_secs())
        } else {
            ToolError::request(err.to_string())
        }
    }
}

/// Substitute `{name}` placeholders in one path segment.
fn fill_segment(segment: &str, path_params: &[(String, String)]) -> String {
    PATH_PARAM
        .replace_all(segment, |caps: &Captures<'_>| {
            path_params
                .iter()
                .find(|(name, _)| name == &caps[1])
                .map(|(_, value)| value.clone())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Render a JSON argument the way it appears in a URL or header.
pub fn param_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Query pairs for one argument; arrays repeat the key.
pub fn query_pairs(name: &str, value: &Value) -> Vec<(String, String)> {
    match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items
            .iter()
            .filter(|v| !v.is_null())
            .map(|v| (name.to_string(), param_to_string(v)))
            .collect(),
        other => vec![(name.to_string(), param_to_string(other))],
    }
}
