//! Plain data extracted from an OpenAPI document.
//!
//! These types are independent of the parser so the tools domain never has
//! to look at `openapiv3` structures.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A parsed OpenAPI document reduced to what the tool server needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiDocument {
    /// `info.title` of the document.
    pub title: String,

    /// `info.version` of the document.
    pub version: String,

    /// First server URL, variables substituted and trailing `/` trimmed.
    pub base_url: Option<String>,

    /// Operations in document order.
    pub operations: Vec<Operation>,
}

/// One OpenAPI operation (path + method).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Operation {
    pub path: String,

    /// Upper-case HTTP method (`GET`, `POST`, ...).
    pub method: String,

    pub operation_id: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub parameters: Vec<Parameter>,
    pub request_body: Option<RequestBody>,
}

/// Where a parameter is carried in the HTTP request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamLocation {
    Path,
    Query,
    Header,
    Cookie,
}

impl ParamLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Query => "query",
            Self::Header => "header",
            Self::Cookie => "cookie",
        }
    }
}

impl fmt::Display for ParamLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An operation parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub location: ParamLocation,
    pub required: bool,
    pub description: Option<String>,

    /// JSON Schema of the value, `$ref`s already inlined.
    pub schema: Option<Value>,
}

impl Parameter {
    /// Convenience constructor used mostly by tests.
    pub fn new(name: impl Into<String>, location: ParamLocation, required: bool) -> Self {
        Self {
            name: name.into(),
            location,
            required,
            description: None,
            schema: None,
        }
    }

    /// Attach a schema.
    pub fn with_schema(mut self, schema: Value) -> Self {
        self.schema = Some(schema);
        self
    }
}

/// An `application/json` request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestBody {
    pub required: bool,
    pub schema: Value,
}
