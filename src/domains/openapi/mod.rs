//! OpenAPI domain module.
//!
//! Turns an OpenAPI 3.x document into the flat list of operations the tools
//! domain registers as MCP tools.
//!
//! ## Architecture
//!
//! - `loader.rs` - Reading (file / URL), format detection and version check
//! - `extract.rs` - Operation extraction and `$ref` resolution
//! - `model.rs` - Parser-independent operation types
//! - `error.rs` - OpenAPI-specific error types

mod error;
mod extract;
mod loader;
mod model;

pub use error::{OpenApiError, OpenApiResult};
pub use loader::{fetch_from_url, load, load_from_file, parse_document};
pub use model::{ApiDocument, Operation, ParamLocation, Parameter, RequestBody};
