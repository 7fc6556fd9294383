//! Tools domain module.
//!
//! Tools are not written by hand: every operation of the loaded OpenAPI
//! document is mapped to one tool that performs the HTTP request.
//!
//! ## Architecture
//!
//! - `mapping.rs` - Tool names, descriptions and input schemas
//! - `client.rs` - HTTP client for the proxied API
//! - `definitions/` - Tool implementations (`ApiTool`, `PingTool`)
//! - `handlers.rs` - The `ToolHandler` trait
//! - `router.rs` - Dynamic ToolRouter builder for STDIO/TCP transport
//! - `registry.rs` - Central tool registry and HTTP dispatch
//! - `error.rs` - Tool-specific error types

pub mod client;
pub mod definitions;
mod error;
mod handlers;
pub mod mapping;
mod registry;
pub mod router;

pub use client::{ApiClient, DEFAULT_TIMEOUT_SECS};
pub use error::{ToolError, ToolResult};
pub use handlers::ToolHandler;
pub use mapping::{ToolDefinition, operations_to_definitions};
pub use registry::ToolRegistry;
pub use router::build_tool_router;
