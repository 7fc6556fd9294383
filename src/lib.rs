//! OpenAPI MCP Server Library
//!
//! A Model Context Protocol (MCP) server whose tools are generated at
//! start-up from an OpenAPI 3.x document. Each operation becomes one tool;
//! calling the tool performs the HTTP request and returns the response body.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, the server and its transports
//! - **domains**: business logic organized by bounded contexts
//!   - **openapi**: loading the document and extracting its operations
//!   - **tools**: mapping operations to tools and calling the API
//!
//! # Example
//!
//! ```rust,no_run
//! use openapi_mcp_server::core::{Config, TransportService, build_server};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut config = Config::from_env();
//!     config.api.spec = Some("openapi.yaml".to_string());
//!
//!     let transport = TransportService::new(config.transport.clone());
//!     let server = build_server(config).await?;
//!     transport.run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
