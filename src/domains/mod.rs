//! Domains module containing business logic organized by bounded contexts.
//!
//! - **openapi**: loading and reading the API description
//! - **tools**: the MCP tools generated from it

pub mod openapi;
pub mod tools;
