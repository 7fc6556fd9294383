//! Tool definitions module.
//!
//! - `api.rs` - One tool per operation of the loaded document
//! - `ping.rs` - The opt-in `ping` example tool
//! - `common.rs` - Result helpers shared by both

pub mod api;
pub mod common;
pub mod ping;

pub use api::{ApiTool, arguments_object};
pub use ping::{PingParams, PingTool};
