//! Transport layer for the toolbox server.
//!
//! - **STDIO**: MCP over stdin/stdout - feature: `stdio`
//! - **HTTP**: one REST route per tool plus JSON-RPC over POST - feature: `http`
//!
//! Each transport handles the connection lifecycle and delegates tool work
//! to the shared registry held by [`McpServer`](crate::core::McpServer).

mod config;
mod error;
mod service;

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "stdio")]
pub mod stdio;

pub use config::TransportConfig;
pub use error::{TransportError, TransportResult};
pub use service::TransportService;

#[cfg(feature = "http")]
pub use config::HttpConfig;
