//! Toolbox Server Library
//!
//! A small set of tools (echo, arithmetic, file access, HTTP fetch, weather,
//! read-only SQL) served two ways: over the Model Context Protocol and as a
//! REST API. Both front ends share one tool registry and one result
//! envelope, `{success, data, error}`.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, path security, the MCP server
//!   handler and the transports (stdio, HTTP)
//! - **domains::tools**: the tool registry, the result envelope and one file
//!   per tool
//!
//! # Example
//!
//! ```rust,no_run
//! use toolbox_server::{core::Config, domains::tools::ToolRegistry};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let registry = ToolRegistry::from_config(Arc::new(Config::from_env()?))?;
//!     let result = registry
//!         .invoke("add", serde_json::json!({"a": 25, "b": 17}))
//!         .await;
//!     println!("{}", serde_json::to_string(&result)?);
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
pub use domains::tools::{ToolRegistry, ToolResult};
