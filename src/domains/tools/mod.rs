//! Tools domain module.
//!
//! Tools are the only capability this server exposes. Both front ends (MCP
//! and plain HTTP) go through [`ToolRegistry`] and get the same
//! [`ToolResult`] envelope back.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per tool)
//! - `handlers.rs` - The [`ToolDefinition`] contract and [`ToolContext`]
//! - `registry.rs` - Listing and dispatch by name
//! - `envelope.rs` - The `{success, data, error}` result envelope
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/` implementing [`ToolDefinition`]
//! 2. Export it in `definitions/mod.rs`
//! 3. Add a [`ToolKind`] variant; the compiler points at every match to extend
//! 4. Give it a route in `core/transport/http.rs`

pub mod definitions;
mod envelope;
mod error;
mod handlers;
mod registry;

pub use envelope::ToolResult;
pub use error::ToolError;
pub use handlers::{NoParams, ToolContext, ToolDefinition};
pub use registry::{ToolKind, ToolRegistry};
