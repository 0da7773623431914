//! Tool Registry - central registration and dispatch for all tools.
//!
//! This module provides:
//! - [`ToolKind`], the closed set of tools (adding one is a compile error
//!   until every match below handles it)
//! - [`ToolRegistry`], the single seam both front ends call: `list_tools`
//!   and `invoke`

use futures::FutureExt;
use rmcp::model::Tool;
use serde_json::Value;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{info, warn};

use super::definitions::{
    AddTool, DescribeTableTool, EchoTool, ListTablesTool, ReadFileTool, SqlQueryTool,
    SystemInfoTool, WeatherTool, WebRequestTool, WriteFileTool,
};
use super::{ToolContext, ToolDefinition, ToolError, ToolResult};
use crate::core::config::Config;

// ============================================================================
// Tool Kind
// ============================================================================

/// Every tool this server knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    Echo,
    Add,
    ReadFile,
    WriteFile,
    SystemInfo,
    WebRequest,
    GetWeather,
    SqlQuery,
    ListTables,
    DescribeTable,
}

impl ToolKind {
    /// All tools, in the order they are listed to clients.
    pub const ALL: [ToolKind; 10] = [
        ToolKind::Echo,
        ToolKind::Add,
        ToolKind::ReadFile,
        ToolKind::WriteFile,
        ToolKind::SystemInfo,
        ToolKind::WebRequest,
        ToolKind::GetWeather,
        ToolKind::SqlQuery,
        ToolKind::ListTables,
        ToolKind::DescribeTable,
    ];

    /// Registered tool name.
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Echo => EchoTool::NAME,
            ToolKind::Add => AddTool::NAME,
            ToolKind::ReadFile => ReadFileTool::NAME,
            ToolKind::WriteFile => WriteFileTool::NAME,
            ToolKind::SystemInfo => SystemInfoTool::NAME,
            ToolKind::WebRequest => WebRequestTool::NAME,
            ToolKind::GetWeather => WeatherTool::NAME,
            ToolKind::SqlQuery => SqlQueryTool::NAME,
            ToolKind::ListTables => ListTablesTool::NAME,
            ToolKind::DescribeTable => DescribeTableTool::NAME,
        }
    }

    /// Look a tool up by its registered name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Tool metadata (name, description, input schema).
    pub fn to_tool(self) -> Tool {
        match self {
            ToolKind::Echo => EchoTool::to_tool(),
            ToolKind::Add => AddTool::to_tool(),
            ToolKind::ReadFile => ReadFileTool::to_tool(),
            ToolKind::WriteFile => WriteFileTool::to_tool(),
            ToolKind::SystemInfo => SystemInfoTool::to_tool(),
            ToolKind::WebRequest => WebRequestTool::to_tool(),
            ToolKind::GetWeather => WeatherTool::to_tool(),
            ToolKind::SqlQuery => SqlQueryTool::to_tool(),
            ToolKind::ListTables => ListTablesTool::to_tool(),
            ToolKind::DescribeTable => DescribeTableTool::to_tool(),
        }
    }

    /// Whether the tool accepts any arguments at all.
    pub fn takes_arguments(self) -> bool {
        !matches!(self, ToolKind::SystemInfo | ToolKind::ListTables)
    }
}

// ============================================================================
// Tool Registry
// ============================================================================

/// Tool registry - lists tools and dispatches calls by name.
pub struct ToolRegistry {
    ctx: ToolContext,
}

impl ToolRegistry {
    /// Create a registry around an existing handler context.
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }

    /// Create a registry from configuration, building the HTTP client.
    pub fn from_config(config: Arc<Config>) -> crate::core::Result<Self> {
        Ok(Self::new(ToolContext::new(config)?))
    }

    /// Get all tools as Tool models, in a fixed order.
    pub fn list_tools(&self) -> Vec<Tool> {
        ToolKind::ALL.into_iter().map(ToolKind::to_tool).collect()
    }

    /// Invoke a tool by name and wrap the outcome in a result envelope.
    ///
    /// Never fails: unknown names, invalid arguments, handler errors and
    /// handler panics all become `success: false`.
    pub async fn invoke(&self, name: &str, arguments: Value) -> ToolResult {
        self.call(name, arguments).await.into()
    }

    /// Invoke a tool by name, keeping the error kind for the caller.
    pub async fn call(&self, name: &str, arguments: Value) -> Result<Value, ToolError> {
        let Some(kind) = ToolKind::from_name(name) else {
            warn!("Unknown tool requested: {}", name);
            return Err(ToolError::not_found(name));
        };
        self.call_kind(kind, arguments).await
    }

    /// Invoke a known tool.
    pub async fn call_kind(&self, kind: ToolKind, arguments: Value) -> Result<Value, ToolError> {
        info!(tool = kind.name(), "Tool call");

        let ctx = &self.ctx;
        let outcome = AssertUnwindSafe(async move {
            match kind {
                ToolKind::Echo => run::<EchoTool>(arguments, ctx).await,
                ToolKind::Add => run::<AddTool>(arguments, ctx).await,
                ToolKind::ReadFile => run::<ReadFileTool>(arguments, ctx).await,
                ToolKind::WriteFile => run::<WriteFileTool>(arguments, ctx).await,
                ToolKind::SystemInfo => run::<SystemInfoTool>(arguments, ctx).await,
                ToolKind::WebRequest => run::<WebRequestTool>(arguments, ctx).await,
                ToolKind::GetWeather => run::<WeatherTool>(arguments, ctx).await,
                ToolKind::SqlQuery => run::<SqlQueryTool>(arguments, ctx).await,
                ToolKind::ListTables => run::<ListTablesTool>(arguments, ctx).await,
                ToolKind::DescribeTable => run::<DescribeTableTool>(arguments, ctx).await,
            }
        })
        .catch_unwind()
        .await
        .unwrap_or_else(|panic| Err(ToolError::internal(panic_message(panic.as_ref()))));

        if let Err(ref e) = outcome {
            warn!(tool = kind.name(), "Tool call failed: {}", e);
        }
        outcome
    }
}

/// Validate arguments, then execute.
async fn run<T: ToolDefinition>(arguments: Value, ctx: &ToolContext) -> Result<Value, ToolError> {
    let params = T::parse(arguments)?;
    T::execute(params, ctx).await
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("tool panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("tool panicked: {}", s)
    } else {
        "tool panicked".to_string()
    }
}
