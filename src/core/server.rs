//! MCP Server implementation and lifecycle management.
//!
//! [`McpServer`] is the Protocol Front End: it implements rmcp's
//! `ServerHandler` by delegating `tools/list` and `tools/call` to the shared
//! [`ToolRegistry`]. The HTTP transport reuses the same mapping for its
//! JSON-RPC endpoint, so both MCP channels answer identically.

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, model::*, service::RequestContext,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, instrument};

use super::config::Config;
use super::error::Result;
use crate::domains::tools::{ToolError, ToolRegistry};

const INSTRUCTIONS: &str = "Toolbox server. Tools: echo, add, read_file, write_file, \
system_info, web_request, get_weather, sql_query (SELECT only), list_tables, describe_table.";

/// The main MCP server handler.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Registry shared with every transport.
    registry: Arc<ToolRegistry>,
}

impl McpServer {
    /// Create a new MCP server with the given configuration.
    pub fn new(config: Config) -> Result<Self> {
        let config = Arc::new(config);
        let registry = Arc::new(ToolRegistry::from_config(config.clone())?);
        Ok(Self { config, registry })
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// The tool registry behind this server.
    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    /// Run a tool and shape the outcome as an MCP `tools/call` result.
    pub async fn call_tool_mcp(
        &self,
        name: &str,
        arguments: Value,
    ) -> std::result::Result<CallToolResult, McpError> {
        to_call_tool_result(self.registry.call(name, arguments).await)
    }

    /// Server description returned by `initialize`.
    pub fn server_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: self.name().to_string(),
                version: self.version().to_string(),
                ..Implementation::default()
            },
            ..Default::default()
        }
    }
}

/// Map a registry outcome onto MCP.
///
/// Unknown tools and schema failures are protocol errors (`invalid_params`).
/// Everything the tool itself reports is an `isError` result, so the client
/// sees the message without the session failing.
pub fn to_call_tool_result(
    outcome: std::result::Result<Value, ToolError>,
) -> std::result::Result<CallToolResult, McpError> {
    match outcome {
        Ok(Value::String(text)) => Ok(CallToolResult::success(vec![Content::text(text)])),
        Ok(data) => {
            let text = serde_json::to_string_pretty(&data)
                .map_err(|e| McpError::internal_error(e.to_string(), None))?;
            Ok(CallToolResult::success(vec![Content::text(text)]))
        }
        Err(e @ (ToolError::NotFound(_) | ToolError::InvalidArguments(_))) => {
            Err(McpError::invalid_params(e.to_string(), None))
        }
        Err(e) => Ok(CallToolResult::error(vec![Content::text(e.to_string())])),
    }
}

impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        self.server_info()
    }

    #[instrument(skip(self, _context))]
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        info!("Listing tools");
        Ok(ListToolsResult {
            tools: self.registry.list_tools(),
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, _context), fields(tool = %request.name))]
    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        let arguments = request.arguments.map(Value::Object).unwrap_or(Value::Null);
        self.call_tool_mcp(&request.name, arguments).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_server() -> McpServer {
        McpServer::new(Config::default()).unwrap()
    }

    fn text_of(result: &CallToolResult) -> String {
        result.content[0]
            .as_text()
            .map(|t| t.text.clone())
            .unwrap_or_default()
    }

    #[test]
    fn test_server_info_enables_tools_only() {
        let info = test_server().server_info();
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.resources.is_none());
        assert!(info.capabilities.prompts.is_none());
        assert_eq!(info.server_info.name, Config::default().server.name);
    }

    #[tokio::test]
    async fn test_string_data_is_plain_text() {
        let result = test_server()
            .call_tool_mcp("echo", json!({"message": "hello"}))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(false));
        assert_eq!(text_of(&result), "Echo: hello");
    }

    #[tokio::test]
    async fn test_structured_data_is_json_text() {
        let result = test_server()
            .call_tool_mcp("add", json!({"a": 2, "b": 3}))
            .await
            .unwrap();
        let data: Value = serde_json::from_str(&text_of(&result)).unwrap();
        assert_eq!(data, json!({"result": 5, "calculation": "2 + 3 = 5"}));
    }

    #[tokio::test]
    async fn test_unknown_tool_is_invalid_params() {
        let err = test_server()
            .call_tool_mcp("nope", json!({}))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
        assert_eq!(err.message, "unknown tool: nope");
    }

    #[tokio::test]
    async fn test_tool_failure_is_error_result() {
        let result = test_server()
            .call_tool_mcp("sql_query", json!({"query": "DELETE FROM Users"}))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(true));
        assert_eq!(text_of(&result), "only SELECT queries are allowed");
    }
}
