//! Echo tool definition.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::domains::tools::{ToolContext, ToolDefinition, ToolError};

/// Parameters for the echo tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct EchoParams {
    /// Message to echo back.
    pub message: String,
}

/// Echo tool - returns the message prefixed with `Echo: `.
pub struct EchoTool;

#[async_trait::async_trait]
impl ToolDefinition for EchoTool {
    const NAME: &'static str = "echo";
    const DESCRIPTION: &'static str = "Echoes back the input message.";

    type Params = EchoParams;

    async fn execute(params: EchoParams, _ctx: &ToolContext) -> Result<Value, ToolError> {
        info!("Echo tool called ({} chars)", params.message.len());
        Ok(Value::String(format!("Echo: {}", params.message)))
    }
}
