//! Tool handler contract.
//!
//! Every tool under `definitions/` is a unit struct implementing
//! [`ToolDefinition`]: a name, a description, a typed parameter struct
//! (whose JSON schema is the tool's input schema) and an `execute` function.
//! Argument validation happens here, before `execute` runs.

use rmcp::handler::server::tool::cached_schema_for_type;
use rmcp::model::Tool;
use schemars::JsonSchema;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use super::ToolError;
use crate::core::config::Config;

/// Everything a handler may touch besides its own arguments.
///
/// Built once per process and passed by reference, so tests can swap in
/// their own configuration.
#[derive(Clone)]
pub struct ToolContext {
    /// Process-wide configuration.
    pub config: Arc<Config>,

    /// Shared outbound HTTP client carrying the fixed timeout.
    pub http: reqwest::Client,
}

impl ToolContext {
    /// Build a context, including the outbound HTTP client.
    pub fn new(config: Arc<Config>) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_client.timeout_secs))
            .user_agent(config.http_client.user_agent.clone())
            .build()?;
        Ok(Self { config, http })
    }
}

/// Parameters for tools that take no arguments.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct NoParams {}

/// A single named tool.
#[async_trait::async_trait]
pub trait ToolDefinition: Send + Sync + 'static {
    /// Tool name as registered in MCP.
    const NAME: &'static str;

    /// Tool description shown to clients.
    const DESCRIPTION: &'static str;

    /// Typed arguments; their JSON schema is published as the input schema.
    type Params: DeserializeOwned + JsonSchema + Send + 'static;

    /// Run the tool to completion.
    async fn execute(params: Self::Params, ctx: &ToolContext) -> Result<Value, ToolError>;

    /// Validate raw arguments against `Params`.
    fn parse(arguments: Value) -> Result<Self::Params, ToolError> {
        let arguments = match arguments {
            Value::Null => Value::Object(Default::default()),
            Value::Object(map) => Value::Object(map),
            other => {
                return Err(ToolError::invalid_arguments(format!(
                    "arguments must be a JSON object, got {}",
                    json_type_name(&other)
                )));
            }
        };
        serde_json::from_value(arguments).map_err(|e| ToolError::invalid_arguments(e.to_string()))
    }

    /// Create a Tool model for this tool (metadata).
    fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<Self::Params>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
