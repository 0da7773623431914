//! Read file tool definition.
//!
//! Returns the whole content of a UTF-8 text file.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::core::security::{PathAccess, validate_path};
use crate::domains::tools::{ToolContext, ToolDefinition, ToolError};

/// Parameters for the read file tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ReadFileParams {
    /// Path of the file to read.
    pub path: String,
}

/// Read file tool - returns a local text file's content.
pub struct ReadFileTool;

#[async_trait::async_trait]
impl ToolDefinition for ReadFileTool {
    const NAME: &'static str = "read_file";
    const DESCRIPTION: &'static str = "Read the content of a local text file.";

    type Params = ReadFileParams;

    #[instrument(skip_all, fields(path = %params.path))]
    async fn execute(params: ReadFileParams, ctx: &ToolContext) -> Result<Value, ToolError> {
        let path = validate_path(&params.path, &ctx.config, PathAccess::Read)?;

        if path.is_dir() {
            return Err(ToolError::execution_failed(format!(
                "not a file: {}",
                params.path
            )));
        }

        let bytes = tokio::fs::read(&path).await.map_err(|e| {
            warn!("Failed to read file: {}", e);
            ToolError::execution_failed(format!("cannot read {}: {}", params.path, e))
        })?;

        let content = String::from_utf8(bytes)
            .map_err(|_| ToolError::execution_failed(format!("not a text file: {}", params.path)))?;

        info!("Read {} bytes", content.len());

        Ok(Value::String(content))
    }
}
