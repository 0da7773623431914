//! Write file tool definition.
//!
//! Creates or overwrites a file with the given text. The write is a single
//! whole-file write; a failure midway is not rolled back.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, instrument, warn};

use crate::core::security::{PathAccess, validate_path};
use crate::domains::tools::{ToolContext, ToolDefinition, ToolError};

/// Parameters for the write file tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct WriteFileParams {
    /// Path of the file to write. The parent directory must exist.
    pub path: String,

    /// Text content to write (replaces any existing content).
    pub content: String,
}

/// Write file tool - creates or overwrites a local file.
pub struct WriteFileTool;

#[async_trait::async_trait]
impl ToolDefinition for WriteFileTool {
    const NAME: &'static str = "write_file";
    const DESCRIPTION: &'static str =
        "Write text content to a local file, creating it or overwriting existing content.";

    type Params = WriteFileParams;

    #[instrument(skip_all, fields(path = %params.path, bytes = params.content.len()))]
    async fn execute(params: WriteFileParams, ctx: &ToolContext) -> Result<Value, ToolError> {
        let path = validate_path(&params.path, &ctx.config, PathAccess::Write)?;

        if path.is_dir() {
            return Err(ToolError::execution_failed(format!(
                "not a file: {}",
                params.path
            )));
        }

        tokio::fs::write(&path, params.content.as_bytes())
            .await
            .map_err(|e| {
                warn!("Failed to write file: {}", e);
                ToolError::execution_failed(format!("cannot write {}: {}", params.path, e))
            })?;

        info!("File written");

        Ok(json!({
            "message": format!("File written successfully to {}", params.path),
            "bytes_written": params.content.len(),
        }))
    }
}
