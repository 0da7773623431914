//! Web request tool definition.
//!
//! Issues a single GET and reports status and (truncated) body. A non-2xx
//! status is data, not a failure; only transport errors and timeouts fail.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, instrument, warn};

use crate::domains::tools::{ToolContext, ToolDefinition, ToolError};

/// Parameters for the web request tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct WebRequestParams {
    /// http(s) URL to fetch.
    pub url: String,
}

/// Web request tool - HTTP GET a URL.
pub struct WebRequestTool;

#[async_trait::async_trait]
impl ToolDefinition for WebRequestTool {
    const NAME: &'static str = "web_request";
    const DESCRIPTION: &'static str = "Makes an HTTP GET request to a URL and returns the status code and response text (truncated).";

    type Params = WebRequestParams;

    #[instrument(skip_all, fields(url = %params.url))]
    async fn execute(params: WebRequestParams, ctx: &ToolContext) -> Result<Value, ToolError> {
        let url = reqwest::Url::parse(params.url.trim()).map_err(|e| {
            ToolError::execution_failed(format!("invalid URL '{}': {}", params.url, e))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ToolError::execution_failed(format!(
                "unsupported URL scheme '{}': only http and https are allowed",
                url.scheme()
            )));
        }

        let mut response = ctx.http.get(url).send().await.map_err(|e| {
            warn!("Request failed: {}", e);
            ToolError::from(e)
        })?;

        let status_code = response.status().as_u16();
        let max_chars = ctx.config.http_client.max_content_chars;

        // A UTF-8 char is at most 4 bytes, so this many bytes always hold
        // `max_chars` characters.
        let byte_budget = max_chars.saturating_mul(4);
        let mut raw = Vec::new();
        let mut cut = false;
        while let Some(chunk) = response.chunk().await? {
            raw.extend_from_slice(&chunk);
            if raw.len() > byte_budget {
                raw.truncate(byte_budget);
                cut = true;
                break;
            }
        }

        let body = String::from_utf8_lossy(&raw);
        let (content, truncated) = truncate_chars(&body, max_chars);
        let truncated = truncated || cut;

        info!(status_code, truncated, "Fetched {} bytes", raw.len());

        Ok(json!({
            "url": params.url,
            "status_code": status_code,
            "content": content,
            "truncated": truncated,
        }))
    }
}

/// First `max_chars` characters of `text`, and whether anything was cut.
fn truncate_chars(text: &str, max_chars: usize) -> (&str, bool) {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => (&text[..byte_index], true),
        None => (text, false),
    }
}
