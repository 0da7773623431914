//! Result envelope shared by every front end.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ToolError;

/// Outcome of one tool invocation.
///
/// Exactly one of `data` / `error` is populated. Both fields are always
/// serialized so callers can rely on the shape
/// `{"success": bool, "data": ..., "error": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Whether the execution was successful.
    pub success: bool,

    /// The result data from the tool (present iff `success`).
    pub data: Option<Value>,

    /// Error message (present iff not `success`).
    pub error: Option<String>,
}

impl ToolResult {
    /// Create a successful result.
    pub fn success(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create a failed result.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

impl From<Result<Value, ToolError>> for ToolResult {
    fn from(outcome: Result<Value, ToolError>) -> Self {
        match outcome {
            Ok(data) => Self::success(data),
            Err(e) => Self::failure(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_serializes_null_error() {
        let result = ToolResult::success(json!({"result": 42}));
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"success": true, "data": {"result": 42}, "error": null})
        );
    }

    #[test]
    fn test_failure_serializes_null_data() {
        let result = ToolResult::failure("only SELECT queries are allowed");
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"success": false, "data": null, "error": "only SELECT queries are allowed"})
        );
    }

    #[test]
    fn test_from_outcome() {
        let ok: ToolResult = Ok(json!("Echo: hi")).into();
        assert!(ok.success);
        assert_eq!(ok.data, Some(json!("Echo: hi")));

        let err: ToolResult = Err(ToolError::not_found("teleport")).into();
        assert!(!err.success);
        assert!(err.data.is_none());
        assert_eq!(err.error.as_deref(), Some("unknown tool: teleport"));
    }
}
