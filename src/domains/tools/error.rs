//! Tool-specific error types.
//!
//! The `Display` text of each variant is exactly what callers see in the
//! `error` field of a failed result envelope.

use thiserror::Error;

use crate::core::security::PathSecurityError;

/// Errors that can occur during tool operations.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The requested tool was not found.
    #[error("unknown tool: {0}")]
    NotFound(String),

    /// Arguments did not match the tool's input schema.
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// A policy check refused the call before any side effect.
    #[error("{0}")]
    Rejected(String),

    /// The tool ran but the external system reported a failure.
    #[error("{0}")]
    ExecutionFailed(String),

    /// An outbound request exceeded the configured timeout.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The database driver reported an error.
    #[error("database error: {0}")]
    Database(String),

    /// An internal error occurred (including a panicking handler).
    #[error("internal error: {0}")]
    Internal(String),
}

impl ToolError {
    /// Create a new "not found" error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Create a new "invalid arguments" error.
    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }

    /// Create a new "rejected" error.
    pub fn rejected(msg: impl Into<String>) -> Self {
        Self::Rejected(msg.into())
    }

    /// Create a new "execution failed" error.
    pub fn execution_failed(msg: impl Into<String>) -> Self {
        Self::ExecutionFailed(msg.into())
    }

    /// Create a new "internal" error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether the call failed schema validation (as opposed to at runtime).
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidArguments(_))
    }
}

impl From<PathSecurityError> for ToolError {
    fn from(err: PathSecurityError) -> Self {
        Self::ExecutionFailed(err.to_string())
    }
}

impl From<reqwest::Error> for ToolError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            let target = err
                .url()
                .map(|u| u.to_string())
                .unwrap_or_else(|| "upstream".to_string());
            Self::Timeout(target)
        } else {
            Self::ExecutionFailed(format!("request failed: {}", err))
        }
    }
}

impl From<sqlx::Error> for ToolError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_caller_facing() {
        assert_eq!(ToolError::not_found("nope").to_string(), "unknown tool: nope");
        assert_eq!(
            ToolError::rejected("only SELECT queries are allowed").to_string(),
            "only SELECT queries are allowed"
        );
        assert_eq!(
            ToolError::invalid_arguments("missing field `a`").to_string(),
            "invalid arguments: missing field `a`"
        );
    }

    #[test]
    fn test_is_validation() {
        assert!(ToolError::invalid_arguments("x").is_validation());
        assert!(!ToolError::execution_failed("x").is_validation());
        assert!(!ToolError::not_found("x").is_validation());
    }

    #[test]
    fn test_path_error_becomes_execution_failure() {
        let err: ToolError = PathSecurityError::PathNotFound {
            path: "/tmp/missing.txt".into(),
        }
        .into();
        assert_eq!(err.to_string(), "file not found: /tmp/missing.txt");
    }
}
