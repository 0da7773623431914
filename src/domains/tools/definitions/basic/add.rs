//! Add tool definition.
//!
//! Integer inputs stay integers; if either input is a float (or an integer
//! sum overflows 64 bits) the sum is computed in `f64`.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Number, Value, json};
use tracing::info;

use crate::domains::tools::{ToolContext, ToolDefinition, ToolError};

/// Parameters for the add tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AddParams {
    /// First number.
    #[schemars(with = "f64")]
    pub a: Number,

    /// Second number.
    #[schemars(with = "f64")]
    pub b: Number,
}

/// Add tool - sums two numbers.
pub struct AddTool;

#[async_trait::async_trait]
impl ToolDefinition for AddTool {
    const NAME: &'static str = "add";
    const DESCRIPTION: &'static str = "Adds two numbers and shows the calculation.";

    type Params = AddParams;

    async fn execute(params: AddParams, _ctx: &ToolContext) -> Result<Value, ToolError> {
        let result = add_numbers(&params.a, &params.b)?;
        let calculation = format!("{} + {} = {}", params.a, params.b, result);
        info!("{}", calculation);

        Ok(json!({
            "result": result,
            "calculation": calculation,
        }))
    }
}

fn add_numbers(a: &Number, b: &Number) -> Result<Number, ToolError> {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        if let Some(sum) = x.checked_add(y) {
            return Ok(sum.into());
        }
    }

    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        if let Some(sum) = x.checked_add(y) {
            return Ok(sum.into());
        }
    }

    let sum = a.as_f64().unwrap_or(f64::NAN) + b.as_f64().unwrap_or(f64::NAN);
    Number::from_f64(sum)
        .ok_or_else(|| ToolError::execution_failed(format!("{} + {} is not a finite number", a, b)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;
    use std::sync::Arc;

    async fn add(args: Value) -> Result<Value, ToolError> {
        let ctx = ToolContext::new(Arc::new(Config::default())).unwrap();
        AddTool::execute(AddTool::parse(args)?, &ctx).await
    }

    #[tokio::test]
    async fn test_integers() {
        let data = add(json!({"a": 25, "b": 17})).await.unwrap();
        assert_eq!(data, json!({"result": 42, "calculation": "25 + 17 = 42"}));
        assert!(data["result"].is_i64());
    }

    #[tokio::test]
    async fn test_negative_integers() {
        let data = add(json!({"a": -5, "b": 3})).await.unwrap();
        assert_eq!(data["result"], -2);
        assert_eq!(data["calculation"], "-5 + 3 = -2");
    }

    #[tokio::test]
    async fn test_float_promotion() {
        let data = add(json!({"a": 2, "b": 0.5})).await.unwrap();
        assert_eq!(data["result"], 2.5);
        assert!(data["result"].is_f64());
        assert_eq!(data["calculation"], "2 + 0.5 = 2.5");

        let data = add(json!({"a": 1.5, "b": 1.5})).await.unwrap();
        assert!(data["result"].is_f64());
        assert_eq!(data["calculation"], "1.5 + 1.5 = 3.0");
    }

    #[tokio::test]
    async fn test_integer_overflow_falls_back_to_float() {
        let data = add(json!({"a": u64::MAX, "b": u64::MAX})).await.unwrap();
        assert!(data["result"].is_f64());
    }

    #[tokio::test]
    async fn test_large_unsigned() {
        let data = add(json!({"a": u64::MAX - 1, "b": 1})).await.unwrap();
        assert_eq!(data["result"], u64::MAX);
    }

    #[tokio::test]
    async fn test_missing_argument() {
        let err = add(json!({"a": 1})).await.unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("missing field `b`"));
    }

    #[tokio::test]
    async fn test_wrong_type() {
        let err = add(json!({"a": "one", "b": 2})).await.unwrap_err();
        assert!(err.is_validation());
    }
}
