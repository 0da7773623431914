//! SQL query tool definition.
//!
//! Runs a single read-only query and returns its rows.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use sqlx::{Column, Connection, Executor, Statement};
use tracing::{info, instrument, warn};

use super::guard::{
    MULTIPLE_STATEMENTS_MESSAGE, REJECTION_MESSAGE, is_read_only, is_single_statement,
};
use super::{connect, row_to_json};
use crate::domains::tools::{ToolContext, ToolDefinition, ToolError};

/// Parameters for the SQL query tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SqlQueryParams {
    /// SQL SELECT query to execute.
    pub query: String,
}

/// SQL query tool - executes a SELECT against the configured database.
pub struct SqlQueryTool;

#[async_trait::async_trait]
impl ToolDefinition for SqlQueryTool {
    const NAME: &'static str = "sql_query";
    const DESCRIPTION: &'static str = "Execute a read-only SQL query (SELECT or WITH ... SELECT) against the configured database. Returns column names, row count and rows.";

    type Params = SqlQueryParams;

    #[instrument(skip_all, fields(query_len = params.query.len()))]
    async fn execute(params: SqlQueryParams, ctx: &ToolContext) -> Result<Value, ToolError> {
        let query = params.query.trim();

        if !is_read_only(query) {
            warn!("Rejected non read-only query");
            return Err(ToolError::rejected(REJECTION_MESSAGE));
        }
        if !is_single_statement(query) {
            warn!("Rejected multi-statement query");
            return Err(ToolError::rejected(MULTIPLE_STATEMENTS_MESSAGE));
        }

        let mut conn = connect(&ctx.config.database, true).await?;

        let outcome = async {
            let statement = (&mut conn).prepare(query).await?;
            let columns: Vec<String> = statement
                .columns()
                .iter()
                .map(|c| c.name().to_string())
                .collect();
            let rows = statement.query().fetch_all(&mut conn).await?;
            Ok::<_, ToolError>((columns, rows))
        }
        .await;

        // Release the connection whatever the outcome.
        let close = conn.close().await;
        let (columns, rows) = outcome?;
        close?;

        let results = rows
            .iter()
            .map(|row| row_to_json(row).map(Value::Object))
            .collect::<Result<Vec<_>, _>>()?;

        info!("Query returned {} rows", results.len());

        Ok(json!({
            "query": query,
            "row_count": results.len(),
            "columns": columns,
            "results": results,
        }))
    }
}
