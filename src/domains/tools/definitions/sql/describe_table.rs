//! Describe table tool definition.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use sqlx::Connection;
use sqlx::sqlite::SqliteConnection;
use tracing::{debug, info, instrument};

use super::{DEFAULT_SCHEMA, DatabaseColumnInfo, connect, split_table_name};
use crate::domains::tools::{ToolContext, ToolDefinition, ToolError};

const DESCRIBE_SQL: &str = "SELECT name, type, \"notnull\", dflt_value \
     FROM pragma_table_info(?1, ?2) ORDER BY cid";

/// Parameters for the describe table tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DescribeTableParams {
    /// Name of the table to describe, optionally schema-qualified (`main.users`).
    pub table_name: String,
}

/// Describe table tool - returns the columns of one table in ordinal order.
pub struct DescribeTableTool;

#[async_trait::async_trait]
impl ToolDefinition for DescribeTableTool {
    const NAME: &'static str = "describe_table";
    const DESCRIPTION: &'static str =
        "Describe the structure of a table: column names, types, nullability and defaults.";

    type Params = DescribeTableParams;

    #[instrument(skip_all, fields(table = %params.table_name))]
    async fn execute(params: DescribeTableParams, ctx: &ToolContext) -> Result<Value, ToolError> {
        let name = params.table_name.trim();
        let (schema, table) = split_table_name(name);

        let mut conn = connect(&ctx.config.database, true).await?;
        let mut rows = table_columns(&mut conn, schema, table).await;
        // `a.b` may also be a table in `main` whose name contains a dot.
        if table != name && matches!(rows, Ok(ref found) if found.is_empty()) {
            rows = table_columns(&mut conn, DEFAULT_SCHEMA, name).await;
        }
        conn.close().await?;
        let rows = rows?;

        if rows.is_empty() {
            return Err(ToolError::execution_failed(format!(
                "table not found: {}",
                params.table_name
            )));
        }

        let columns: Vec<DatabaseColumnInfo> = rows
            .into_iter()
            .map(|(name, column_type, not_null, default)| DatabaseColumnInfo {
                name,
                column_type,
                nullable: not_null == 0,
                default,
            })
            .collect();

        info!("Described {} columns", columns.len());

        Ok(json!({
            "table_name": params.table_name,
            "column_count": columns.len(),
            "columns": columns,
        }))
    }
}

type ColumnRow = (String, String, i64, Option<String>);

/// Column rows of `schema.table`; an unknown schema reads as no columns.
async fn table_columns(
    conn: &mut SqliteConnection,
    schema: &str,
    table: &str,
) -> Result<Vec<ColumnRow>, ToolError> {
    let rows = sqlx::query_as::<_, ColumnRow>(DESCRIBE_SQL)
        .bind(table)
        .bind(schema)
        .fetch_all(conn)
        .await;
    match rows {
        Ok(rows) => Ok(rows),
        Err(sqlx::Error::Database(e)) if e.message().contains("unknown database") => {
            debug!(schema, "Unknown schema");
            Ok(Vec::new())
        }
        Err(e) => Err(e.into()),
    }
}
