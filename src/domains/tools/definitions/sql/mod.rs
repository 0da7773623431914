//! Database tools.
//!
//! Every call opens its own connection from `config.database.url` and closes
//! it before returning; nothing is pooled or cached between calls. Table
//! and column metadata is read live from the database catalog.

pub mod describe_table;
pub mod guard;
pub mod list_tables;
pub mod query;

pub use describe_table::{DescribeTableParams, DescribeTableTool};
pub use list_tables::ListTablesTool;
pub use query::{SqlQueryParams, SqlQueryTool};

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Serialize;
use serde_json::{Map, Value};
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteRow};
use sqlx::{Column, Connection, Row, TypeInfo, ValueRef};
use std::str::FromStr;
use tracing::debug;

use crate::core::config::DatabaseConfig;
use crate::domains::tools::ToolError;

/// Schema name SQLite uses for the primary database.
pub const DEFAULT_SCHEMA: &str = "main";

/// A base table visible to the configured connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatabaseTableInfo {
    pub schema: String,
    pub name: String,
    #[serde(rename = "type")]
    pub table_type: String,
    pub full_name: String,
}

/// One column of a described table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatabaseColumnInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: String,
    pub nullable: bool,
    pub default: Option<String>,
}

/// Open a fresh connection for a single tool call.
pub async fn connect(
    config: &DatabaseConfig,
    read_only: bool,
) -> Result<SqliteConnection, ToolError> {
    let options = SqliteConnectOptions::from_str(&config.url)?.read_only(read_only);
    debug!(read_only, "Opening database connection");
    Ok(SqliteConnection::connect_with(&options).await?)
}

/// Convert a result row into a JSON object keyed by column name.
///
/// Values keep their SQLite storage class: INTEGER and REAL become JSON
/// numbers, TEXT a string, BLOB a base64 string, NULL `null`.
pub fn row_to_json(row: &SqliteRow) -> Result<Map<String, Value>, ToolError> {
    let mut object = Map::with_capacity(row.columns().len());

    for (index, column) in row.columns().iter().enumerate() {
        let raw = row.try_get_raw(index)?;
        let value = if raw.is_null() {
            Value::Null
        } else {
            match raw.type_info().name() {
                "INTEGER" | "BOOLEAN" => Value::from(row.try_get_unchecked::<i64, _>(index)?),
                "REAL" => serde_json::Number::from_f64(row.try_get_unchecked::<f64, _>(index)?)
                    .map(Value::Number)
                    .unwrap_or(Value::Null),
                "BLOB" => Value::String(BASE64.encode(row.try_get_unchecked::<Vec<u8>, _>(index)?)),
                _ => Value::String(row.try_get_unchecked::<String, _>(index)?),
            }
        };
        object.insert(column.name().to_string(), value);
    }

    Ok(object)
}

/// Split `schema.table` into its parts, defaulting the schema.
pub fn split_table_name(table_name: &str) -> (&str, &str) {
    match table_name.split_once('.') {
        Some((schema, table)) if !schema.is_empty() && !table.is_empty() => (schema, table),
        _ => (DEFAULT_SCHEMA, table_name),
    }
}
