//! List tables tool definition.

use serde_json::{Value, json};
use sqlx::Connection;
use tracing::{info, instrument};

use super::{DEFAULT_SCHEMA, DatabaseTableInfo, connect};
use crate::domains::tools::{NoParams, ToolContext, ToolDefinition, ToolError};

/// User tables of the primary schema; SQLite's own `sqlite_*` tables are hidden.
const LIST_TABLES_SQL: &str = "SELECT name FROM sqlite_master \
     WHERE type = 'table' AND name NOT LIKE 'sqlite\\_%' ESCAPE '\\' \
     ORDER BY name";

/// List tables tool - enumerates the base tables of the configured database.
pub struct ListTablesTool;

#[async_trait::async_trait]
impl ToolDefinition for ListTablesTool {
    const NAME: &'static str = "list_tables";
    const DESCRIPTION: &'static str =
        "List all base tables in the configured database with their schema and full name.";

    type Params = NoParams;

    #[instrument(skip_all)]
    async fn execute(_params: NoParams, ctx: &ToolContext) -> Result<Value, ToolError> {
        let mut conn = connect(&ctx.config.database, true).await?;
        let names = sqlx::query_scalar::<_, String>(LIST_TABLES_SQL)
            .fetch_all(&mut conn)
            .await;
        conn.close().await?;
        let names = names?;

        let tables: Vec<DatabaseTableInfo> = names
            .into_iter()
            .map(|name| DatabaseTableInfo {
                schema: DEFAULT_SCHEMA.to_string(),
                full_name: format!("{}.{}", DEFAULT_SCHEMA, name),
                table_type: "BASE TABLE".to_string(),
                name,
            })
            .collect();

        info!("Listed {} tables", tables.len());

        Ok(json!({
            "database": ctx.config.database.display_name(),
            "table_count": tables.len(),
            "tables": tables,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::super::DescribeTableTool;
    use super::super::describe_table::DescribeTableParams;
    use super::super::test_support::TestDatabase;
    use super::*;

    #[tokio::test]
    async fn test_lists_user_tables_in_order() {
        let db = TestDatabase::new().await;
        let data = ListTablesTool::execute(NoParams::default(), &db.ctx)
            .await
            .unwrap();

        assert_eq!(data["database"], "shop");
        assert_eq!(data["table_count"], 2);
        assert_eq!(
            data["tables"],
            json!([
                {"schema": "main", "name": "orders", "type": "BASE TABLE", "full_name": "main.orders"},
                {"schema": "main", "name": "users", "type": "BASE TABLE", "full_name": "main.users"},
            ])
        );
    }

    #[tokio::test]
    async fn test_every_listed_table_can_be_described() {
        let db = TestDatabase::new().await;
        let data = ListTablesTool::execute(NoParams::default(), &db.ctx)
            .await
            .unwrap();

        for table in data["tables"].as_array().unwrap() {
            let full_name = table["full_name"].as_str().unwrap().to_string();
            let described = DescribeTableTool::execute(
                DescribeTableParams {
                    table_name: full_name.clone(),
                },
                &db.ctx,
            )
            .await;
            assert!(described.is_ok(), "describe failed for {}", full_name);
        }
    }

    #[tokio::test]
    async fn test_connection_failure() {
        let mut config = crate::core::config::Config::default();
        config.database.url = "sqlite:///definitely/not/here.db".to_string();
        let ctx = ToolContext::new(std::sync::Arc::new(config)).unwrap();

        let err = ListTablesTool::execute(NoParams::default(), &ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Database(_)));
    }
}
