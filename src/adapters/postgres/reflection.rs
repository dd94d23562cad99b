//! PostgreSQL schema reflection via `information_schema`.
//!
//! Table enumeration and column metadata both default to the `public`
//! schema when none is configured. Columns come back in `ordinal_position`
//! order, which is declaration order.

use crate::adapters::ColumnInfo;
use crate::error::{Result, SqlScribeError};
use sqlx::{PgPool, Row};

const DEFAULT_SCHEMA: &str = "public";

/// Enumerates base tables in the given schema, lexicographically sorted.
pub(crate) async fn table_names(pool: &PgPool, schema: Option<&str>) -> Result<Vec<String>> {
    let query = r"
        SELECT table_name
        FROM information_schema.tables
        WHERE table_schema = $1
        AND table_type = 'BASE TABLE'
        ORDER BY table_name
    ";

    let rows = sqlx::query(query)
        .bind(schema.unwrap_or(DEFAULT_SCHEMA))
        .fetch_all(pool)
        .await
        .map_err(|e| SqlScribeError::reflection_failed("Failed to enumerate tables", e))?;

    let mut names = Vec::with_capacity(rows.len());
    for row in &rows {
        let name: String = row
            .try_get("table_name")
            .map_err(|e| SqlScribeError::reflection_failed("Failed to parse table name", e))?;
        names.push(name);
    }

    tracing::debug!(
        "Reflected {} tables in schema '{}'",
        names.len(),
        schema.unwrap_or(DEFAULT_SCHEMA)
    );
    Ok(names)
}

/// Reflects column names and declared types for one table, in declaration
/// order.
pub(crate) async fn table_columns(
    pool: &PgPool,
    table: &str,
    schema: Option<&str>,
) -> Result<Vec<ColumnInfo>> {
    let query = r"
        SELECT column_name, data_type
        FROM information_schema.columns
        WHERE table_schema = $1
        AND table_name = $2
        ORDER BY ordinal_position
    ";

    let rows = sqlx::query(query)
        .bind(schema.unwrap_or(DEFAULT_SCHEMA))
        .bind(table)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            SqlScribeError::reflection_failed(
                format!("Failed to reflect columns for table '{table}'"),
                e,
            )
        })?;

    let mut columns = Vec::with_capacity(rows.len());
    for row in &rows {
        let name: String = row
            .try_get("column_name")
            .map_err(|e| SqlScribeError::reflection_failed("Failed to parse column name", e))?;
        let data_type: String = row
            .try_get("data_type")
            .map_err(|e| SqlScribeError::reflection_failed("Failed to parse column type", e))?;
        columns.push(ColumnInfo { name, data_type });
    }

    Ok(columns)
}
