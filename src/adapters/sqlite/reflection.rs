//! SQLite schema reflection.
//!
//! Table enumeration goes through `sqlite_master`; column metadata comes
//! from `PRAGMA table_info()`, which reports columns in declaration order
//! (`cid`).

use crate::adapters::ColumnInfo;
use crate::error::{Result, SqlScribeError};
use sqlx::{Row, SqlitePool};

/// Enumerates user tables, lexicographically sorted. Internal
/// `sqlite_*` tables are excluded.
pub(crate) async fn table_names(pool: &SqlitePool) -> Result<Vec<String>> {
    let query = r"
        SELECT name
        FROM sqlite_master
        WHERE type = 'table'
        AND name NOT LIKE 'sqlite_%'
        ORDER BY name
    ";

    let rows = sqlx::query(query)
        .fetch_all(pool)
        .await
        .map_err(|e| SqlScribeError::reflection_failed("Failed to enumerate tables", e))?;

    let mut names = Vec::with_capacity(rows.len());
    for row in &rows {
        let name: String = row
            .try_get("name")
            .map_err(|e| SqlScribeError::reflection_failed("Failed to parse table name", e))?;
        names.push(name);
    }

    tracing::debug!("Reflected {} tables", names.len());
    Ok(names)
}

/// Reflects column names and declared types for one table, in declaration
/// order.
pub(crate) async fn table_columns(pool: &SqlitePool, table: &str) -> Result<Vec<ColumnInfo>> {
    let query = format!("PRAGMA table_info('{}')", table.replace('\'', "''"));

    let rows = sqlx::query(&query).fetch_all(pool).await.map_err(|e| {
        SqlScribeError::reflection_failed(
            format!("Failed to reflect columns for table '{table}'"),
            e,
        )
    })?;

    let mut columns = Vec::with_capacity(rows.len());
    for row in &rows {
        let name: String = row
            .try_get("name")
            .map_err(|e| SqlScribeError::reflection_failed("Failed to parse column name", e))?;
        let data_type: String = row
            .try_get("type")
            .map_err(|e| SqlScribeError::reflection_failed("Failed to parse column type", e))?;
        columns.push(ColumnInfo { name, data_type });
    }

    Ok(columns)
}
