//! SQLite database adapter.
//!
//! # Module Structure
//! - `connection`: connection string validation and pool creation
//! - `reflection`: table and column metadata via `sqlite_master` and PRAGMA
//! - `execution`: transactional statement execution with typed decoding
//!
//! SQLite has no session schema directive, so a configured schema name is
//! ignored by this adapter.

pub mod connection;
pub mod execution;
pub mod reflection;

use super::{ColumnInfo, DatabaseAdapter, Dialect};
use crate::error::{Result, SqlScribeError};
use crate::value::Row;
use async_trait::async_trait;
use sqlx::SqlitePool;

/// SQLite adapter. A single pooled connection is sufficient for this
/// backend; the pool exists for uniform lifetime management.
pub struct SqliteAdapter {
    pub(crate) pool: SqlitePool,
    connection_string: String,
}

impl std::fmt::Debug for SqliteAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteAdapter")
            .field("in_memory", &self.is_in_memory())
            // connection_string intentionally omitted
            .finish_non_exhaustive()
    }
}

impl SqliteAdapter {
    /// Checks whether this adapter points at an in-memory database.
    pub fn is_in_memory(&self) -> bool {
        self.connection_string.contains(":memory:")
            || self.connection_string.contains("mode=memory")
    }
}

#[async_trait]
impl DatabaseAdapter for SqliteAdapter {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    async fn ping(&self) -> Result<()> {
        let result: i32 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| SqlScribeError::connection_failed("SQLite liveness check failed", e))?;

        if result != 1 {
            return Err(SqlScribeError::configuration(
                "Liveness check returned unexpected result",
            ));
        }
        Ok(())
    }

    async fn table_names(&self, _schema: Option<&str>) -> Result<Vec<String>> {
        reflection::table_names(&self.pool).await
    }

    async fn table_columns(&self, table: &str, _schema: Option<&str>) -> Result<Vec<ColumnInfo>> {
        reflection::table_columns(&self.pool, table).await
    }

    async fn execute(&self, sql: &str, _schema: Option<&str>) -> Result<Option<Vec<Row>>> {
        execution::execute(&self.pool, sql).await
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
