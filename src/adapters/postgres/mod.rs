//! PostgreSQL database adapter.
//!
//! # Module Structure
//! - `connection`: connection string validation and pool creation
//! - `reflection`: table and column metadata via `information_schema`
//! - `execution`: transactional statement execution with typed decoding
//!
//! When the facade is configured with a schema name, execution issues
//! `SET search_path TO <schema>` on the transaction connection before the
//! user statement. Reflection defaults to the `public` schema.

pub mod connection;
pub mod execution;
pub mod reflection;

use super::{ColumnInfo, DatabaseAdapter, Dialect};
use crate::error::{Result, SqlScribeError};
use crate::value::Row;
use async_trait::async_trait;
use sqlx::PgPool;

/// PostgreSQL adapter backed by a sqlx connection pool.
pub struct PostgresAdapter {
    pub(crate) pool: PgPool,
}

impl std::fmt::Debug for PostgresAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresAdapter")
            .field("pool_size", &self.pool.size())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl DatabaseAdapter for PostgresAdapter {
    fn dialect(&self) -> Dialect {
        Dialect::PostgreSql
    }

    async fn ping(&self) -> Result<()> {
        let result: i32 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                SqlScribeError::connection_failed("PostgreSQL liveness check failed", e)
            })?;

        if result != 1 {
            return Err(SqlScribeError::configuration(
                "Liveness check returned unexpected result",
            ));
        }
        Ok(())
    }

    async fn table_names(&self, schema: Option<&str>) -> Result<Vec<String>> {
        reflection::table_names(&self.pool, schema).await
    }

    async fn table_columns(&self, table: &str, schema: Option<&str>) -> Result<Vec<ColumnInfo>> {
        reflection::table_columns(&self.pool, table, schema).await
    }

    async fn execute(&self, sql: &str, schema: Option<&str>) -> Result<Option<Vec<Row>>> {
        execution::execute(&self.pool, sql, schema).await
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
