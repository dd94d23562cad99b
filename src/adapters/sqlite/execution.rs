//! Transactional statement execution for SQLite.
//!
//! Each call is an independent atomic unit: begin, execute, fetch if the
//! statement produces a result set, commit. Dropping the transaction on an
//! error path rolls it back and releases the connection.

use crate::error::{Result, SqlScribeError};
use crate::value::{Row, Value};
use sqlx::sqlite::SqliteRow;
use sqlx::{Executor, Row as _, SqlitePool, TypeInfo, ValueRef};

/// Executes one statement. Returns `Some(rows)` when the statement has
/// result columns (so a zero-row SELECT yields `Some([])`), `None` for
/// DDL/DML.
pub(crate) async fn execute(pool: &SqlitePool, sql: &str) -> Result<Option<Vec<Row>>> {
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| SqlScribeError::query_failed("Failed to begin transaction", e))?;

    // Preparing the statement exposes its column metadata, which is the
    // only reliable way to tell a zero-row SELECT apart from DDL.
    let statement = (&mut *tx)
        .describe(sql)
        .await
        .map_err(|e| SqlScribeError::query_failed("Failed to prepare statement", e))?;

    if statement.columns().is_empty() {
        sqlx::query(sql)
            .execute(&mut *tx)
            .await
            .map_err(|e| SqlScribeError::query_failed("Statement execution failed", e))?;
        tx.commit()
            .await
            .map_err(|e| SqlScribeError::query_failed("Failed to commit transaction", e))?;
        return Ok(None);
    }

    let rows = sqlx::query(sql)
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| SqlScribeError::query_failed("Statement execution failed", e))?;

    let mut decoded = Vec::with_capacity(rows.len());
    for row in &rows {
        decoded.push(decode_row(row)?);
    }

    tx.commit()
        .await
        .map_err(|e| SqlScribeError::query_failed("Failed to commit transaction", e))?;

    tracing::debug!("Statement returned {} rows", decoded.len());
    Ok(Some(decoded))
}

/// Decodes a SQLite row into typed cells.
fn decode_row(row: &SqliteRow) -> Result<Row> {
    let mut cells = Vec::with_capacity(row.len());
    for index in 0..row.len() {
        cells.push(decode_cell(row, index)?);
    }
    Ok(cells)
}

/// Decodes one cell by its runtime storage class. SQLite is dynamically
/// typed, so the value's own storage class is authoritative, not the
/// declared column type.
fn decode_cell(row: &SqliteRow, index: usize) -> Result<Value> {
    let type_name = {
        let raw = row
            .try_get_raw(index)
            .map_err(|e| SqlScribeError::query_failed("Failed to read column value", e))?;
        if raw.is_null() {
            return Ok(Value::Null);
        }
        raw.type_info().name().to_uppercase()
    };

    let decoded = match type_name.as_str() {
        "INTEGER" => row.try_get::<i64, _>(index).map(Value::Int),
        "BOOLEAN" => row.try_get::<bool, _>(index).map(Value::Bool),
        "REAL" => row.try_get::<f64, _>(index).map(Value::Real),
        "TEXT" | "DATETIME" | "DATE" | "TIME" => {
            row.try_get::<String, _>(index).map(Value::Text)
        }
        "BLOB" => row.try_get::<Vec<u8>, _>(index).map(Value::Bytes),
        other => {
            tracing::warn!("Undecodable SQLite storage class '{other}', treating as NULL");
            return Ok(Value::Null);
        }
    };

    decoded.map_err(|e| {
        SqlScribeError::query_failed(format!("Failed to decode column {index}"), e)
    })
}
