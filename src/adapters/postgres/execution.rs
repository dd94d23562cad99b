//! Transactional statement execution for PostgreSQL.
//!
//! When a schema is configured, a `SET search_path TO <schema>` directive
//! runs on the transaction connection before the user statement, matching
//! the facade's active-schema contract. The schema name comes from trusted
//! construction-time configuration, not caller input.

use crate::error::{Result, SqlScribeError};
use crate::value::{Row, Value};
use sqlx::postgres::PgRow;
use sqlx::{Executor, PgPool, Row as _, TypeInfo, ValueRef};

/// Executes one statement. Returns `Some(rows)` when the statement has
/// result columns (so a zero-row SELECT yields `Some([])`), `None` for
/// DDL/DML.
pub(crate) async fn execute(
    pool: &PgPool,
    sql: &str,
    schema: Option<&str>,
) -> Result<Option<Vec<Row>>> {
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| SqlScribeError::query_failed("Failed to begin transaction", e))?;

    if let Some(schema) = schema {
        // SET cannot take bind parameters; runs unprepared on the same
        // connection as the user statement.
        let directive = format!("SET search_path TO {schema}");
        (&mut *tx)
            .execute(directive.as_str())
            .await
            .map_err(|e| SqlScribeError::query_failed("Failed to set search_path", e))?;
    }

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

/// Decodes a PostgreSQL row into typed cells.
fn decode_row(row: &PgRow) -> Result<Row> {
    let mut cells = Vec::with_capacity(row.len());
    for index in 0..row.len() {
        cells.push(decode_cell(row, index)?);
    }
    Ok(cells)
}

/// Decodes one cell by its PostgreSQL type name. Temporal, UUID, and JSON
/// values are stringified; types outside this set degrade to NULL with a
/// warning rather than failing the whole result.
fn decode_cell(row: &PgRow, index: usize) -> Result<Value> {
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
        "BOOL" => row.try_get::<bool, _>(index).map(Value::Bool),
        "INT2" => row.try_get::<i16, _>(index).map(|v| Value::Int(v.into())),
        "INT4" => row.try_get::<i32, _>(index).map(|v| Value::Int(v.into())),
        "INT8" => row.try_get::<i64, _>(index).map(Value::Int),
        "FLOAT4" => row.try_get::<f32, _>(index).map(|v| Value::Real(v.into())),
        "FLOAT8" => row.try_get::<f64, _>(index).map(Value::Real),
        "TEXT" | "VARCHAR" | "BPCHAR" | "CHAR" | "NAME" => {
            row.try_get::<String, _>(index).map(Value::Text)
        }
        "BYTEA" => row.try_get::<Vec<u8>, _>(index).map(Value::Bytes),
        "UUID" => row
            .try_get::<uuid::Uuid, _>(index)
            .map(|v| Value::Text(v.to_string())),
        "TIMESTAMP" => row
            .try_get::<chrono::NaiveDateTime, _>(index)
            .map(|v| Value::Text(v.to_string())),
        "TIMESTAMPTZ" => row
            .try_get::<chrono::DateTime<chrono::Utc>, _>(index)
            .map(|v| Value::Text(v.to_string())),
        "DATE" => row
            .try_get::<chrono::NaiveDate, _>(index)
            .map(|v| Value::Text(v.to_string())),
        "TIME" => row
            .try_get::<chrono::NaiveTime, _>(index)
            .map(|v| Value::Text(v.to_string())),
        "JSON" | "JSONB" => row
            .try_get::<serde_json::Value, _>(index)
            .map(|v| Value::Text(v.to_string())),
        other => {
            tracing::warn!("Undecodable PostgreSQL type '{other}', treating as NULL");
            return Ok(Value::Null);
        }
    };

    decoded.map_err(|e| {
        SqlScribeError::query_failed(format!("Failed to decode column {index}"), e)
    })
}
