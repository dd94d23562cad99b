//! SQLite connection handling.
//!
//! # Connection String Formats
//! - `sqlite:///path/to/database.db` - absolute file path
//! - `sqlite://./relative.db` or a bare `*.db`/`*.sqlite` path
//! - `sqlite::memory:` or `:memory:` - in-memory database

use super::SqliteAdapter;
use crate::error::{Result, SqlScribeError};
use sqlx::SqlitePool;
use url::Url;

impl SqliteAdapter {
    /// Opens a SQLite database and wraps it in an adapter.
    ///
    /// # Errors
    /// Returns an error if the connection string is malformed or the
    /// database cannot be opened.
    pub async fn connect(connection_string: &str) -> Result<Self> {
        validate_connection_string(connection_string)?;
        let pool = create_pool(connection_string).await?;

        tracing::debug!("Opened SQLite database");

        Ok(Self {
            pool,
            connection_string: connection_string.to_string(),
        })
    }
}

/// Validates a SQLite connection string format.
fn validate_connection_string(connection_string: &str) -> Result<()> {
    if connection_string == ":memory:" {
        return Ok(());
    }

    if connection_string.ends_with(".db")
        || connection_string.ends_with(".sqlite")
        || connection_string.ends_with(".sqlite3")
    {
        return Ok(());
    }

    if connection_string.starts_with("sqlite:") {
        if connection_string.contains(":memory:") || connection_string.contains("mode=memory") {
            return Ok(());
        }
        if let Ok(url) = Url::parse(connection_string) {
            if url.scheme() != "sqlite" {
                return Err(SqlScribeError::configuration(
                    "Connection string must use sqlite:// scheme",
                ));
            }
            return Ok(());
        }
        if connection_string.starts_with("sqlite://") {
            return Ok(());
        }
    }

    Err(SqlScribeError::configuration(
        "Invalid SQLite connection string: expected sqlite:// URL, file path, or :memory:",
    ))
}

/// Creates the connection pool, normalizing bare paths to sqlite:// URLs.
async fn create_pool(connection_string: &str) -> Result<SqlitePool> {
    use sqlx::sqlite::SqliteConnectOptions;
    use std::str::FromStr;

    let normalized = normalize_connection_string(connection_string);

    let options = SqliteConnectOptions::from_str(&normalized).map_err(|e| {
        SqlScribeError::configuration(format!("Invalid SQLite connection string: {e}"))
    })?;

    sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .map_err(|e| SqlScribeError::connection_failed("Failed to open SQLite database", e))
}

/// Normalizes a connection string to SQLite URL format.
fn normalize_connection_string(connection_string: &str) -> String {
    if connection_string == ":memory:" {
        return "sqlite::memory:".to_string();
    }
    if connection_string.starts_with("sqlite:") {
        return connection_string.to_string();
    }
    format!("sqlite://{connection_string}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_memory_forms() {
        assert!(validate_connection_string(":memory:").is_ok());
        assert!(validate_connection_string("sqlite::memory:").is_ok());
        assert!(validate_connection_string("sqlite://:memory:").is_ok());
    }

    #[test]
    fn test_validate_file_forms() {
        assert!(validate_connection_string("sqlite:///path/to/db.sqlite").is_ok());
        assert!(validate_connection_string("/path/to/database.db").is_ok());
        assert!(validate_connection_string("data.sqlite3").is_ok());
    }

    #[test]
    fn test_validate_rejects_other_schemes() {
        assert!(validate_connection_string("postgres://localhost/db").is_err());
        assert!(validate_connection_string("invalid").is_err());
    }

    #[test]
    fn test_normalize_connection_string() {
        assert_eq!(normalize_connection_string(":memory:"), "sqlite::memory:");
        assert_eq!(
            normalize_connection_string("sqlite:///path/db.sqlite"),
            "sqlite:///path/db.sqlite"
        );
        assert_eq!(
            normalize_connection_string("/path/to/db.sqlite"),
            "sqlite:///path/to/db.sqlite"
        );
    }
}
