//! LLM-oriented introspection and query-execution facade over SQL
//! databases.
//!
//! `sqlscribe` reflects table and column metadata, renders a fixed
//! prompt-oriented textual schema description (optionally enriched with
//! sample rows), and executes ad-hoc SQL inside single transactional
//! scopes. Backends are selected via crate features (`postgresql`,
//! `sqlite`, both on by default).
//!
//! # Example
//!
//! ```rust,no_run
//! use sqlscribe::SqlDatabase;
//!
//! # async fn example() -> sqlscribe::Result<()> {
//! let db = SqlDatabase::builder()
//!     .ignore_tables(["migrations"])
//!     .sample_rows(2)
//!     .connect("sqlite::memory:")
//!     .await?;
//!
//! let context = db.table_info().await?;
//! let result = db.run("SELECT count(*) FROM users").await?;
//! # let _ = (context, result);
//! # Ok(())
//! # }
//! ```
//!
//! # Concurrency
//! Each call is a synchronous unit of work from the caller's perspective:
//! one blocking round-trip per `run`, no internal parallelism, no retries.
//! Configuration is immutable after construction, so sharing a facade
//! across tasks is safe to the extent the underlying pool is.

pub mod adapters;
pub mod error;
pub mod facade;
pub mod format;
pub mod logging;
pub mod text;
pub mod value;

pub use adapters::{create_adapter, ColumnInfo, DatabaseAdapter, Dialect};
pub use error::{redact_database_url, Result, SqlScribeError};
pub use facade::{SqlDatabase, SqlDatabaseBuilder, SAMPLE_VALUE_MAX_CHARS};
pub use format::TABLE_INFO_PREFIX;
pub use text::{parse_rows, render_rows};
pub use value::{Row, Value};
