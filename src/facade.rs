//! The database facade: construction-time validation, table visibility,
//! schema description, and ad-hoc command execution.
//!
//! All configuration is immutable after construction. The facade holds one
//! adapter (and thus one pool) for its lifetime; `close` releases it
//! explicitly, and dropping the facade releases it implicitly.

use crate::adapters::{create_adapter, DatabaseAdapter};
use crate::error::{Result, SqlScribeError};
use crate::format::{render_table_info, ColumnDescription, TableDescription};
use crate::text::{render_rows, truncate_chars};
use std::collections::BTreeSet;

/// Maximum number of characters kept per sample value.
pub const SAMPLE_VALUE_MAX_CHARS: usize = 100;

/// Builder for [`SqlDatabase`]. Validation happens when the facade is
/// constructed, not while options accumulate.
#[derive(Debug, Clone, Default)]
pub struct SqlDatabaseBuilder {
    schema: Option<String>,
    include_tables: Vec<String>,
    ignore_tables: Vec<String>,
    sample_rows_in_table_info: u32,
}

impl SqlDatabaseBuilder {
    /// Creates a builder with no schema, no table filters, and sampling
    /// disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the active schema name (e.g. `public`).
    #[must_use]
    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Restricts the facade to exactly these tables. Mutually exclusive
    /// with [`Self::ignore_tables`].
    #[must_use]
    pub fn include_tables<I, S>(mut self, tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include_tables = tables.into_iter().map(Into::into).collect();
        self
    }

    /// Hides these tables from the facade. Mutually exclusive with
    /// [`Self::include_tables`].
    #[must_use]
    pub fn ignore_tables<I, S>(mut self, tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore_tables = tables.into_iter().map(Into::into).collect();
        self
    }

    /// Number of sample rows appended per table description (0 disables
    /// sampling).
    #[must_use]
    pub fn sample_rows(mut self, count: u32) -> Self {
        self.sample_rows_in_table_info = count;
        self
    }

    /// Connects to the database at `uri` and builds the facade.
    ///
    /// # Errors
    /// Returns an error if the URI is unsupported, the connection fails, or
    /// the table-list configuration is invalid.
    pub async fn connect(self, uri: &str) -> Result<SqlDatabase> {
        let adapter = create_adapter(uri).await?;
        self.attach(adapter).await
    }

    /// Builds the facade around a pre-built adapter.
    ///
    /// # Errors
    /// Returns an error if the connection is dead or the table-list
    /// configuration is invalid.
    pub async fn attach(self, adapter: Box<dyn DatabaseAdapter>) -> Result<SqlDatabase> {
        if !self.include_tables.is_empty() && !self.ignore_tables.is_empty() {
            return Err(SqlScribeError::configuration(
                "Cannot specify both include_tables and ignore_tables",
            ));
        }

        adapter.ping().await?;

        // Table universe is captured once; lexicographic set ordering keeps
        // descriptions stable across calls.
        let all_tables: BTreeSet<String> = adapter
            .table_names(self.schema.as_deref())
            .await?
            .into_iter()
            .collect();

        let include_tables: BTreeSet<String> = self.include_tables.into_iter().collect();
        let missing: BTreeSet<&String> = include_tables.difference(&all_tables).collect();
        if !missing.is_empty() {
            return Err(SqlScribeError::configuration(format!(
                "include_tables {missing:?} not found in database"
            )));
        }

        let ignore_tables: BTreeSet<String> = self.ignore_tables.into_iter().collect();
        let missing: BTreeSet<&String> = ignore_tables.difference(&all_tables).collect();
        if !missing.is_empty() {
            return Err(SqlScribeError::configuration(format!(
                "ignore_tables {missing:?} not found in database"
            )));
        }

        tracing::debug!(
            "Facade constructed over {} tables ({} visible)",
            all_tables.len(),
            if include_tables.is_empty() {
                all_tables.len() - ignore_tables.len()
            } else {
                include_tables.len()
            }
        );

        Ok(SqlDatabase {
            adapter,
            schema: self.schema,
            all_tables,
            include_tables,
            ignore_tables,
            sample_rows_in_table_info: self.sample_rows_in_table_info,
        })
    }
}

///// Read-mostly facade over a relational database: table enumeration,
/// prompt-oriented schema description, and ad-hoc SQL execution.
pub struct SqlDatabase {
    adapter: Box<dyn DatabaseAdapter>,
    schema: Option<String>,
    all_tables: BTreeSet<String>,
    include_tables: BTreeSet<String>,
    ignore_tables: BTreeSet<String>,
    sample_rows_in_table_info: u32,
}

impl std::fmt::Debug for SqlDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqlDatabase")
            .field("dialect", &self.dialect())
            .field("schema", &self.schema)
            .field("tables", &self.all_tables.len())
            .field("sample_rows_in_table_info", &self.sample_rows_in_table_info)
            .finish_non_exhaustive()
    }
}

impl SqlDatabase {
    /// Returns a builder for configuring a facade.
    pub fn builder() -> SqlDatabaseBuilder {
        SqlDatabaseBuilder::new()
    }

    /// Connects with default options (no schema, no filters, no sampling).
    ///
    /// # Errors
    /// Returns an error if the URI is unsupported or the connection fails.
    pub async fn connect(uri: &str) -> Result<Self> {
        SqlDatabaseBuilder::new().connect(uri).await
    }

    /// Returns the SQL dialect name in use, e.g. `"postgresql"` or
    /// `"sqlite"`. Stable across calls.
    pub fn dialect(&self) -> &'static str {
        self.adapter.dialect().as_str()
    }

    /// Returns the effective visible table set: the include-list when one
    /// was configured, otherwise the full reflected set minus the
    /// deny-list. Lexicographically ordered.
    pub fn table_names(&self) -> BTreeSet<String> {
        if !self.include_tables.is_empty() {
            return self.include_tables.clone();
        }
        self.all_tables
            .difference(&self.ignore_tables)
            .cloned()
            .collect()
    }

    /// Renders the schema description for the full effective table set.
    ///
    /// # Errors
    /// Returns an error if reflection or sample-row collection fails.
    pub async fn table_info(&self) -> Result<String> {
        let names: Vec<String> = self.table_names().into_iter().collect();
        self.render_info(&names).await
    }

    /// Renders the schema description for the given tables, in the given
    /// order.
    ///
    /// # Errors
    /// Returns a configuration error naming any table outside the effective
    /// visible set, or propagates reflection/sampling failures.
    pub async fn table_info_for<S: AsRef<str>>(&self, table_names: &[S]) -> Result<String> {
        let visible = self.table_names();
        let missing: BTreeSet<&str> = table_names
            .iter()
            .map(AsRef::as_ref)
            .filter(|name| !visible.contains(*name))
            .collect();
        if !missing.is_empty() {
            return Err(SqlScribeError::configuration(format!(
                "table_names {missing:?} not found in database"
            )));
        }

        let names: Vec<String> = table_names
            .iter()
            .map(|name| name.as_ref().to_string())
            .collect();
        self.render_info(&names).await
    }

    /// Executes a SQL command inside a single transactional scope and
    /// returns the textual rendering of its result set, or an empty string
    /// when the statement produces no rows.
    ///
    /// # Errors
    /// Propagates driver failures (malformed SQL, constraint violations,
    /// connectivity loss) without translation or retry.
    pub async fn run(&self, command: &str) -> Result<String> {
        match self
            .adapter
            .execute(command, self.schema.as_deref())
            .await?
        {
            Some(rows) => Ok(render_rows(&rows)),
            None => Ok(String::new()),
        }
    }

    /// Closes the underlying connection pool.
    pub async fn close(&self) {
        self.adapter.close().await;
    }

    async fn render_info(&self, table_names: &[String]) -> Result<String> {
        let mut tables = Vec::with_capacity(table_names.len());
        for name in table_names {
            tables.push(self.describe_table(name).await?);
        }
        Ok(render_table_info(&tables))
    }

    async fn describe_table(&self, table: &str) -> Result<TableDescription> {
        let reflected = self
            .adapter
            .table_columns(table, self.schema.as_deref())
            .await?;

        // Duplicate reflected names accumulate type variants in first-seen
        // order; columns otherwise keep declaration order.
        let mut columns: Vec<ColumnDescription> = Vec::with_capacity(reflected.len());
        for column in reflected {
            if let Some(existing) = columns.iter_mut().find(|c| c.name == column.name) {
                existing.types.push(column.data_type);
            } else {
                columns.push(ColumnDescription {
                    name: column.name,
                    types: vec![column.data_type],
                    samples: None,
                });
            }
        }

        if self.sample_rows_in_table_info > 0 {
            let command = format!(
                "SELECT * FROM '{table}' LIMIT {}",
                self.sample_rows_in_table_info
            );
            let rows = self
                .adapter
                .execute(&command, self.schema.as_deref())
                .await?
                .unwrap_or_default();

            // Sample values attach by positional index, stringified and
            // truncated per value.
            for (index, column) in columns.iter_mut().enumerate() {
                let samples: Vec<String> = rows
                    .iter()
                    .filter_map(|row| row.get(index))
                    .map(|value| truncate_chars(&value.display_string(), SAMPLE_VALUE_MAX_CHARS))
                    .collect();
                column.samples = Some(samples);
            }
        }

        Ok(TableDescription {
            name: table.to_string(),
            columns,
        })
    }
}
