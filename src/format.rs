//! Schema description formatting.
//!
//! The output format is a fixed prompt-oriented text contract: a prefix
//! explaining the `Table 'name' has columns: {...}` convention followed by
//! one line per table. Consumers feed this text to language models, so the
//! shape is reproduced bit-exact and never restructured.

use crate::value::quote_literal;

/// Fixed header prepended to every schema description.
pub const TABLE_INFO_PREFIX: &str = "Table data will be described in the following format:

Table 'table name' has columns: {
column1 name: (column1 type, [list of example values for column1]),
column2 name: (column2 type, [list of example values for column2]),
...
}

These are the tables you can use, together with their column information:

";

/// A described column: reflected type variants plus optional sample values.
///
/// A column name can repeat in reflection output with different declared
/// types; variants accumulate in first-seen order. Sample values are
/// already stringified and truncated when they arrive here.
#[derive(Debug, Clone)]
pub struct ColumnDescription {
    /// Column name.
    pub name: String,
    /// Declared type strings, one per reflected variant.
    pub types: Vec<String>,
    /// Per-row example values, present only when sampling is enabled.
    pub samples: Option<Vec<String>>,
}

/// A described table: name plus ordered column descriptions.
#[derive(Debug, Clone)]
pub struct TableDescription {
    /// Table name.
    pub name: String,
    /// Columns in declaration order.
    pub columns: Vec<ColumnDescription>,
}

/// Renders the full schema description: prefix plus one line per table.
pub fn render_table_info(tables: &[TableDescription]) -> String {
    let lines: Vec<String> = tables.iter().map(render_table_line).collect();
    format!("{TABLE_INFO_PREFIX}{}", lines.join("\n"))
}

/// Renders one `Table '<name>' has columns: {...}` line.
fn render_table_line(table: &TableDescription) -> String {
    let entries: Vec<String> = table
        .columns
        .iter()
        .map(|column| format!("{}: {}", quote_literal(&column.name), render_entry(column)))
        .collect();
    format!(
        "Table {} has columns: {{{}}}",
        quote_literal(&table.name),
        entries.join(", ")
    )
}

/// Renders a column entry as a tuple literal: `('TYPE',)` without samples,
/// `('TYPE', ['v1', 'v2'])` with samples appended as the last element.
fn render_entry(column: &ColumnDescription) -> String {
    let mut parts: Vec<String> = column.types.iter().map(|t| quote_literal(t)).collect();
    if let Some(samples) = &column.samples {
        let rendered: Vec<String> = samples.iter().map(|s| quote_literal(s)).collect();
        parts.push(format!("[{}]", rendered.join(", ")));
    }
    if parts.len() == 1 {
        format!("({},)", parts[0])
    } else {
        format!("({})", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(name: &str, ty: &str, samples: Option<Vec<&str>>) -> ColumnDescription {
        ColumnDescription {
            name: name.to_string(),
            types: vec![ty.to_string()],
            samples: samples.map(|s| s.into_iter().map(str::to_string).collect()),
        }
    }

    #[test]
    fn test_render_without_samples() {
        let table = TableDescription {
            name: "users".to_string(),
            columns: vec![column("id", "INTEGER", None), column("name", "VARCHAR", None)],
        };
        assert_eq!(
            render_table_line(&table),
            "Table 'users' has columns: {'id': ('INTEGER',), 'name': ('VARCHAR',)}"
        );
    }

    #[test]
    fn test_render_with_samples() {
        let table = TableDescription {
            name: "users".to_string(),
            columns: vec![
                column("id", "INTEGER", Some(vec!["1", "2"])),
                column("name", "VARCHAR", Some(vec!["a", "b"])),
            ],
        };
        assert_eq!(
            render_table_line(&table),
            "Table 'users' has columns: \
             {'id': ('INTEGER', ['1', '2']), 'name': ('VARCHAR', ['a', 'b'])}"
        );
    }

    #[test]
    fn test_render_type_variants() {
        let table = TableDescription {
            name: "t".to_string(),
            columns: vec![ColumnDescription {
                name: "x".to_string(),
                types: vec!["INTEGER".to_string(), "TEXT".to_string()],
                samples: None,
            }],
        };
        assert_eq!(
            render_table_line(&table),
            "Table 't' has columns: {'x': ('INTEGER', 'TEXT')}"
        );
    }

    #[test]
    fn test_full_description_starts_with_prefix() {
        let text = render_table_info(&[]);
        assert!(text.starts_with("Table data will be described in the following format:"));
        assert!(text.ends_with("together with their column information:\n\n"));
    }

    #[test]
    fn test_tables_join_with_newlines() {
        let tables = vec![
            TableDescription {
                name: "a".to_string(),
                columns: vec![column("x", "INTEGER", None)],
            },
            TableDescription {
                name: "b".to_string(),
                columns: vec![column("y", "TEXT", None)],
            },
        ];
        let text = render_table_info(&tables);
        let body = text.strip_prefix(TABLE_INFO_PREFIX).unwrap();
        assert_eq!(
            body,
            "Table 'a' has columns: {'x': ('INTEGER',)}\n\
             Table 'b' has columns: {'y': ('TEXT',)}"
        );
    }
}
