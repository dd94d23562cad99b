//! Structured cell values decoded from query results.
//!
//! Result rows are carried as typed cells internally and only serialized to
//! the textual wire shape at the final formatting step. Two renderings
//! exist: a literal form (quoted strings, `None` for NULL) used inside the
//! list-of-tuples result text, and a display form (unquoted) used for the
//! sample values embedded in table descriptions.

use serde::{Deserialize, Serialize};

/// A single decoded result cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// SQL NULL.
    Null,
    /// Boolean column value.
    Bool(bool),
    /// Signed integer column value.
    Int(i64),
    /// Floating-point column value.
    Real(f64),
    /// Text column value (also used for dates, UUIDs, and JSON, which are
    /// stringified during decoding).
    Text(String),
    /// Binary column value (BLOB/BYTEA).
    Bytes(Vec<u8>),
}

/// One decoded result row.
pub type Row = Vec<Value>;

impl Value {
    /// Renders the cell as a literal: strings quoted and escaped, NULL as
    /// `None`, booleans as `True`/`False`. Binary data is rendered as a
    /// quoted `base64:`-prefixed string so the literal grammar stays
    /// scalar-only.
    pub fn render(&self) -> String {
        match self {
            Self::Null => "None".to_string(),
            Self::Bool(true) => "True".to_string(),
            Self::Bool(false) => "False".to_string(),
            Self::Int(i) => i.to_string(),
            Self::Real(f) => render_real(*f),
            Self::Text(s) => quote_literal(s),
            Self::Bytes(b) => quote_literal(&encode_bytes(b)),
        }
    }

    /// Renders the cell the way it appears inside sample-value lists:
    /// the bare string form without surrounding quotes.
    pub fn display_string(&self) -> String {
        match self {
            Self::Null => "None".to_string(),
            Self::Bool(true) => "True".to_string(),
            Self::Bool(false) => "False".to_string(),
            Self::Int(i) => i.to_string(),
            Self::Real(f) => render_real(*f),
            Self::Text(s) => s.clone(),
            Self::Bytes(b) => encode_bytes(b),
        }
    }
}

/// Renders a float so it stays distinguishable from an integer literal.
fn render_real(f: f64) -> String {
    if f.is_nan() {
        "nan".to_string()
    } else if f.is_infinite() {
        if f > 0.0 { "inf" } else { "-inf" }.to_string()
    } else if f.fract() == 0.0 && f.abs() < 1e16 {
        format!("{f:.1}")
    } else {
        format!("{f}")
    }
}

/// Quotes a string, escaping backslashes and control characters.
///
/// Strings are single-quoted unless they contain a single quote but no
/// double quote, in which case the string is double-quoted instead of
/// escaping the embedded quotes. Strings containing both quote characters
/// fall back to single quotes with `\'` escapes.
pub(crate) fn quote_literal(s: &str) -> String {
    let quote = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out.push(quote);
    out
}

/// Encodes binary data as a `base64:`-prefixed string.
fn encode_bytes(bytes: &[u8]) -> String {
    use base64::Engine;
    format!(
        "base64:{}",
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_scalars() {
        assert_eq!(Value::Null.render(), "None");
        assert_eq!(Value::Bool(true).render(), "True");
        assert_eq!(Value::Int(42).render(), "42");
        assert_eq!(Value::Text("a".to_string()).render(), "'a'");
    }

    #[test]
    fn test_render_real_keeps_decimal_point() {
        assert_eq!(Value::Real(1.0).render(), "1.0");
        assert_eq!(Value::Real(2.5).render(), "2.5");
        assert_eq!(Value::Real(-3.0).render(), "-3.0");
    }

    #[test]
    fn test_render_switches_to_double_quotes() {
        assert_eq!(Value::Text("it's".to_string()).render(), "\"it's\"");
        assert_eq!(
            Value::Text("a\\b".to_string()).render(),
            "'a\\\\b'"
        );
    }

    #[test]
    fn test_render_escapes_when_both_quotes_present() {
        assert_eq!(
            Value::Text("it's \"x\"".to_string()).render(),
            "'it\\'s \"x\"'"
        );
        assert_eq!(
            Value::Text("say \"hi\"".to_string()).render(),
            "'say \"hi\"'"
        );
    }

    #[test]
    fn test_display_string_is_unquoted() {
        assert_eq!(Value::Text("abc".to_string()).display_string(), "abc");
        assert_eq!(Value::Int(7).display_string(), "7");
    }

    #[test]
    fn test_bytes_render_as_base64_string() {
        let v = Value::Bytes(vec![0xde, 0xad]);
        assert_eq!(v.display_string(), "base64:3q0=");
        assert_eq!(v.render(), "'base64:3q0='");
    }
}
