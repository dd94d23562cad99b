//! Textual result-set rendering and re-parsing.
//!
//! [`crate::SqlDatabase::run`] renders result sets as a literal list of row
//! tuples, e.g. `[(1, 'a'), (2, 'b')]` with one-element rows as `(1,)`.
//! Downstream consumers rely on this exact shape, so [`parse_rows`] is kept
//! as the documented inverse of [`render_rows`]. The parser accepts scalar
//! literals only; anything else is a [`crate::SqlScribeError::Parse`] error,
//! which signals a violated formatting contract rather than bad user input.

use crate::error::{Result, SqlScribeError};
use crate::value::{Row, Value};

/// Renders rows as a literal list of tuples.
pub fn render_rows(rows: &[Row]) -> String {
    let tuples: Vec<String> = rows.iter().map(|row| render_tuple(row)).collect();
    format!("[{}]", tuples.join(", "))
}

/// Renders a single row as a tuple literal. One-element rows keep the
/// trailing comma (`(1,)`) so the text stays unambiguous.
fn render_tuple(row: &Row) -> String {
    let cells: Vec<String> = row.iter().map(Value::render).collect();
    if cells.len() == 1 {
        format!("({},)", cells[0])
    } else {
        format!("({})", cells.join(", "))
    }
}

/// Truncates a string to at most `max` characters (not bytes).
pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Parses the output of [`render_rows`] back into rows of scalar values.
///
/// # Errors
/// Returns a `Parse` error when the text is not a list of tuples of scalar
/// literals (`None`, booleans, integers, floats, quoted strings).
pub fn parse_rows(text: &str) -> Result<Vec<Row>> {
    let mut parser = Parser::new(text);
    let rows = parser.parse_list()?;
    parser.skip_whitespace();
    if !parser.at_end() {
        return Err(parser.error("trailing content after row list"));
    }
    Ok(rows)
}

/// Character-level scanner over a rendered row list.
struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        match self.bump() {
            Some(c) if c == expected => Ok(()),
            Some(c) => Err(self.error(format!("expected '{expected}', found '{c}'"))),
            None => Err(self.error(format!("expected '{expected}', found end of input"))),
        }
    }

    fn error(&self, message: impl Into<String>) -> SqlScribeError {
        SqlScribeError::parse_failed(format!("{} at offset {}", message.into(), self.pos))
    }

    fn parse_list(&mut self) -> Result<Vec<Row>> {
        self.skip_whitespace();
        self.expect('[')?;
        let mut rows = Vec::new();
        self.skip_whitespace();
        if self.peek() == Some(']') {
            self.pos += 1;
            return Ok(rows);
        }
        loop {
            rows.push(self.parse_tuple()?);
            self.skip_whitespace();
            match self.bump() {
                Some(',') => self.skip_whitespace(),
                Some(']') => return Ok(rows),
                _ => return Err(self.error("expected ',' or ']' after tuple")),
            }
        }
    }

    fn parse_tuple(&mut self) -> Result<Row> {
        self.skip_whitespace();
        self.expect('(')?;
        let mut row = Vec::new();
        self.skip_whitespace();
        if self.peek() == Some(')') {
            self.pos += 1;
            return Ok(row);
        }
        loop {
            row.push(self.parse_value()?);
            self.skip_whitespace();
            match self.bump() {
                Some(',') => {
                    self.skip_whitespace();
                    // trailing comma of a one-element tuple
                    if self.peek() == Some(')') {
                        self.pos += 1;
                        return Ok(row);
                    }
                }
                Some(')') => return Ok(row),
                _ => return Err(self.error("expected ',' or ')' inside tuple")),
            }
        }
    }

    fn parse_value(&mut self) -> Result<Value> {
        self.skip_whitespace();
        match self.peek() {
            Some('\'') | Some('"') => self.parse_string(),
            Some(c) if c.is_ascii_digit() || c == '-' || c == '+' || c == '.' => {
                self.parse_number()
            }
            Some(c) if c.is_alphabetic() => self.parse_keyword(),
            Some(c) => Err(self.error(format!("unexpected character '{c}'"))),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn parse_string(&mut self) -> Result<Value> {
        let quote = self.bump().unwrap_or('\'');
        let mut out = String::new();
        loop {
            match self.bump() {
                Some('\\') => match self.bump() {
                    Some('\\') => out.push('\\'),
                    Some('\'') => out.push('\''),
                    Some('"') => out.push('"'),
                    Some('n') => out.push('\n'),
                    Some('r') => out.push('\r'),
                    Some('t') => out.push('\t'),
                    Some(c) => return Err(self.error(format!("unknown escape '\\{c}'"))),
                    None => return Err(self.error("unterminated string escape")),
                },
                Some(c) if c == quote => return Ok(Value::Text(out)),
                Some(c) => out.push(c),
                None => return Err(self.error("unterminated string literal")),
            }
        }
    }

    fn parse_number(&mut self) -> Result<Value> {
        let start = self.pos;
        if matches!(self.peek(), Some('-') | Some('+')) {
            self.pos += 1;
        }
        // word-form floats produced by render(): nan / inf
        if self.peek().is_some_and(char::is_alphabetic) {
            return self.parse_float_word(start);
        }
        let mut is_float = false;
        while let Some(c) = self.peek() {
            match c {
                '0'..='9' => self.pos += 1,
                '.' | 'e' | 'E' => {
                    is_float = true;
                    self.pos += 1;
                    if matches!(self.peek(), Some('-') | Some('+')) {
                        self.pos += 1;
                    }
                }
                _ => break,
            }
        }
        let token: String = self.chars[start..self.pos].iter().collect();
        if is_float {
            token
                .parse::<f64>()
                .map(Value::Real)
                .map_err(|_| self.error(format!("invalid float literal '{token}'")))
        } else {
            token
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| self.error(format!("invalid integer literal '{token}'")))
        }
    }

    fn parse_float_word(&mut self, start: usize) -> Result<Value> {
        while self.peek().is_some_and(char::is_alphabetic) {
            self.pos += 1;
        }
        let token: String = self.chars[start..self.pos].iter().collect();
        match token.as_str() {
            "nan" | "+nan" | "-nan" => Ok(Value::Real(f64::NAN)),
            "inf" | "+inf" => Ok(Value::Real(f64::INFINITY)),
            "-inf" => Ok(Value::Real(f64::NEG_INFINITY)),
            other => Err(self.error(format!("unknown literal '{other}'"))),
        }
    }

    fn parse_keyword(&mut self) -> Result<Value> {
        let start = self.pos;
        while self.peek().is_some_and(char::is_alphabetic) {
            self.pos += 1;
        }
        let token: String = self.chars[start..self.pos].iter().collect();
        match token.as_str() {
            "None" => Ok(Value::Null),
            "True" => Ok(Value::Bool(true)),
            "False" => Ok(Value::Bool(false)),
            "nan" => Ok(Value::Real(f64::NAN)),
            "inf" => Ok(Value::Real(f64::INFINITY)),
            other => Err(self.error(format!("unknown literal '{other}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_rows_basic() {
        let rows = vec![
            vec![Value::Int(1), Value::Text("a".to_string())],
            vec![Value::Int(2), Value::Text("b".to_string())],
        ];
        assert_eq!(render_rows(&rows), "[(1, 'a'), (2, 'b')]");
    }

    #[test]
    fn test_render_one_element_tuple() {
        let rows = vec![vec![Value::Int(1)]];
        assert_eq!(render_rows(&rows), "[(1,)]");
    }

    #[test]
    fn test_render_empty_result() {
        assert_eq!(render_rows(&[]), "[]");
    }

    #[test]
    fn test_parse_round_trip() {
        let rows = vec![
            vec![Value::Int(1), Value::Text("it's".to_string()), Value::Null],
            vec![Value::Int(-2), Value::Real(2.5), Value::Bool(true)],
        ];
        let text = render_rows(&rows);
        let parsed = parse_rows(&text).unwrap();
        assert_eq!(parsed, rows);
    }

    #[test]
    fn test_parse_double_quoted_string() {
        let parsed = parse_rows("[(\"it's\",)]").unwrap();
        assert_eq!(parsed, vec![vec![Value::Text("it's".to_string())]]);
    }

    #[test]
    fn test_parse_one_element_tuple() {
        let parsed = parse_rows("[(1,)]").unwrap();
        assert_eq!(parsed, vec![vec![Value::Int(1)]]);
    }

    #[test]
    fn test_parse_empty_list() {
        assert_eq!(parse_rows("[]").unwrap(), Vec::<Row>::new());
    }

    #[test]
    fn test_parse_integral_float_stays_real() {
        let parsed = parse_rows("[(1.0,)]").unwrap();
        assert_eq!(parsed, vec![vec![Value::Real(1.0)]]);
    }

    #[test]
    fn test_parse_rejects_non_scalar() {
        assert!(parse_rows("[([1, 2],)]").is_err());
        assert!(parse_rows("[({},)]").is_err());
        assert!(parse_rows("[(foo,)]").is_err());
    }

    #[test]
    fn test_parse_rejects_trailing_garbage() {
        assert!(parse_rows("[(1,)] extra").is_err());
    }

    #[test]
    fn test_truncate_chars_is_char_safe() {
        assert_eq!(truncate_chars("abcdef", 3), "abc");
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("ab", 100), "ab");
    }
}
