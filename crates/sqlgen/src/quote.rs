//! Identifier and literal quoting.
//!
//! Quoting is pure text manipulation configured by a [`Quoting`] value:
//!
//! - Identifiers are wrapped in the dialect's identifier quote character
//!   (default `"`), with embedded quote characters escaped by doubling.
//! - String literals are single-quoted with embedded `'` doubled.
//! - Scalars render as `NULL`, `TRUE`/`FALSE`, or the number's canonical
//!   decimal form.

use serde_json::Value;

use crate::error::{SqlError, SqlResult};

/// Identifier quoting configuration for a dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quoting {
    identifier: char,
}

impl Default for Quoting {
    fn default() -> Self {
        Self { identifier: '"' }
    }
}

impl Quoting {
    /// Create a quoting configuration with the given identifier quote character.
    pub fn new(identifier: char) -> Self {
        Self { identifier }
    }

    /// Render a quoted identifier, doubling embedded quote characters.
    pub fn identifier(&self, name: &str) -> String {
        let quote = self.identifier;
        let mut out = String::with_capacity(name.len() + 2);
        out.push(quote);
        for ch in name.chars() {
            if ch == quote {
                out.push(quote);
                out.push(quote);
            } else {
                out.push(ch);
            }
        }
        out.push(quote);
        out
    }
}

/// A bare identifier: `[A-Za-z_][A-Za-z0-9_$]*`.
pub(crate) fn is_plain_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c == '$' || c.is_ascii_alphanumeric())
}

/// Render a single-quoted SQL string literal, doubling embedded `'`.
pub fn quote_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for ch in value.chars() {
        if ch == '\'' {
            out.push('\'');
            out.push('\'');
        } else {
            out.push(ch);
        }
    }
    out.push('\'');
    out
}

/// Render a scalar value as a SQL literal.
///
/// Arrays and objects are not literals; they fail with an expression error
/// rather than producing unparseable text.
pub fn quote_literal(value: &Value) -> SqlResult<String> {
    match value {
        Value::Null => Ok("NULL".to_string()),
        Value::Bool(true) => Ok("TRUE".to_string()),
        Value::Bool(false) => Ok("FALSE".to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::String(s) => Ok(quote_string(s)),
        Value::Array(_) | Value::Object(_) => Err(SqlError::expression(
            "cannot render a composite value as a SQL literal",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn identifier_default_quote() {
        let quoting = Quoting::default();
        assert_eq!(quoting.identifier("table"), r#""table""#);
    }

    #[test]
    fn identifier_doubles_embedded_quote() {
        let quoting = Quoting::default();
        assert_eq!(quoting.identifier(r#"fie"ld"#), r#""fie""ld""#);
    }

    #[test]
    fn identifier_custom_quote() {
        let quoting = Quoting::new('`');
        assert_eq!(quoting.identifier("table"), "`table`");
        assert_eq!(quoting.identifier("fie`ld"), "`fie``ld`");
    }

    #[test]
    fn string_simple() {
        assert_eq!(quote_string("value"), "'value'");
    }

    #[test]
    fn string_doubles_embedded_quote() {
        assert_eq!(quote_string("it's"), "'it''s'");
    }

    #[test]
    fn literal_null() {
        assert_eq!(quote_literal(&Value::Null).unwrap(), "NULL");
    }

    #[test]
    fn literal_booleans() {
        assert_eq!(quote_literal(&json!(true)).unwrap(), "TRUE");
        assert_eq!(quote_literal(&json!(false)).unwrap(), "FALSE");
    }

    #[test]
    fn literal_numbers() {
        assert_eq!(quote_literal(&json!(1)).unwrap(), "1");
        assert_eq!(quote_literal(&json!(50)).unwrap(), "50");
        assert_eq!(quote_literal(&json!(-3)).unwrap(), "-3");
        assert_eq!(quote_literal(&json!(1.5)).unwrap(), "1.5");
    }

    #[test]
    fn literal_string() {
        assert_eq!(quote_literal(&json!("value")).unwrap(), "'value'");
    }

    #[test]
    fn literal_rejects_composites() {
        assert!(quote_literal(&json!([1, 2])).is_err());
        assert!(quote_literal(&json!({"a": 1})).is_err());
    }
}
