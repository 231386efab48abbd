//! ORDER BY and LIMIT/OFFSET clause state.

use serde_json::Value;

use crate::error::{SqlError, SqlResult};
use crate::quote::Quoting;

/// Sort direction for an ORDER BY field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    /// SQL keyword for this direction.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("ASC") {
            Some(Self::Asc)
        } else if s.eq_ignore_ascii_case("DESC") {
            Some(Self::Desc)
        } else {
            None
        }
    }
}

/// Accumulated ORDER BY fields. Normalization is eager: every accepted
/// shape becomes `(field, Direction)` pairs at call time, and repeated
/// pushes append rather than replace.
#[derive(Debug, Clone, Default)]
pub(crate) struct OrderBy {
    fields: Vec<(String, Direction)>,
}

impl OrderBy {
    /// Append fields from a specification. `Null`, the empty string, and
    /// the empty array are no-ops that leave prior fields untouched.
    ///
    /// Accepted shapes: `"field"`, `"field DESC"` (compatibility syntax,
    /// direction parsed case-insensitively from the last whitespace token),
    /// `{"field": "DESC", ...}`, and arrays of any of these.
    pub(crate) fn push(&mut self, spec: &Value) -> SqlResult<()> {
        match spec {
            Value::Null => Ok(()),
            Value::String(s) if s.trim().is_empty() => Ok(()),
            Value::String(s) => {
                self.fields.push(parse_order_string(s));
                Ok(())
            }
            Value::Array(items) => {
                for item in items {
                    self.push(item)?;
                }
                Ok(())
            }
            Value::Object(map) => {
                for (field, direction) in map {
                    if field.is_empty() {
                        return Err(SqlError::order_by("field name cannot be empty"));
                    }
                    let direction = direction
                        .as_str()
                        .and_then(Direction::parse)
                        .ok_or_else(|| {
                            SqlError::order_by(format!(
                                "invalid direction `{direction}` for field `{field}`"
                            ))
                        })?;
                    self.fields.push((field.clone(), direction));
                }
                Ok(())
            }
            other => Err(SqlError::order_by(format!(
                "unsupported specification `{other}`"
            ))),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Render the field list, e.g. `"field1" ASC, "field2" DESC`.
    pub(crate) fn render(&self, quoting: Quoting) -> String {
        self.fields
            .iter()
            .map(|(field, direction)| {
                format!("{} {}", quoting.identifier(field), direction.as_str())
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn parse_order_string(s: &str) -> (String, Direction) {
    let trimmed = s.trim();
    if let Some((field, tail)) = trimmed.rsplit_once(char::is_whitespace) {
        let field = field.trim_end();
        if !field.is_empty() {
            if let Some(direction) = Direction::parse(tail) {
                return (field.to_string(), direction);
            }
        }
    }
    (trimmed.to_string(), Direction::Asc)
}

/// LIMIT/OFFSET counters. Rendered only while the limit is strictly
/// positive; the offset is never rendered on its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Limit {
    pub(crate) count: u64,
    pub(crate) offset: u64,
}

impl Limit {
    pub(crate) fn render(&self) -> Option<String> {
        if self.count == 0 {
            return None;
        }
        let mut out = format!("LIMIT {}", self.count);
        if self.offset > 0 {
            out.push_str(&format!(" OFFSET {}", self.offset));
        }
        Some(out)
    }
}
