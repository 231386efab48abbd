//! WITH clause (CTE) support.
//!
//! Statements accumulate named subqueries through their `.with()` method;
//! this module holds the ordered name → statement list behind it. Name
//! collisions are a structural authoring error and fail at registration
//! time, before any rendering occurs.

use crate::error::{SqlError, SqlResult};
use crate::quote::is_plain_identifier;
use crate::statement::Statement;

/// Ordered CTE definitions owned by one statement.
#[derive(Debug, Clone, Default)]
pub(crate) struct CteList {
    entries: Vec<(String, Statement)>,
}

impl CteList {
    /// Register a CTE. Fails immediately on a duplicate name, leaving the
    /// previously registered entries untouched.
    pub(crate) fn add(&mut self, name: String, statement: Statement) -> SqlResult<()> {
        if !is_plain_identifier(&name) {
            return Err(SqlError::expression(format!(
                "invalid common table expression name `{name}`"
            )));
        }
        if self.entries.iter().any(|(existing, _)| *existing == name) {
            return Err(SqlError::duplicate_cte(name));
        }
        self.entries.push((name, statement));
        Ok(())
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the `WITH name AS (...), ...` prefix, recursively rendering
    /// each nested statement. Names stay in first-seen order and render
    /// unquoted.
    pub(crate) fn render(&self) -> SqlResult<String> {
        let mut out = String::from("WITH ");
        for (i, (name, statement)) in self.entries.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(name);
            out.push_str(" AS (");
            out.push_str(&statement.to_sql()?);
            out.push(')');
        }
        Ok(out)
    }
}
