//! INSERT statement builder.

use serde_json::{Map, Value};

use crate::cte::CteList;
use crate::dialect::{StatementEnv, StatementKind};
use crate::error::{SqlError, SqlResult};
use crate::expr::render_value;
use crate::statement::Statement;

/// Builder for `INSERT INTO ... (...) VALUES (...), ...` statements.
///
/// Rows are stored raw; the first row's keys fix the column list and its
/// order at render time. Later rows may omit columns (rendered as `NULL`)
/// but must not introduce new ones.
#[must_use]
#[derive(Debug, Clone)]
pub struct Insert {
    env: StatementEnv,
    table: Option<String>,
    rows: Vec<Value>,
    ctes: CteList,
}

impl Insert {
    pub(crate) fn new(env: StatementEnv) -> Self {
        Self {
            env,
            table: None,
            rows: Vec::new(),
            ctes: CteList::default(),
        }
    }

    /// Set the INTO target table. An empty name leaves the target unset.
    pub fn into_table(mut self, table: impl Into<String>) -> Self {
        let table = table.into();
        self.table = (!table.is_empty()).then_some(table);
        self
    }

    /// Append one row of values. Cells go through the caster (keyed by
    /// column name) before default literal quoting.
    pub fn values(mut self, row: impl Into<Value>) -> Self {
        self.rows.push(row.into());
        self
    }

    /// Register common table expressions. Duplicate names fail immediately,
    /// whether they collide within this call or with an earlier one.
    pub fn with<I, N, S>(mut self, ctes: I) -> SqlResult<Self>
    where
        I: IntoIterator<Item = (N, S)>,
        N: Into<String>,
        S: Into<Statement>,
    {
        for (name, statement) in ctes {
            self.ctes.add(name.into(), statement.into())?;
        }
        Ok(self)
    }

    /// Render the statement to SQL text.
    pub fn to_sql(&self) -> SqlResult<String> {
        let table = self
            .table
            .as_deref()
            .ok_or_else(|| SqlError::missing_clause(StatementKind::Insert.keyword(), "INTO"))?;

        let mut sql = String::new();
        if !self.ctes.is_empty() {
            sql.push_str(&self.ctes.render()?);
            sql.push(' ');
        }
        sql.push_str(StatementKind::Insert.keyword());
        sql.push_str(" INTO ");
        sql.push_str(&self.env.quoting.identifier(table));

        let first = self
            .rows
            .first()
            .ok_or_else(|| SqlError::missing_clause(StatementKind::Insert.keyword(), "VALUES"))?;
        let columns: Vec<&str> = as_row(first, 1)?.keys().map(String::as_str).collect();
        if columns.is_empty() {
            return Err(SqlError::values("row 1 has no columns"));
        }

        sql.push_str(" (");
        for (i, column) in columns.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            sql.push_str(&self.env.quoting.identifier(column));
        }
        sql.push_str(") VALUES ");

        let cx = self.env.expr_context();
        for (i, row) in self.rows.iter().enumerate() {
            let row = as_row(row, i + 1)?;
            for key in row.keys() {
                if !columns.contains(&key.as_str()) {
                    return Err(SqlError::values(format!(
                        "column `{key}` in row {} does not appear in the first row",
                        i + 1
                    )));
                }
            }
            if i > 0 {
                sql.push_str(", ");
            }
            sql.push('(');
            for (j, column) in columns.iter().copied().enumerate() {
                if j > 0 {
                    sql.push_str(", ");
                }
                match row.get(column) {
                    Some(value) => sql.push_str(&render_value(value, Some(column), cx)?),
                    None => sql.push_str("NULL"),
                }
            }
            sql.push(')');
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(target: "sqlgen.sql", statement = StatementKind::Insert.keyword(), sql = %sql);

        Ok(sql)
    }
}

fn as_row(value: &Value, index: usize) -> SqlResult<&Map<String, Value>> {
    value.as_object().ok_or_else(|| {
        SqlError::values(format!("row {index} must be a map of column to value"))
    })
}
