//! DELETE statement builder.

use serde_json::Value;

use crate::clause::{Limit, OrderBy};
use crate::cte::CteList;
use crate::dialect::{StatementEnv, StatementKind};
use crate::error::{SqlError, SqlResult};
use crate::expr::compile_all;
use crate::statement::Statement;

/// Builder for `DELETE FROM ... WHERE ... ORDER BY ... LIMIT ...` statements.
///
/// Filter descriptors are stored as given and compiled at render time, so
/// a malformed condition surfaces from [`Delete::to_sql`], not from
/// [`Delete::filter`]. Ordering specifications are normalized eagerly.
#[must_use]
#[derive(Debug, Clone)]
pub struct Delete {
    env: StatementEnv,
    table: Option<String>,
    conditions: Vec<Value>,
    order: OrderBy,
    limit: Limit,
    ctes: CteList,
}

impl Delete {
    pub(crate) fn new(env: StatementEnv) -> Self {
        Self {
            env,
            table: None,
            conditions: Vec::new(),
            order: OrderBy::default(),
            limit: Limit::default(),
            ctes: CteList::default(),
        }
    }

    /// Set the FROM target table. An empty name leaves the target unset.
    pub fn from(mut self, table: impl Into<String>) -> Self {
        let table = table.into();
        self.table = (!table.is_empty()).then_some(table);
        self
    }

    /// Append a condition descriptor. Conditions accumulate and are joined
    /// with `AND` when the statement renders.
    pub fn filter(mut self, condition: impl Into<Value>) -> Self {
        self.conditions.push(condition.into());
        self
    }

    /// Append ordering fields. Accepts `"field"`, `"field DESC"`,
    /// `{"field": "DESC"}`, and arrays of those; empty strings, empty
    /// arrays and `null` are ignored. Repeated calls accumulate.
    pub fn order_by(mut self, spec: impl Into<Value>) -> SqlResult<Self> {
        let spec = spec.into();
        self.order.push(&spec)?;
        Ok(self)
    }

    /// Set the row limit. Zero clears any previous limit and suppresses
    /// the clause (together with any offset).
    pub fn limit(mut self, count: u64) -> Self {
        self.limit.count = count;
        self
    }

    /// Set the row offset. Rendered only alongside a positive limit.
    pub fn offset(mut self, offset: u64) -> Self {
        self.limit.offset = offset;
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
            .ok_or_else(|| SqlError::missing_clause(StatementKind::Delete.keyword(), "FROM"))?;

        let mut sql = String::new();
        if !self.ctes.is_empty() {
            sql.push_str(&self.ctes.render()?);
            sql.push(' ');
        }
        sql.push_str(StatementKind::Delete.keyword());
        sql.push_str(" FROM ");
        sql.push_str(&self.env.quoting.identifier(table));

        let clause = compile_all(&self.conditions, self.env.expr_context())?;
        if !clause.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clause);
        }

        if !self.order.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.order.render(self.env.quoting));
        }

        if let Some(limit) = self.limit.render() {
            sql.push(' ');
            sql.push_str(&limit);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(target: "sqlgen.sql", statement = StatementKind::Delete.keyword(), sql = %sql);

        Ok(sql)
    }
}
