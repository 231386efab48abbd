//! Dialect configuration and statement factory.
//!
//! A [`Dialect`] bundles the identifier quoting strategy with the registered
//! value caster and hands copies of both to every statement it creates.
//! Configuration travels by value: registering a caster after a statement
//! was created never changes that statement's rendering.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde_json::Value;

use crate::error::SqlError;
use crate::expr::ExprContext;
use crate::quote::Quoting;
use crate::statement::{Delete, Insert, Statement};

/// Value casting hook.
///
/// Called for every leaf value rendered under a field name. Returning
/// `Some(text)` uses `text` verbatim as already-quoted SQL; returning `None`
/// falls back to default literal quoting.
pub type CasterFn = dyn Fn(&Value, &CastContext<'_>) -> Option<String> + Send + Sync;

/// Field type lookup supplied per statement, consulted by casters.
pub type SchemaFn = dyn Fn(&str) -> Option<String> + Send + Sync;

/// Per-leaf context handed to the caster.
pub struct CastContext<'a> {
    /// Field whose value is being rendered.
    pub name: &'a str,
    schema: Option<&'a SchemaFn>,
}

impl<'a> CastContext<'a> {
    pub(crate) fn new(name: &'a str, schema: Option<&'a SchemaFn>) -> Self {
        Self { name, schema }
    }

    /// Look up a field's type tag through the statement's schema, if one
    /// was supplied.
    pub fn schema(&self, field: &str) -> Option<String> {
        self.schema.and_then(|lookup| lookup(field))
    }
}

/// The statement kinds this dialect can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    Insert,
    Delete,
}

impl StatementKind {
    /// SQL keyword for the kind.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Insert => "INSERT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Insert => f.write_str("insert"),
            Self::Delete => f.write_str("delete"),
        }
    }
}

impl FromStr for StatementKind {
    type Err = SqlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("insert") {
            Ok(Self::Insert)
        } else if s.eq_ignore_ascii_case("delete") {
            Ok(Self::Delete)
        } else {
            Err(SqlError::UnknownStatement(s.to_string()))
        }
    }
}

/// Per-statement construction options.
#[derive(Clone, Default)]
pub struct StatementOptions {
    pub(crate) schema: Option<Arc<SchemaFn>>,
}

impl StatementOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the field type lookup for this statement only.
    pub fn schema(
        mut self,
        lookup: impl Fn(&str) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.schema = Some(Arc::new(lookup));
        self
    }
}

/// Configuration snapshot copied into each statement at construction.
#[derive(Clone, Default)]
pub(crate) struct StatementEnv {
    pub(crate) quoting: Quoting,
    pub(crate) caster: Option<Arc<CasterFn>>,
    pub(crate) schema: Option<Arc<SchemaFn>>,
}

impl fmt::Debug for StatementEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatementEnv")
            .field("quoting", &self.quoting)
            .field("caster", &self.caster.as_ref().map(|_| "<caster>"))
            .field("schema", &self.schema.as_ref().map(|_| "<schema>"))
            .finish()
    }
}

impl StatementEnv {
    pub(crate) fn expr_context(&self) -> ExprContext<'_> {
        ExprContext {
            quoting: self.quoting,
            caster: self.caster.as_deref(),
            schema: self.schema.as_deref(),
            name: None,
        }
    }
}

/// Dialect configuration and statement registry.
#[derive(Clone, Default)]
pub struct Dialect {
    quoting: Quoting,
    caster: Option<Arc<CasterFn>>,
}

impl Dialect {
    /// Dialect with double-quote identifiers and no caster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Dialect with a custom quoting configuration.
    pub fn with_quoting(quoting: Quoting) -> Self {
        Self {
            quoting,
            caster: None,
        }
    }

    /// Register the value casting hook used by statements created from now on.
    pub fn caster(
        &mut self,
        caster: impl Fn(&Value, &CastContext<'_>) -> Option<String> + Send + Sync + 'static,
    ) {
        self.caster = Some(Arc::new(caster));
    }

    /// Create a statement of the given kind.
    pub fn statement(&self, kind: StatementKind) -> Statement {
        self.statement_with(kind, StatementOptions::new())
    }

    /// Create a statement of the given kind with per-statement options.
    pub fn statement_with(&self, kind: StatementKind, options: StatementOptions) -> Statement {
        match kind {
            StatementKind::Insert => Statement::Insert(self.insert_with(options)),
            StatementKind::Delete => Statement::Delete(self.delete_with(options)),
        }
    }

    /// Create an INSERT builder bound to this dialect.
    pub fn insert(&self) -> Insert {
        self.insert_with(StatementOptions::new())
    }

    /// Create an INSERT builder with per-statement options.
    pub fn insert_with(&self, options: StatementOptions) -> Insert {
        Insert::new(self.env(options))
    }

    /// Create a DELETE builder bound to this dialect.
    pub fn delete(&self) -> Delete {
        self.delete_with(StatementOptions::new())
    }

    /// Create a DELETE builder with per-statement options.
    pub fn delete_with(&self, options: StatementOptions) -> Delete {
        Delete::new(self.env(options))
    }

    fn env(&self, options: StatementOptions) -> StatementEnv {
        StatementEnv {
            quoting: self.quoting,
            caster: self.caster.clone(),
            schema: options.schema,
        }
    }
}
