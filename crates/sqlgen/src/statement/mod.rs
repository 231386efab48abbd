//! Statement builders.
//!
//! Each statement kind is a mutable fluent builder: clauses may be set in
//! any order, any number of times, and `to_sql()` renders the current state
//! on demand. Rendering is a pure projection; a failed render (for example
//! a missing target clause) leaves the builder intact and re-renderable.
//!
//! # Usage
//!
//! ```ignore
//! use sqlgen::{delete, insert, json};
//!
//! let sql = insert()
//!     .into_table("users")
//!     .values(json!({ "name": "alice", "age": 30 }))
//!     .to_sql()?;
//! // INSERT INTO "users" ("name", "age") VALUES ('alice', 30)
//!
//! let sql = delete()
//!     .from("users")
//!     .filter(json!({ "age": { "<": 18 } }))
//!     .order_by("name")?
//!     .limit(10)
//!     .to_sql()?;
//! // DELETE FROM "users" WHERE "age" < 18 ORDER BY "name" ASC LIMIT 10
//! ```

mod delete;
mod insert;

pub use delete::Delete;
pub use insert::Insert;

use crate::dialect::{StatementEnv, StatementKind};
use crate::error::SqlResult;

/// Create an INSERT builder with the default dialect configuration
/// (double-quote identifiers, no caster).
pub fn insert() -> Insert {
    Insert::new(StatementEnv::default())
}

/// Create a DELETE builder with the default dialect configuration.
pub fn delete() -> Delete {
    Delete::new(StatementEnv::default())
}

/// A statement of any kind. Used wherever statements are handled
/// uniformly, most notably as the CTE payload of `.with()`.
#[derive(Debug, Clone)]
pub enum Statement {
    Insert(Insert),
    Delete(Delete),
}

impl Statement {
    /// The kind of this statement.
    pub fn kind(&self) -> StatementKind {
        match self {
            Self::Insert(_) => StatementKind::Insert,
            Self::Delete(_) => StatementKind::Delete,
        }
    }

    /// Render the statement to SQL text.
    pub fn to_sql(&self) -> SqlResult<String> {
        match self {
            Self::Insert(insert) => insert.to_sql(),
            Self::Delete(delete) => delete.to_sql(),
        }
    }
}

impl From<Insert> for Statement {
    fn from(insert: Insert) -> Self {
        Self::Insert(insert)
    }
}

impl From<Delete> for Statement {
    fn from(delete: Delete) -> Self {
        Self::Delete(delete)
    }
}
