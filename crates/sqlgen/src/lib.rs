//! # sqlgen
//!
//! A dialect-driven SQL statement builder rendering INSERT and DELETE
//! statements as text.
//!
//! ## Features
//!
//! - **Text output**: statements render to complete SQL strings with inline
//!   quoted literals, no placeholders
//! - **Fluent builders**: clause setters return the builder; rendering is a
//!   separate, repeatable step
//! - **JSON condition descriptors**: WHERE clauses are `serde_json` values
//!   compiled through an operator table (`=`, `LIKE`, `IN`, `AND`, `OR`,
//!   `NOT`, ...)
//! - **Value casting**: an optional per-dialect hook rewrites leaf values,
//!   with a per-statement schema lookup for type-aware casting
//! - **Common table expressions**: `WITH name AS (...)` prefixes built from
//!   other statements, with duplicate names rejected at registration time
//!
//! ```ignore
//! use sqlgen::{Dialect, json};
//!
//! let dialect = Dialect::new();
//!
//! // INSERT
//! let sql = dialect
//!     .insert()
//!     .into_table("users")
//!     .values(json!({ "username": "alice", "active": true }))
//!     .to_sql()?;
//!
//! // DELETE
//! let sql = dialect
//!     .delete()
//!     .from("users")
//!     .filter(json!({ "status": "inactive", "age": { ">": 21 } }))
//!     .order_by("created_at DESC")?
//!     .limit(10)
//!     .to_sql()?;
//! ```

pub mod clause;
mod cte;
pub mod dialect;
pub mod error;
mod expr;
pub mod quote;
pub mod statement;

pub use clause::Direction;
pub use dialect::{CastContext, Dialect, StatementKind, StatementOptions};
pub use error::{SqlError, SqlResult};
pub use quote::{Quoting, quote_literal, quote_string};
pub use statement::{Delete, Insert, Statement, delete, insert};

// Re-export the value types condition descriptors are written in
pub use serde_json::{Value, json};
