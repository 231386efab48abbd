//! Error types for sqlgen

use thiserror::Error;

/// Result type alias for sqlgen operations
pub type SqlResult<T> = Result<T, SqlError>;

/// Error types for statement building and rendering
#[derive(Debug, Error)]
pub enum SqlError {
    /// A statement-kind-mandatory clause was never set (render time)
    #[error("Invalid `{statement}` statement, missing `{clause}` clause.")]
    MissingClause {
        statement: &'static str,
        clause: &'static str,
    },

    /// A CTE name was registered twice on the same statement (call time)
    #[error("Common table expression {0} specified more than once")]
    DuplicateCte(String),

    /// Statement kind string did not resolve to a known kind
    #[error("Unknown statement kind `{0}`")]
    UnknownStatement(String),

    /// Single-entry descriptor key did not resolve to a known operator
    #[error("Unknown operator `{0}`")]
    UnknownOperator(String),

    /// Malformed condition descriptor
    #[error("Invalid expression: {0}")]
    Expression(String),

    /// Malformed ORDER BY specification
    #[error("Invalid ORDER BY: {0}")]
    OrderBy(String),

    /// Malformed VALUES row
    #[error("Invalid VALUES row: {0}")]
    Values(String),
}

impl SqlError {
    /// Create a missing-clause error for a statement kind
    pub fn missing_clause(statement: &'static str, clause: &'static str) -> Self {
        Self::MissingClause { statement, clause }
    }

    /// Create a duplicate-CTE error
    pub fn duplicate_cte(name: impl Into<String>) -> Self {
        Self::DuplicateCte(name.into())
    }

    /// Create an unknown-operator error
    pub fn unknown_operator(symbol: impl Into<String>) -> Self {
        Self::UnknownOperator(symbol.into())
    }

    /// Create an expression error
    pub fn expression(message: impl Into<String>) -> Self {
        Self::Expression(message.into())
    }

    /// Create an ORDER BY error
    pub fn order_by(message: impl Into<String>) -> Self {
        Self::OrderBy(message.into())
    }

    /// Create a VALUES error
    pub fn values(message: impl Into<String>) -> Self {
        Self::Values(message.into())
    }

    /// Check if this is a missing-clause error
    pub fn is_missing_clause(&self) -> bool {
        matches!(self, Self::MissingClause { .. })
    }

    /// Check if this is a duplicate-CTE error
    pub fn is_duplicate_cte(&self) -> bool {
        matches!(self, Self::DuplicateCte(_))
    }
}
