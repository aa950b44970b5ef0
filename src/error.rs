//! Error types for the engine.

use thiserror::Error;

/// Errors produced while parsing or executing a query.
///
/// Every variant maps to one of the four taxonomy classes described for
/// the engine's failure result: syntax, schema, constraint, and value
/// errors. `Engine::execute` never panics on malformed input; callers
/// always get one of these back through the failure shape of the result
/// record.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The parser could not recognize the statement or a sub-production.
    #[error("syntax error: {0}")]
    Syntax(String),

    /// Reference to an unknown table, unknown column, or a duplicate
    /// table name at CREATE.
    #[error("schema error: {0}")]
    Schema(String),

    /// Not-null, uniqueness, type, or length constraint violation.
    #[error("constraint violation: {0}")]
    Constraint(String),

    /// Column/value count mismatch, or another malformed value.
    #[error("value error: {0}")]
    Value(String),
}

/// Result type alias used throughout the engine.
pub type Result<T> = std::result::Result<T, EngineError>;
