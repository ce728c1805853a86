//! Database error types for folio-db.

use thiserror::Error;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed or returned malformed data.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// Invalid state encountered (e.g., a reference to a missing slug).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),
}

impl DatabaseError {
    /// Whether the error comes from store availability rather than from the
    /// statement itself (lock contention, I/O, a closed connection).
    ///
    /// The predicate is narrow so constraint violations are never retried.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::LibSql(e) => {
                let msg = e.to_string().to_lowercase();
                msg.contains("database is locked")
                    || msg.contains("busy")
                    || msg.contains("disk i/o")
                    || msg.contains("unable to open")
                    || msg.contains("connection")
            }
            _ => false,
        }
    }
}
