//! Cross-cutting error types for Folio.
//!
//! Domain-specific errors (`DatabaseError`, `IndexError`, `SearchError`) live in
//! their own crates. The CLI converges everything into `anyhow`.

use thiserror::Error;

/// Errors that can be raised by any Folio crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// Data failed validation (empty names, bad language codes, counts).
    #[error("Validation error: {0}")]
    Validation(String),

    /// A string did not name any variant of the expected enum.
    #[error("Unknown {kind} value: '{value}'")]
    UnknownValue { kind: &'static str, value: String },
}
