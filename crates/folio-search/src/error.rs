//! Search error types for folio-search.

use folio_db::error::DatabaseError;

/// The raw query contained no tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("query is empty")]
    Empty,
}

/// Errors from a search call. A search either fails as a whole or returns a
/// complete result; there are no partial results.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The store could not answer. See [`Self::is_retryable`] for whether
    /// the same request may succeed later.
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[from] DatabaseError),

    /// Requested limit outside `1..=max`.
    #[error("invalid limit {limit}: must be between 1 and {max}")]
    InvalidLimit { limit: u32, max: u32 },

    /// The query has more tokens than one search may scan for.
    #[error("query has {tokens} tokens; at most {max} are allowed")]
    InvalidQuery { tokens: usize, max: u32 },
}

impl SearchError {
    /// Only lock contention and I/O-level store failures are worth retrying.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::StoreUnavailable(e) => e.is_transient(),
            Self::InvalidLimit { .. } | Self::InvalidQuery { .. } => false,
        }
    }
}
