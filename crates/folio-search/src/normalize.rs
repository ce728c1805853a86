//! Query normalization.

use folio_core::text::fold_token;

use crate::error::QueryError;

/// Trim, case-fold and split `raw` on whitespace, dropping empty tokens.
///
/// Repeated tokens are kept; each occurrence scores on its own.
#[must_use]
pub fn normalize(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(fold_token).collect()
}

/// A query with at least one token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    tokens: Vec<String>,
}

impl Query {
    /// # Errors
    ///
    /// Returns [`QueryError::Empty`] when `raw` holds no tokens.
    pub fn parse(raw: &str) -> Result<Self, QueryError> {
        let tokens = normalize(raw);
        if tokens.is_empty() {
            return Err(QueryError::Empty);
        }
        Ok(Self { tokens })
    }

    #[must_use]
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    #[must_use]
    pub fn into_tokens(self) -> Vec<String> {
        self.tokens
    }
}
