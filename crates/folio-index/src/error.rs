//! Error types for index maintenance.

use folio_core::entities::BookId;
use folio_core::enums::KeywordSource;
use folio_db::error::DatabaseError;

/// Errors from extracting keywords or rebuilding a book's index rows.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// An extractor produced an unusable candidate.
    #[error("{source_kind} extractor failed: {reason}")]
    Extract {
        source_kind: KeywordSource,
        reason: String,
    },

    /// Error from the libSQL store.
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),

    /// A rebuild was rolled back. The book's previous keyword rows are intact.
    #[error("rebuild of book {book_id} failed: {source}")]
    RebuildFailure {
        book_id: BookId,
        source: Box<IndexError>,
    },
}

impl IndexError {
    pub(crate) fn extract(source_kind: KeywordSource, reason: impl Into<String>) -> Self {
        Self::Extract {
            source_kind,
            reason: reason.into(),
        }
    }

    pub(crate) fn rebuild(book_id: BookId, source: impl Into<Self>) -> Self {
        Self::RebuildFailure {
            book_id,
            source: Box::new(source.into()),
        }
    }

    /// The book a failed rebuild was for.
    #[must_use]
    pub const fn book_id(&self) -> Option<BookId> {
        match self {
            Self::RebuildFailure { book_id, .. } => Some(*book_id),
            _ => None,
        }
    }

    /// Whether retrying the same rebuild may succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Database(e) => e.is_transient(),
            Self::RebuildFailure { source, .. } => source.is_transient(),
            Self::Extract { .. } => false,
        }
    }
}
