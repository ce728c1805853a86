//! Filter engine: narrows scored candidates with caller constraints.
//!
//! Filters never change scores. A value that names nothing in the catalog
//! (an unknown status, section, genre or tag) yields an empty set rather than
//! an error.

use std::collections::BTreeSet;
use std::str::FromStr;

use folio_core::entities::BookId;
use folio_core::enums::BookStatus;
use folio_db::error::DatabaseError;
use folio_db::repos::BookFilter;
use folio_db::service::FolioService;
use serde::{Deserialize, Serialize};

/// Caller-supplied constraints as raw strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilters {
    pub section: Option<String>,
    pub genre: Option<String>,
    pub tag: Option<String>,
    pub status: Option<String>,
}

/// Constraints after parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedFilter {
    Constraints(BookFilter),
    /// Some value can never match.
    MatchesNothing,
}

fn present(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl SearchFilters {
    /// Parse the raw values. Blank values count as absent.
    #[must_use]
    pub fn resolve(&self) -> ResolvedFilter {
        let status = match present(self.status.as_ref()) {
            Some(raw) => match BookStatus::from_str(&raw.to_lowercase()) {
                Ok(status) => Some(status),
                Err(_) => return ResolvedFilter::MatchesNothing,
            },
            None => None,
        };
        ResolvedFilter::Constraints(BookFilter {
            section: present(self.section.as_ref()),
            genre: present(self.genre.as_ref()),
            tag: present(self.tag.as_ref()),
            status,
        })
    }
}

/// Keep the candidates readable in `language_code` that satisfy `filters`.
///
/// # Errors
///
/// Returns `DatabaseError` if the store query fails.
pub async fn apply(
    service: &FolioService,
    candidates: &[BookId],
    language_code: &str,
    filters: &SearchFilters,
) -> Result<BTreeSet<BookId>, DatabaseError> {
    match filters.resolve() {
        ResolvedFilter::MatchesNothing => {
            tracing::debug!(?filters, "filter value matches nothing");
            Ok(BTreeSet::new())
        }
        ResolvedFilter::Constraints(filter) => {
            service.filter_books(candidates, language_code, &filter).await
        }
    }
}
