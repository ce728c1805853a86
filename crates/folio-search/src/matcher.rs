//! Token-to-keyword matching.
//!
//! The store prefilters rows with a substring test; [`classify`] then decides
//! how strongly each token matches each row.

use folio_core::entities::KeywordEntry;
use folio_core::enums::MatchKind;
use folio_db::error::DatabaseError;
use folio_db::service::FolioService;

/// One token matching one index row.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordMatch {
    pub entry: KeywordEntry,
    pub token: String,
    pub kind: MatchKind,
}

/// Matches for a query plus whether the candidate cap cut rows off.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchSet {
    pub matches: Vec<KeywordMatch>,
    pub truncated: bool,
}

/// How `token` matches `keyword`, if at all.
///
/// `Exact` when equal, `Prefix` when the keyword starts with the token,
/// `Contains` for any other substring.
#[must_use]
pub fn classify(token: &str, keyword: &str) -> Option<MatchKind> {
    if token.is_empty() {
        None
    } else if token == keyword {
        Some(MatchKind::Exact)
    } else if keyword.starts_with(token) {
        Some(MatchKind::Prefix)
    } else if keyword.contains(token) {
        Some(MatchKind::Contains)
    } else {
        None
    }
}

/// Every `(entry, token)` pair that matches, in entry then token order.
#[must_use]
pub fn match_entries(tokens: &[String], entries: &[KeywordEntry]) -> Vec<KeywordMatch> {
    let mut matches = Vec::new();
    for entry in entries {
        for token in tokens {
            if let Some(kind) = classify(token, &entry.keyword) {
                matches.push(KeywordMatch {
                    entry: entry.clone(),
                    token: token.clone(),
                    kind,
                });
            }
        }
    }
    matches
}

/// Fetch candidate rows in `language_code` and classify them against `tokens`.
///
/// At most `max_candidates` rows are considered.
///
/// # Errors
///
/// Returns `DatabaseError` if the store query fails.
pub async fn find_matches(
    service: &FolioService,
    tokens: &[String],
    language_code: &str,
    max_candidates: u32,
) -> Result<MatchSet, DatabaseError> {
    let batch = service
        .keyword_candidates(language_code, tokens, max_candidates)
        .await?;
    Ok(MatchSet {
        matches: match_entries(tokens, &batch.entries),
        truncated: batch.truncated,
    })
}
