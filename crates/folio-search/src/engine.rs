//! Search orchestration.
//!
//! normalize -> match -> aggregate -> filter -> rank. Each call reads fresh
//! rows from the store and shares no mutable state with other calls.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use folio_config::SearchConfig;
use folio_core::entities::{BookCard, BookId};
use folio_core::text::fold_language;
use folio_db::service::FolioService;
use serde::{Deserialize, Serialize};

use crate::error::SearchError;
use crate::filter::{self, SearchFilters};
use crate::matcher;
use crate::normalize::Query;
use crate::rank::{self, RankedBook};
use crate::score::{self, MatchMultipliers};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub language_code: String,
    #[serde(default)]
    pub filters: SearchFilters,
    /// Falls back to the configured default when `None`.
    #[serde(default)]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResult {
    /// Book ids in rank order.
    pub item_ids: Vec<BookId>,
    /// Scores aligned with `item_ids`.
    pub scores: Vec<f64>,
    /// Distinct keywords that matched a returned book, sorted.
    pub matched_keywords: Vec<String>,
    /// Books that passed the filters, before the limit applied.
    pub total_results: u32,
    pub elapsed: Duration,
    pub tokens: Vec<String>,
    /// The candidate cap dropped keyword rows; low-weight matches may be missing.
    pub candidates_truncated: bool,
}

impl SearchResult {
    fn empty(tokens: Vec<String>, started: Instant) -> Self {
        Self {
            tokens,
            elapsed: started.elapsed(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn hits(&self) -> Vec<RankedBook> {
        self.item_ids
            .iter()
            .zip(&self.scores)
            .map(|(&book_id, &score)| RankedBook { book_id, score })
            .collect()
    }
}

/// Answers search requests against one store.
pub struct SearchEngine {
    service: Arc<FolioService>,
    multipliers: MatchMultipliers,
    max_candidates: u32,
    max_tokens: u32,
    default_limit: u32,
    max_limit: u32,
}

impl SearchEngine {
    #[must_use]
    pub fn new(service: Arc<FolioService>, config: &SearchConfig) -> Self {
        Self {
            service,
            multipliers: MatchMultipliers::from_config(config),
            max_candidates: config.max_candidates,
            max_tokens: config.max_tokens,
            default_limit: config.default_limit,
            max_limit: config.max_limit,
        }
    }

    fn resolve_limit(&self, requested: Option<u32>) -> Result<usize, SearchError> {
        let limit = requested.unwrap_or(self.default_limit);
        if limit == 0 || limit > self.max_limit {
            return Err(SearchError::InvalidLimit {
                limit,
                max: self.max_limit,
            });
        }
        Ok(limit as usize)
    }

    /// Run one search.
    ///
    /// A query without tokens returns an empty result without reading the store.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidLimit`] for a limit outside
    /// `1..=max_limit`, [`SearchError::InvalidQuery`] for more than
    /// `max_tokens` tokens and [`SearchError::StoreUnavailable`] if any store
    /// read fails.
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResult, SearchError> {
        let started = Instant::now();
        let limit = self.resolve_limit(request.limit)?;

        let Ok(query) = Query::parse(&request.query) else {
            tracing::debug!("empty query");
            return Ok(SearchResult::empty(Vec::new(), started));
        };
        let tokens = query.into_tokens();
        if tokens.len() > self.max_tokens as usize {
            return Err(SearchError::InvalidQuery {
                tokens: tokens.len(),
                max: self.max_tokens,
            });
        }
        let language = fold_language(&request.language_code);
        let language = language.as_str();

        let found = matcher::find_matches(&self.service, &tokens, language, self.max_candidates)
            .await?;
        if found.truncated {
            tracing::warn!(
                language,
                ?tokens,
                cap = self.max_candidates,
                "keyword candidates truncated"
            );
        }

        let scores = score::aggregate(&found.matches, &self.multipliers);
        if scores.is_empty() {
            let mut result = SearchResult::empty(tokens, started);
            result.candidates_truncated = found.truncated;
            return Ok(result);
        }

        let candidates: Vec<BookId> = scores.keys().copied().collect();
        let filtered = filter::apply(&self.service, &candidates, language, &request.filters).await?;
        let ranking = rank::rank(&scores, &filtered, limit);

        let returned: BTreeSet<BookId> = ranking.hits.iter().map(|h| h.book_id).collect();
        let matched_keywords: BTreeSet<&str> = found
            .matches
            .iter()
            .filter(|m| returned.contains(&m.entry.book_id))
            .map(|m| m.entry.keyword.as_str())
            .collect();

        let result = SearchResult {
            item_ids: ranking.hits.iter().map(|h| h.book_id).collect(),
            scores: ranking.hits.iter().map(|h| h.score).collect(),
            matched_keywords: matched_keywords.into_iter().map(str::to_string).collect(),
            total_results: u32::try_from(ranking.total).unwrap_or(u32::MAX),
            elapsed: started.elapsed(),
            tokens,
            candidates_truncated: found.truncated,
        };
        tracing::debug!(
            language,
            tokens = ?result.tokens,
            matches = found.matches.len(),
            scored = scores.len(),
            total = result.total_results,
            elapsed_ms = result.elapsed.as_millis(),
            "search finished"
        );
        Ok(result)
    }

    /// Load display cards for a result, in rank order.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::StoreUnavailable`] if the store read fails.
    pub async fn materialize(
        &self,
        result: &SearchResult,
        language_code: &str,
    ) -> Result<Vec<BookCard>, SearchError> {
        Ok(self
            .service
            .books_in_order(&result.item_ids, &fold_language(language_code))
            .await?)
    }
}
