//! Index rebuilds.
//!
//! A rebuild gathers one book's facts, runs every extractor, collapses
//! duplicate `(keyword, kind, language)` candidates to their heaviest weight,
//! and hands the result to [`FolioService::replace_keywords`], which swaps
//! the book's rows in one transaction.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use folio_config::FolioConfig;
use folio_core::entities::{BookId, KeywordEntry};
use folio_core::enums::{KeywordKind, KeywordSource};
use folio_db::service::FolioService;
use serde::Serialize;

use crate::entity_weight::EntityWeightCalculator;
use crate::error::IndexError;
use crate::extract::{ExtractContext, Extractor, KeywordCandidate, extractors};
use crate::weights::WeightTable;

/// Outcome of one successful rebuild.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RebuildStats {
    pub book_id: BookId,
    /// The book has no catalog row; its keyword rows were removed.
    pub book_missing: bool,
    /// Rows inserted per keyword kind.
    pub per_kind: BTreeMap<KeywordKind, u64>,
    pub removed: u64,
    pub inserted: u64,
    /// Candidates dropped because a heavier duplicate won.
    pub duplicates_collapsed: u64,
}

/// One book that [`IndexBuilder::rebuild_all`] could not rebuild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedRebuild {
    pub book_id: BookId,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BulkRebuildReport {
    pub rebuilt: Vec<RebuildStats>,
    pub failed: Vec<FailedRebuild>,
}

impl BulkRebuildReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    #[must_use]
    pub fn inserted(&self) -> u64 {
        self.rebuilt.iter().map(|s| s.inserted).sum()
    }
}

/// Rebuilds keyword rows from catalog facts.
pub struct IndexBuilder {
    service: Arc<FolioService>,
    weights: WeightTable,
    entity_weights: EntityWeightCalculator,
    extractors: [(KeywordSource, Extractor); 6],
}

impl IndexBuilder {
    #[must_use]
    pub fn new(
        service: Arc<FolioService>,
        weights: WeightTable,
        entity_weights: EntityWeightCalculator,
    ) -> Self {
        Self {
            service,
            weights,
            entity_weights,
            extractors: extractors(),
        }
    }

    /// Build with weights taken from a loaded configuration.
    #[must_use]
    pub fn from_config(service: Arc<FolioService>, config: &FolioConfig) -> Self {
        Self::new(
            service,
            WeightTable::from_config(&config.weights),
            EntityWeightCalculator::from_config(&config.entity),
        )
    }

    #[cfg(test)]
    pub(crate) fn with_extractor(mut self, source: KeywordSource, extractor: Extractor) -> Self {
        for slot in &mut self.extractors {
            if slot.0 == source {
                slot.1 = extractor;
            }
        }
        self
    }

    /// Regenerate every keyword row of `book_id`.
    ///
    /// A book without a catalog row has its keyword rows removed and is
    /// reported with `book_missing`.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::RebuildFailure`] if fact loading, an extractor or
    /// the store fails. The book's previous rows are left untouched.
    pub async fn rebuild(&self, book_id: BookId) -> Result<RebuildStats, IndexError> {
        let started = Instant::now();
        let facts = self
            .service
            .book_facts(book_id)
            .await
            .map_err(|e| IndexError::rebuild(book_id, e))?;

        let Some(facts) = facts else {
            let replaced = self
                .service
                .replace_keywords(book_id, &[])
                .await
                .map_err(|e| IndexError::rebuild(book_id, e))?;
            tracing::info!(book_id, removed = replaced.removed, "removed keywords of missing book");
            return Ok(RebuildStats {
                book_id,
                book_missing: true,
                removed: replaced.removed,
                ..RebuildStats::default()
            });
        };

        let ctx = ExtractContext {
            facts: &facts,
            weights: &self.weights,
            entity_weights: &self.entity_weights,
        };
        let mut candidates = Vec::new();
        for (source, extractor) in &self.extractors {
            let extracted = extractor(&ctx).map_err(|e| IndexError::rebuild(book_id, e))?;
            tracing::debug!(book_id, %source, count = extracted.len(), "extracted candidates");
            candidates.extend(extracted);
        }

        let total = candidates.len();
        let entries = deduplicate(book_id, candidates);
        let duplicates_collapsed = (total - entries.len()) as u64;

        let replaced = self
            .service
            .replace_keywords(book_id, &entries)
            .await
            .map_err(|e| IndexError::rebuild(book_id, e))?;

        let mut per_kind = BTreeMap::new();
        for entry in &entries {
            *per_kind.entry(entry.kind).or_insert(0) += 1;
        }

        tracing::info!(
            book_id,
            inserted = replaced.inserted,
            removed = replaced.removed,
            duplicates_collapsed,
            elapsed_ms = started.elapsed().as_millis(),
            "rebuilt keyword index"
        );

        Ok(RebuildStats {
            book_id,
            book_missing: false,
            per_kind,
            removed: replaced.removed,
            inserted: replaced.inserted,
            duplicates_collapsed,
        })
    }

    /// Rebuild every book in the catalog, one transaction per book.
    ///
    /// A failing book is recorded in the report and does not stop the others.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Database`] only if the list of books cannot be read.
    pub async fn rebuild_all(&self) -> Result<BulkRebuildReport, IndexError> {
        let ids = self.service.all_book_ids().await?;
        let mut report = BulkRebuildReport::default();
        for book_id in ids {
            match self.rebuild(book_id).await {
                Ok(stats) => report.rebuilt.push(stats),
                Err(error) => {
                    tracing::warn!(book_id, %error, "rebuild failed");
                    report.failed.push(FailedRebuild {
                        book_id,
                        error: error.to_string(),
                    });
                }
            }
        }
        tracing::info!(
            rebuilt = report.rebuilt.len(),
            failed = report.failed.len(),
            "bulk rebuild finished"
        );
        Ok(report)
    }
}

/// Collapse candidates sharing `(keyword, kind, language)` to the heaviest,
/// in key order so unchanged facts always yield the same rows.
fn deduplicate(book_id: BookId, candidates: Vec<KeywordCandidate>) -> Vec<KeywordEntry> {
    let mut best: BTreeMap<(String, KeywordKind, String), f64> = BTreeMap::new();
    for candidate in candidates {
        let key = (candidate.text, candidate.kind, candidate.language_code);
        best.entry(key)
            .and_modify(|weight| *weight = weight.max(candidate.weight))
            .or_insert(candidate.weight);
    }
    best.into_iter()
        .map(|((keyword, kind, language_code), weight)| KeywordEntry {
            book_id,
            keyword,
            kind,
            language_code,
            weight,
        })
        .collect()
}
