//! Final ordering of scored, filtered books.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use folio_core::entities::BookId;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankedBook {
    pub book_id: BookId,
    pub score: f64,
}

/// Ranked books and how many passed the filters before the limit applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ranking {
    pub hits: Vec<RankedBook>,
    pub total: usize,
}

/// Intersect `scores` with `filtered`, order by score descending then id
/// ascending, and keep the first `limit`.
#[must_use]
pub fn rank(scores: &BTreeMap<BookId, f64>, filtered: &BTreeSet<BookId>, limit: usize) -> Ranking {
    let mut hits: Vec<RankedBook> = scores
        .iter()
        .filter(|(id, _)| filtered.contains(*id))
        .map(|(&book_id, &score)| RankedBook { book_id, score })
        .collect();
    hits.sort_by(|a, b| match b.score.total_cmp(&a.score) {
        Ordering::Equal => a.book_id.cmp(&b.book_id),
        other => other,
    });
    let total = hits.len();
    hits.truncate(limit);
    Ranking { hits, total }
}
