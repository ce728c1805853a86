//! Score aggregation.

use std::collections::BTreeMap;

use folio_config::SearchConfig;
use folio_core::entities::BookId;
use folio_core::enums::MatchKind;

use crate::matcher::KeywordMatch;

/// Multiplier applied to an entry's weight per match strength.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchMultipliers {
    pub exact: f64,
    pub prefix: f64,
    pub contains: f64,
}

impl Default for MatchMultipliers {
    fn default() -> Self {
        Self::from_config(&SearchConfig::default())
    }
}

impl MatchMultipliers {
    #[must_use]
    pub const fn from_config(config: &SearchConfig) -> Self {
        Self {
            exact: config.exact_multiplier,
            prefix: config.prefix_multiplier,
            contains: config.contains_multiplier,
        }
    }

    #[must_use]
    pub const fn for_kind(&self, kind: MatchKind) -> f64 {
        match kind {
            MatchKind::Exact => self.exact,
            MatchKind::Prefix => self.prefix,
            MatchKind::Contains => self.contains,
        }
    }
}

/// Sum `weight * multiplier` per book over every match.
///
/// Books without matches are absent from the result.
#[must_use]
pub fn aggregate(matches: &[KeywordMatch], multipliers: &MatchMultipliers) -> BTreeMap<BookId, f64> {
    let mut scores = BTreeMap::new();
    for m in matches {
        *scores.entry(m.entry.book_id).or_insert(0.0) +=
            m.entry.weight * multipliers.for_kind(m.kind);
    }
    scores
}
