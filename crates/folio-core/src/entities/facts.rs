use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entities::{Book, BookId};
use crate::enums::{EntityKind, TaxonomyKind};

/// Title and author of one language edition of a book.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TitleAuthorFact {
    pub book_id: BookId,
    pub language_code: String,
    pub title: String,
    pub author: Option<String>,
}

/// A section, genre or tag assigned to a book.
///
/// `canonical_name` belongs to no particular language; extractors emit it
/// under the book's original language. A sub-genre carries its primary genre
/// in `parent`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaxonomyFact {
    pub kind: TaxonomyKind,
    pub slug: String,
    pub canonical_name: String,
    #[serde(default)]
    pub localized_names: BTreeMap<String, String>,
    /// Tag category (tags only).
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub parent: Option<Box<TaxonomyFact>>,
}

/// A named character, place or term extracted upstream, with usage statistics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EntityFact {
    pub book_id: BookId,
    pub entity_type: EntityKind,
    pub canonical_name: String,
    #[serde(default)]
    pub translated_names: BTreeMap<String, String>,
    pub occurrence_count: u64,
    /// Chapters or segments in the same book.
    pub total_unit_count: u64,
}

/// Every source fact the index builder needs for one book.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookFacts {
    pub book: Book,
    pub editions: Vec<TitleAuthorFact>,
    pub section: Option<TaxonomyFact>,
    pub genres: Vec<TaxonomyFact>,
    pub tags: Vec<TaxonomyFact>,
    pub entities: Vec<EntityFact>,
}
