use serde::{Deserialize, Serialize};

use crate::entities::BookId;
use crate::enums::KeywordKind;

/// One row of the keyword index.
///
/// Unique on `(book_id, keyword, kind, language_code)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KeywordEntry {
    pub book_id: BookId,
    /// Folded search term (see [`crate::text::fold_keyword`]).
    pub keyword: String,
    pub kind: KeywordKind,
    pub language_code: String,
    /// Relevance contribution when this entry matches. Always positive.
    pub weight: f64,
}
