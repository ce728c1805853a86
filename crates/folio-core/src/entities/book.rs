use serde::{Deserialize, Serialize};

use crate::enums::BookStatus;

/// Identifier of a catalog item.
pub type BookId = i64;

/// A catalog item in its language-agnostic identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Book {
    pub id: BookId,
    pub slug: String,
    pub original_language: String,
    pub status: BookStatus,
    pub section_id: Option<i64>,
}

/// A search hit materialized for display in one language.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookCard {
    pub id: BookId,
    pub slug: String,
    /// Language the title and author are shown in. Falls back to the
    /// original language when the book has no edition in the requested one.
    pub language_code: String,
    pub title: String,
    pub author: Option<String>,
    pub status: BookStatus,
}
