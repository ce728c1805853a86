//! Keyword kinds, entity types, taxonomy kinds, book status and match strength.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`
//! and expose `as_str()` for the value stored in SQL. `FromStr` returns
//! [`CoreError::UnknownValue`] for strings that name no variant.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// KeywordSource
// ---------------------------------------------------------------------------

/// The kind of source fact a keyword was extracted from.
///
/// This is the closed set the index builder dispatches over; every source
/// has exactly one extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordSource {
    Title,
    Author,
    Section,
    Genre,
    Tag,
    Entity,
}

impl KeywordSource {
    /// Every source in extraction order.
    pub const ALL: [Self; 6] = [
        Self::Title,
        Self::Author,
        Self::Section,
        Self::Genre,
        Self::Tag,
        Self::Entity,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Author => "author",
            Self::Section => "section",
            Self::Genre => "genre",
            Self::Tag => "tag",
            Self::Entity => "entity",
        }
    }
}

impl fmt::Display for KeywordSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EntityKind
// ---------------------------------------------------------------------------

/// Type of a named entity extracted from a book's text upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Character,
    Place,
    Term,
}

impl EntityKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Character => "character",
            Self::Place => "place",
            Self::Term => "term",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "character" => Ok(Self::Character),
            "place" => Ok(Self::Place),
            "term" => Ok(Self::Term),
            other => Err(CoreError::UnknownValue {
                kind: "entity kind",
                value: other.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// KeywordKind
// ---------------------------------------------------------------------------

/// Kind tag stored on every index row.
///
/// Entity keywords carry their entity type so that the same surface string
/// can exist once as a character and once as a place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordKind {
    Title,
    Author,
    Section,
    Genre,
    Tag,
    EntityCharacter,
    EntityPlace,
    EntityTerm,
}

impl KeywordKind {
    pub const ALL: [Self; 8] = [
        Self::Title,
        Self::Author,
        Self::Section,
        Self::Genre,
        Self::Tag,
        Self::EntityCharacter,
        Self::EntityPlace,
        Self::EntityTerm,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Author => "author",
            Self::Section => "section",
            Self::Genre => "genre",
            Self::Tag => "tag",
            Self::EntityCharacter => "entity_character",
            Self::EntityPlace => "entity_place",
            Self::EntityTerm => "entity_term",
        }
    }

    /// Keyword kind for an entity of the given type.
    #[must_use]
    pub const fn for_entity(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Character => Self::EntityCharacter,
            EntityKind::Place => Self::EntityPlace,
            EntityKind::Term => Self::EntityTerm,
        }
    }

    /// The source fact family this kind is extracted from.
    #[must_use]
    pub const fn source(self) -> KeywordSource {
        match self {
            Self::Title => KeywordSource::Title,
            Self::Author => KeywordSource::Author,
            Self::Section => KeywordSource::Section,
            Self::Genre => KeywordSource::Genre,
            Self::Tag => KeywordSource::Tag,
            Self::EntityCharacter | Self::EntityPlace | Self::EntityTerm => KeywordSource::Entity,
        }
    }
}

impl fmt::Display for KeywordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeywordKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| CoreError::UnknownValue {
                kind: "keyword kind",
                value: s.to_string(),
            })
    }
}

// ---------------------------------------------------------------------------
// TaxonomyKind
// ---------------------------------------------------------------------------

/// Which taxonomy a category fact belongs to.
///
/// Sections and tags are flat; genres are two-level (primary + sub).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxonomyKind {
    Section,
    Genre,
    Tag,
}

impl TaxonomyKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Section => "section",
            Self::Genre => "genre",
            Self::Tag => "tag",
        }
    }
}

impl fmt::Display for TaxonomyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// BookStatus
// ---------------------------------------------------------------------------

/// Publication status of a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookStatus {
    Ongoing,
    Completed,
    Hiatus,
    Dropped,
}

impl BookStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ongoing => "ongoing",
            Self::Completed => "completed",
            Self::Hiatus => "hiatus",
            Self::Dropped => "dropped",
        }
    }
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ongoing" => Ok(Self::Ongoing),
            "completed" => Ok(Self::Completed),
            "hiatus" => Ok(Self::Hiatus),
            "dropped" => Ok(Self::Dropped),
            other => Err(CoreError::UnknownValue {
                kind: "book status",
                value: other.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// MatchKind
// ---------------------------------------------------------------------------

/// How strongly a query token matched a keyword.
///
/// Ordered weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Keyword contains the token somewhere after its first character.
    Contains,
    /// Keyword starts with the token and is longer than it.
    Prefix,
    /// Keyword equals the token.
    Exact,
}

impl MatchKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Contains => "contains",
            Self::Prefix => "prefix",
            Self::Exact => "exact",
        }
    }
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
