//! # folio-core
//!
//! Core types shared across all Folio crates:
//! - Keyword, entity, taxonomy and status enums with their storage strings
//! - Catalog fact structs consumed by the index builder
//! - The `KeywordEntry` row that makes up the search index
//! - Keyword text folding
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod text;

pub use entities::BookId;
