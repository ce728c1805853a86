//! Entity structs for Folio catalog facts and index rows.
//!
//! Fact structs mirror the catalog tables in `folio-db` and are read-only to
//! the index builder. `KeywordEntry` is the one row type the index owns.

mod book;
mod facts;
mod keyword;

pub use book::{Book, BookCard, BookId};
pub use facts::{BookFacts, EntityFact, TaxonomyFact, TitleAuthorFact};
pub use keyword::KeywordEntry;
