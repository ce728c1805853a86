//! # folio-search
//!
//! Keyword search over the Folio index.
//!
//! A request flows through:
//! - [`normalize`] — raw text to folded tokens
//! - [`matcher`] — tokens to `(row, match kind)` pairs, exact/prefix/contains
//! - [`score`] — weighted, additive per-book scores
//! - [`filter`] — language, section, genre, tag and status constraints
//! - [`rank`] — score order with id tie-break, then the limit
//!
//! [`SearchEngine`] wires these together and materializes ranked ids into
//! display cards without losing their order.

pub mod engine;
pub mod error;
pub mod filter;
pub mod matcher;
pub mod normalize;
pub mod rank;
pub mod score;

pub use engine::{SearchEngine, SearchRequest, SearchResult};
pub use error::{QueryError, SearchError};
pub use filter::SearchFilters;
pub use rank::RankedBook;
