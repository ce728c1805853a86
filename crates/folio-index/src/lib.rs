//! # folio-index
//!
//! Index maintenance for Folio: turns catalog facts into `book_keywords` rows.
//!
//! - [`WeightTable`] — base weight per keyword source
//! - [`EntityWeightCalculator`] — occurrence-based entity weight
//! - [`extract`] — one extractor per source, dispatched through a fixed table
//! - [`IndexBuilder`] — deduplicates candidates and swaps a book's rows atomically
//!
//! Hosts call [`IndexBuilder::rebuild`] whenever a book's facts change.

pub mod builder;
pub mod entity_weight;
pub mod error;
pub mod extract;
pub mod weights;

pub use builder::{BulkRebuildReport, FailedRebuild, IndexBuilder, RebuildStats};
pub use entity_weight::EntityWeightCalculator;
pub use error::IndexError;
pub use weights::WeightTable;
