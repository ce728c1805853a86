//! Repository modules, each an `impl FolioService` block.
//!
//! Writers take the service's write gate and run inside
//! [`FolioService::in_transaction`](crate::service::FolioService); readers
//! take the read gate for the duration of their query.

pub mod catalog;
pub mod entity;
pub mod facts;
pub mod filter;
pub mod keywords;
pub mod materialize;

pub use filter::BookFilter;
pub use keywords::{CandidateBatch, KeywordStat, ReplaceStats};
