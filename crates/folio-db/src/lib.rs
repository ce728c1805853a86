//! # folio-db
//!
//! libSQL storage for the Folio catalog and its keyword index.
//!
//! Holds two groups of tables:
//! - catalog facts (books, editions, sections, genres, tags, entity facts),
//!   written by the host and the upstream analysis pipeline
//! - the denormalized `book_keywords` index, written only by the index builder
//!   through [`service::FolioService::replace_keywords`]
//!
//! Uses the `libsql` crate (embedded `SQLite` fork) with local databases.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod service;

#[cfg(test)]
pub(crate) mod test_support;

use error::DatabaseError;
use libsql::Builder;

/// Central database handle.
///
/// Wraps a libSQL database and its single connection.
pub struct FolioDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl FolioDb {
    /// Open a local database at the given path (`":memory:"` for tests).
    ///
    /// Runs migrations automatically on open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Must be enabled per connection in SQLite.
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let folio_db = Self { db, conn };
        folio_db.run_migrations().await?;
        Ok(folio_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }
}
