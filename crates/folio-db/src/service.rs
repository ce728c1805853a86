//! Service layer wrapping the database handle.
//!
//! `FolioService` owns a `FolioDb` and a read/write gate. All repo methods are
//! implemented as `impl FolioService` blocks in [`crate::repos`].
//!
//! The connection is shared, so an open transaction is visible to every
//! statement issued on it. Writers hold the gate exclusively for the whole
//! transaction; readers hold it shared per query. A reader therefore sees
//! either the state before a rebuild or the state after it, never the rows
//! between its delete and its inserts.

use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::FolioDb;
use crate::error::DatabaseError;

pub struct FolioService {
    db: FolioDb,
    gate: RwLock<()>,
}

impl FolioService {
    /// Create a new service over a local database.
    ///
    /// # Arguments
    ///
    /// * `db_path` — Path to the libSQL database file, or `":memory:"` for tests.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = FolioDb::open_local(db_path).await?;
        Ok(Self::from_db(db))
    }

    /// Create from an existing `FolioDb`.
    #[must_use]
    pub fn from_db(db: FolioDb) -> Self {
        Self {
            db,
            gate: RwLock::new(()),
        }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &FolioDb {
        &self.db
    }

    /// Shared access for a read.
    pub(crate) async fn read_gate(&self) -> RwLockReadGuard<'_, ()> {
        self.gate.read().await
    }

    /// Exclusive access for a write transaction.
    pub(crate) async fn write_gate(&self) -> RwLockWriteGuard<'_, ()> {
        self.gate.write().await
    }

    /// Run `body` inside one transaction, committing on success and rolling
    /// back on any error. The caller must already hold the write gate.
    pub(crate) async fn in_transaction<T, F>(&self, body: F) -> Result<T, DatabaseError>
    where
        F: AsyncFnOnce(&libsql::Connection) -> Result<T, DatabaseError>,
    {
        let tx = self.db.conn().transaction().await?;
        let conn: &libsql::Connection = &tx;
        match body(conn).await {
            Ok(value) => {
                tx.commit().await?;
                Ok(value)
            }
            Err(error) => {
                if let Err(rollback_error) = tx.rollback().await {
                    tracing::warn!(%error, %rollback_error, "transaction rollback failed");
                }
                Err(error)
            }
        }
    }
}
