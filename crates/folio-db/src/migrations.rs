//! Database migration runner.
//!
//! Embeds the SQL migration files at compile time and executes them on
//! database open. All statements use `IF NOT EXISTS` for idempotent re-running.

use crate::FolioDb;
use crate::error::DatabaseError;

/// Catalog facts: books, editions, taxonomy, entity facts.
const MIGRATION_001: &str = include_str!("../migrations/001_catalog.sql");
/// Keyword index.
const MIGRATION_002: &str = include_str!("../migrations/002_keywords.sql");

impl FolioDb {
    /// Run all embedded migrations in sequence.
    pub(crate) async fn run_migrations(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(MIGRATION_001)
            .await
            .map_err(|e| DatabaseError::Migration(format!("001_catalog: {e}")))?;
        self.conn
            .execute_batch(MIGRATION_002)
            .await
            .map_err(|e| DatabaseError::Migration(format!("002_keywords: {e}")))?;
        Ok(())
    }
}
