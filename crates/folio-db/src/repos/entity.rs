//! Entity fact repository — characters, places and terms with usage counts.

use std::collections::BTreeMap;

use folio_core::entities::{BookId, EntityFact};
use folio_core::text::fold_language;

use crate::error::DatabaseError;
use crate::helpers::{count_to_sql, get_count, parse_enum};
use crate::service::FolioService;

impl FolioService {
    /// Insert or update one entity fact, replacing its translated names.
    ///
    /// Facts are keyed by `(book_id, entity_type, canonical_name)`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidState` if either count does not fit in
    /// an INTEGER. Occurrences may exceed units (several mentions per chapter).
    pub async fn upsert_entity_fact(&self, fact: &EntityFact) -> Result<i64, DatabaseError> {
        let occurrences = count_to_sql(fact.occurrence_count)?;
        let units = count_to_sql(fact.total_unit_count)?;

        let _guard = self.write_gate().await;
        self.in_transaction(async |conn| {
            let mut rows = conn
                .query(
                    "INSERT INTO entity_facts
                        (book_id, entity_type, canonical_name, occurrence_count, total_unit_count)
                     VALUES (?1, ?2, ?3, ?4, ?5)
                     ON CONFLICT(book_id, entity_type, canonical_name) DO UPDATE SET
                        occurrence_count = excluded.occurrence_count,
                        total_unit_count = excluded.total_unit_count
                     RETURNING id",
                    libsql::params![
                        fact.book_id,
                        fact.entity_type.as_str(),
                        fact.canonical_name.as_str(),
                        occurrences,
                        units
                    ],
                )
                .await?;
            let id = rows
                .next()
                .await?
                .ok_or(DatabaseError::NoResult)?
                .get::<i64>(0)?;
            drop(rows);

            conn.execute("DELETE FROM entity_names WHERE entity_id = ?1", [id])
                .await?;
            for (language_code, name) in &fact.translated_names {
                conn.execute(
                    "INSERT INTO entity_names (entity_id, language_code, name) VALUES (?1, ?2, ?3)",
                    libsql::params![id, fold_language(language_code), name.as_str()],
                )
                .await?;
            }
            Ok(id)
        })
        .await
    }

    /// Remove every entity fact of a book.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the delete fails.
    pub async fn clear_entity_facts(&self, book_id: BookId) -> Result<u64, DatabaseError> {
        let _guard = self.write_gate().await;
        Ok(self
            .db()
            .conn()
            .execute("DELETE FROM entity_facts WHERE book_id = ?1", [book_id])
            .await?)
    }

    /// All entity facts of a book with their translated names, ordered by
    /// type then canonical name.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn entity_facts_for_book(
        &self,
        book_id: BookId,
    ) -> Result<Vec<EntityFact>, DatabaseError> {
        let _guard = self.read_gate().await;
        load_entity_facts(self.db().conn(), book_id).await
    }
}

pub(crate) async fn load_entity_facts(
    conn: &libsql::Connection,
    book_id: BookId,
) -> Result<Vec<EntityFact>, DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT f.id, f.entity_type, f.canonical_name, f.occurrence_count,
                    f.total_unit_count, n.language_code, n.name
             FROM entity_facts f
             LEFT JOIN entity_names n ON n.entity_id = f.id
             WHERE f.book_id = ?1
             ORDER BY f.entity_type, f.canonical_name, n.language_code",
            [book_id],
        )
        .await?;

    let mut facts: Vec<EntityFact> = Vec::new();
    let mut ids: Vec<i64> = Vec::new();
    while let Some(row) = rows.next().await? {
        let id = row.get::<i64>(0)?;
        if ids.last() != Some(&id) {
            ids.push(id);
            facts.push(EntityFact {
                book_id,
                entity_type: parse_enum(&row.get::<String>(1)?)?,
                canonical_name: row.get::<String>(2)?,
                translated_names: BTreeMap::new(),
                occurrence_count: get_count(&row, 3)?,
                total_unit_count: get_count(&row, 4)?,
            });
        }
        if let (Some(language_code), Some(name)) = (
            row.get::<Option<String>>(5)?,
            row.get::<Option<String>>(6)?,
        ) && let Some(fact) = facts.last_mut()
        {
            fact.translated_names.insert(language_code, name);
        }
    }
    Ok(facts)
}
