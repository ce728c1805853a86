//! Ordered materialization of ranked ids into display cards.

use folio_core::entities::{BookCard, BookId};

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_enum, placeholders};
use crate::service::FolioService;

impl FolioService {
    /// Load a card for each id, in exactly the order given.
    ///
    /// Title and author come from the edition in `language_code`, falling
    /// back to the original-language edition and finally to the slug.
    /// Ids with no catalog row are skipped.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn books_in_order(
        &self,
        ids: &[BookId],
        language_code: &str,
    ) -> Result<Vec<BookCard>, DatabaseError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let positions: String = (0..ids.len())
            .map(|pos| format!(" WHEN ? THEN {pos}"))
            .collect();
        let sql = format!(
            "SELECT b.id, b.slug,
                    CASE WHEN e.book_id IS NOT NULL THEN e.language_code ELSE b.original_language END,
                    COALESCE(e.title, o.title, b.slug),
                    CASE WHEN e.book_id IS NOT NULL THEN e.author ELSE o.author END,
                    b.status
             FROM books b
             LEFT JOIN book_editions e ON e.book_id = b.id AND e.language_code = ?
             LEFT JOIN book_editions o ON o.book_id = b.id AND o.language_code = b.original_language
             WHERE b.id IN ({})
             ORDER BY CASE b.id{positions} END",
            placeholders(ids.len())
        );

        let mut params: Vec<libsql::Value> = Vec::with_capacity(ids.len() * 2 + 1);
        params.push(libsql::Value::from(language_code));
        params.extend(ids.iter().map(|id| libsql::Value::Integer(*id)));
        params.extend(ids.iter().map(|id| libsql::Value::Integer(*id)));

        let _guard = self.read_gate().await;
        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        let mut cards = Vec::with_capacity(ids.len());
        while let Some(row) = rows.next().await? {
            cards.push(BookCard {
                id: row.get::<i64>(0)?,
                slug: row.get::<String>(1)?,
                language_code: row.get::<String>(2)?,
                title: row.get::<String>(3)?,
                author: get_opt_string(&row, 4)?,
                status: parse_enum(&row.get::<String>(5)?)?,
            });
        }
        Ok(cards)
    }
}
