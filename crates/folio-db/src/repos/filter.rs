//! Catalog filters applied to search candidates.

use std::collections::BTreeSet;

use folio_core::entities::BookId;
use folio_core::enums::BookStatus;
use serde::{Deserialize, Serialize};

use crate::error::DatabaseError;
use crate::helpers::placeholders;
use crate::service::FolioService;

/// Candidate ids per `IN (...)` list, below `SQLite`'s bound-parameter limit.
const FILTER_CHUNK: usize = 500;

/// Optional constraints on a search. Every present field must hold.
///
/// Taxonomy constraints are slugs. A slug that names nothing matches no book.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookFilter {
    pub section: Option<String>,
    /// Matches books assigned this genre or one of its sub-genres.
    pub genre: Option<String>,
    pub tag: Option<String>,
    pub status: Option<BookStatus>,
}

impl BookFilter {
    /// Extra `WHERE` clauses and their parameters, in order.
    fn clauses(&self) -> (String, Vec<libsql::Value>) {
        let mut sql = String::new();
        let mut params = Vec::new();
        if let Some(section) = &self.section {
            sql.push_str(" AND b.section_id = (SELECT s.id FROM sections s WHERE s.slug = ?)");
            params.push(libsql::Value::from(section.as_str()));
        }
        if let Some(genre) = &self.genre {
            sql.push_str(
                " AND EXISTS (SELECT 1 FROM book_genres bg
                   JOIN genres g ON g.id = bg.genre_id
                   LEFT JOIN genres p ON p.id = g.parent_id
                   WHERE bg.book_id = b.id AND (g.slug = ? OR p.slug = ?))",
            );
            params.push(libsql::Value::from(genre.as_str()));
            params.push(libsql::Value::from(genre.as_str()));
        }
        if let Some(tag) = &self.tag {
            sql.push_str(
                " AND EXISTS (SELECT 1 FROM book_tags bt
                   JOIN tags t ON t.id = bt.tag_id
                   WHERE bt.book_id = b.id AND t.slug = ?)",
            );
            params.push(libsql::Value::from(tag.as_str()));
        }
        if let Some(status) = self.status {
            sql.push_str(" AND b.status = ?");
            params.push(libsql::Value::from(status.as_str()));
        }
        (sql, params)
    }
}

impl FolioService {
    /// The subset of `candidates` readable in `language_code` that satisfies
    /// `filter`.
    ///
    /// A book is readable in a language when it has an edition in it or was
    /// originally written in it.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if a query fails.
    pub async fn filter_books(
        &self,
        candidates: &[BookId],
        language_code: &str,
        filter: &BookFilter,
    ) -> Result<BTreeSet<BookId>, DatabaseError> {
        let mut kept = BTreeSet::new();
        if candidates.is_empty() {
            return Ok(kept);
        }

        let (extra_sql, extra_params) = filter.clauses();
        let _guard = self.read_gate().await;
        for chunk in candidates.chunks(FILTER_CHUNK) {
            let sql = format!(
                "SELECT b.id FROM books b
                 WHERE b.id IN ({})
                   AND (b.original_language = ?
                        OR EXISTS (SELECT 1 FROM book_editions e
                                   WHERE e.book_id = b.id AND e.language_code = ?)){extra_sql}",
                placeholders(chunk.len())
            );
            let mut params: Vec<libsql::Value> =
                chunk.iter().map(|id| libsql::Value::Integer(*id)).collect();
            params.push(libsql::Value::from(language_code));
            params.push(libsql::Value::from(language_code));
            params.extend(extra_params.iter().cloned());

            let mut rows = self
                .db()
                .conn()
                .query(&sql, libsql::params_from_iter(params))
                .await?;
            while let Some(row) = rows.next().await? {
                kept.insert(row.get::<i64>(0)?);
            }
        }
        Ok(kept)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use folio_core::enums::BookStatus;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::BookFilter;
    use crate::test_support::helpers::{seed_book, test_service};

    fn filter(section: Option<&str>, genre: Option<&str>, tag: Option<&str>) -> BookFilter {
        BookFilter {
            section: section.map(str::to_string),
            genre: genre.map(str::to_string),
            tag: tag.map(str::to_string),
            status: None,
        }
    }

    #[rstest]
    #[case::no_constraints(filter(None, None, None), true)]
    #[case::section(filter(Some("fiction"), None, None), true)]
    #[case::unknown_section(filter(Some("poetry"), None, None), false)]
    #[case::sub_genre(filter(None, Some("eastern-fantasy"), None), true)]
    #[case::parent_genre(filter(None, Some("fantasy"), None), true)]
    #[case::unknown_genre(filter(None, Some("horror"), None), false)]
    #[case::tag(filter(None, None, Some("revenge")), true)]
    #[case::all_three(filter(Some("fiction"), Some("fantasy"), Some("revenge")), true)]
    #[case::one_failing(filter(Some("fiction"), Some("fantasy"), Some("harem")), false)]
    #[tokio::test]
    async fn taxonomy_constraints(#[case] constraints: BookFilter, #[case] kept: bool) {
        let svc = test_service().await;
        let book = seed_book(&svc).await;

        let result = svc.filter_books(&[book], "en", &constraints).await.unwrap();
        assert_eq!(result.contains(&book), kept);
    }

    #[tokio::test]
    async fn status_constraint() {
        let svc = test_service().await;
        let book = seed_book(&svc).await;

        let ongoing = BookFilter {
            status: Some(BookStatus::Ongoing),
            ..BookFilter::default()
        };
        let completed = BookFilter {
            status: Some(BookStatus::Completed),
            ..BookFilter::default()
        };
        assert_eq!(svc.filter_books(&[book], "en", &ongoing).await.unwrap().len(), 1);
        assert!(svc.filter_books(&[book], "en", &completed).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn language_requires_edition_or_original() {
        let svc = test_service().await;
        let book = seed_book(&svc).await;
        let none = BookFilter::default();

        // seeded with zh original and en edition
        assert_eq!(svc.filter_books(&[book], "zh", &none).await.unwrap().len(), 1);
        assert_eq!(svc.filter_books(&[book], "en", &none).await.unwrap().len(), 1);
        assert!(svc.filter_books(&[book], "fr", &none).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_ids_are_dropped_and_chunks_merge() {
        let svc = test_service().await;
        let book = seed_book(&svc).await;

        let mut candidates: Vec<i64> = (10_000..11_200).collect();
        candidates.push(book);
        let result = svc
            .filter_books(&candidates, "en", &BookFilter::default())
            .await
            .unwrap();
        assert_eq!(result, BTreeSet::from([book]));
    }
}
