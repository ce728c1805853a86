//! Catalog repository — books, editions and taxonomy.
//!
//! These writers stand in for the host application and the upstream
//! pipeline. None of them touch `book_keywords`; callers trigger an index
//! rebuild for the affected book afterwards.

use std::collections::BTreeMap;

use chrono::Utc;
use folio_core::entities::{Book, BookId};
use folio_core::enums::{BookStatus, TaxonomyKind};
use folio_core::text::fold_language;

use crate::error::DatabaseError;
use crate::helpers::{parse_enum, placeholders};
use crate::service::FolioService;

/// Table names backing one taxonomy.
pub(crate) struct TaxonomyTables {
    pub table: &'static str,
    pub names_table: &'static str,
    pub fk_column: &'static str,
}

pub(crate) const fn taxonomy_tables(kind: TaxonomyKind) -> TaxonomyTables {
    match kind {
        TaxonomyKind::Section => TaxonomyTables {
            table: "sections",
            names_table: "section_names",
            fk_column: "section_id",
        },
        TaxonomyKind::Genre => TaxonomyTables {
            table: "genres",
            names_table: "genre_names",
            fk_column: "genre_id",
        },
        TaxonomyKind::Tag => TaxonomyTables {
            table: "tags",
            names_table: "tag_names",
            fk_column: "tag_id",
        },
    }
}

fn row_to_book(row: &libsql::Row) -> Result<Book, DatabaseError> {
    Ok(Book {
        id: row.get::<i64>(0)?,
        slug: row.get::<String>(1)?,
        original_language: row.get::<String>(2)?,
        status: parse_enum(&row.get::<String>(3)?)?,
        section_id: row.get::<Option<i64>>(4)?,
    })
}

/// Look up the id of a taxonomy slug on an open connection.
async fn taxonomy_id(
    conn: &libsql::Connection,
    kind: TaxonomyKind,
    slug: &str,
) -> Result<Option<i64>, DatabaseError> {
    let tables = taxonomy_tables(kind);
    let mut rows = conn
        .query(
            &format!("SELECT id FROM {} WHERE slug = ?1", tables.table),
            [slug],
        )
        .await?;
    match rows.next().await? {
        Some(row) => Ok(Some(row.get::<i64>(0)?)),
        None => Ok(None),
    }
}

async fn require_taxonomy_ids(
    conn: &libsql::Connection,
    kind: TaxonomyKind,
    slugs: &[&str],
) -> Result<Vec<i64>, DatabaseError> {
    let mut ids = Vec::with_capacity(slugs.len());
    for slug in slugs {
        let id = taxonomy_id(conn, kind, slug)
            .await?
            .ok_or_else(|| DatabaseError::InvalidState(format!("unknown {kind} '{slug}'")))?;
        ids.push(id);
    }
    Ok(ids)
}

async fn replace_localized_names(
    conn: &libsql::Connection,
    tables: &TaxonomyTables,
    id: i64,
    localized: &BTreeMap<String, String>,
) -> Result<(), DatabaseError> {
    conn.execute(
        &format!(
            "DELETE FROM {} WHERE {} = ?1",
            tables.names_table, tables.fk_column
        ),
        [id],
    )
    .await?;
    for (language_code, name) in localized {
        conn.execute(
            &format!(
                "INSERT INTO {} ({}, language_code, name) VALUES (?1, ?2, ?3)",
                tables.names_table, tables.fk_column
            ),
            libsql::params![id, fold_language(language_code), name.as_str()],
        )
        .await?;
    }
    Ok(())
}

const TOUCH_BOOK: &str = "UPDATE books SET updated_at = ?1 WHERE id = ?2";

impl FolioService {
    /// Insert or update a section with its localized names. Returns its id.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if any statement fails.
    pub async fn upsert_section(
        &self,
        slug: &str,
        name: &str,
        localized: &BTreeMap<String, String>,
    ) -> Result<i64, DatabaseError> {
        let _guard = self.write_gate().await;
        self.in_transaction(async |conn| {
            conn.execute(
                "INSERT INTO sections (slug, name) VALUES (?1, ?2)
                 ON CONFLICT(slug) DO UPDATE SET name = excluded.name",
                libsql::params![slug, name],
            )
            .await?;
            let id = taxonomy_id(conn, TaxonomyKind::Section, slug)
                .await?
                .ok_or(DatabaseError::NoResult)?;
            replace_localized_names(conn, &taxonomy_tables(TaxonomyKind::Section), id, localized)
                .await?;
            Ok(id)
        })
        .await
    }

    /// Insert or update a genre. A sub-genre names its primary genre in
    /// `parent_slug`, which must already exist.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidState` for an unknown parent slug.
    pub async fn upsert_genre(
        &self,
        slug: &str,
        name: &str,
        localized: &BTreeMap<String, String>,
        parent_slug: Option<&str>,
    ) -> Result<i64, DatabaseError> {
        let _guard = self.write_gate().await;
        self.in_transaction(async |conn| {
            let parent_id = match parent_slug {
                Some(parent) => Some(
                    require_taxonomy_ids(conn, TaxonomyKind::Genre, &[parent])
                        .await?
                        .remove(0),
                ),
                None => None,
            };
            conn.execute(
                "INSERT INTO genres (slug, name, parent_id) VALUES (?1, ?2, ?3)
                 ON CONFLICT(slug) DO UPDATE SET name = excluded.name, parent_id = excluded.parent_id",
                libsql::params![slug, name, parent_id],
            )
            .await?;
            let id = taxonomy_id(conn, TaxonomyKind::Genre, slug)
                .await?
                .ok_or(DatabaseError::NoResult)?;
            if parent_id == Some(id) {
                return Err(DatabaseError::InvalidState(format!(
                    "genre '{slug}' cannot be its own parent"
                )));
            }
            replace_localized_names(conn, &taxonomy_tables(TaxonomyKind::Genre), id, localized)
                .await?;
            Ok(id)
        })
        .await
    }

    /// Insert or update a tag and its category.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if any statement fails.
    pub async fn upsert_tag(
        &self,
        slug: &str,
        name: &str,
        localized: &BTreeMap<String, String>,
        category: Option<&str>,
    ) -> Result<i64, DatabaseError> {
        let _guard = self.write_gate().await;
        self.in_transaction(async |conn| {
            conn.execute(
                "INSERT INTO tags (slug, name, category) VALUES (?1, ?2, ?3)
                 ON CONFLICT(slug) DO UPDATE SET name = excluded.name, category = excluded.category",
                libsql::params![slug, name, category],
            )
            .await?;
            let id = taxonomy_id(conn, TaxonomyKind::Tag, slug)
                .await?
                .ok_or(DatabaseError::NoResult)?;
            replace_localized_names(conn, &taxonomy_tables(TaxonomyKind::Tag), id, localized)
                .await?;
            Ok(id)
        })
        .await
    }

    /// Insert or update a book by slug. Returns its id.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the statement fails.
    pub async fn upsert_book(
        &self,
        slug: &str,
        original_language: &str,
        status: BookStatus,
    ) -> Result<BookId, DatabaseError> {
        let now = Utc::now().to_rfc3339();
        let original_language = fold_language(original_language);
        let _guard = self.write_gate().await;
        let mut rows = self
            .db()
            .conn()
            .query(
                "INSERT INTO books (slug, original_language, status, updated_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(slug) DO UPDATE SET
                    original_language = excluded.original_language,
                    status = excluded.status,
                    updated_at = excluded.updated_at
                 RETURNING id",
                libsql::params![slug, original_language.as_str(), status.as_str(), now.as_str()],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<i64>(0)?)
    }

    /// Insert or replace the title/author of one language edition.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the book does not exist or the write fails.
    pub async fn upsert_edition(
        &self,
        book_id: BookId,
        language_code: &str,
        title: &str,
        author: Option<&str>,
    ) -> Result<(), DatabaseError> {
        let now = Utc::now().to_rfc3339();
        let language_code = fold_language(language_code);
        let _guard = self.write_gate().await;
        self.in_transaction(async |conn| {
            conn.execute(
                "INSERT INTO book_editions (book_id, language_code, title, author)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(book_id, language_code) DO UPDATE SET
                    title = excluded.title, author = excluded.author",
                libsql::params![book_id, language_code.as_str(), title, author],
            )
            .await?;
            conn.execute(TOUCH_BOOK, libsql::params![now.as_str(), book_id])
                .await?;
            Ok(())
        })
        .await
    }

    /// Delete every edition of `book_id` whose language is not in `keep`.
    /// Returns the number of editions removed.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the delete fails.
    pub async fn retain_editions(
        &self,
        book_id: BookId,
        keep: &[&str],
    ) -> Result<u64, DatabaseError> {
        let mut params = vec![libsql::Value::from(book_id)];
        let sql = if keep.is_empty() {
            "DELETE FROM book_editions WHERE book_id = ?".to_string()
        } else {
            params.extend(keep.iter().map(|l| libsql::Value::from(fold_language(l))));
            format!(
                "DELETE FROM book_editions WHERE book_id = ? AND language_code NOT IN ({})",
                placeholders(keep.len())
            )
        };
        let _guard = self.write_gate().await;
        Ok(self
            .db()
            .conn()
            .execute(&sql, libsql::params_from_iter(params))
            .await?)
    }

    /// Assign (or clear with `None`) a book's section.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidState` for an unknown section slug.
    pub async fn assign_section(
        &self,
        book_id: BookId,
        section_slug: Option<&str>,
    ) -> Result<(), DatabaseError> {
        let _guard = self.write_gate().await;
        self.in_transaction(async |conn| {
            let section_id = match section_slug {
                Some(slug) => Some(
                    require_taxonomy_ids(conn, TaxonomyKind::Section, &[slug])
                        .await?
                        .remove(0),
                ),
                None => None,
            };
            let updated = conn
                .execute(
                    "UPDATE books SET section_id = ?1, updated_at = ?2 WHERE id = ?3",
                    libsql::params![section_id, Utc::now().to_rfc3339(), book_id],
                )
                .await?;
            if updated == 0 {
                return Err(DatabaseError::InvalidState(format!("unknown book {book_id}")));
            }
            Ok(())
        })
        .await
    }

    /// Replace a book's genre assignments.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidState` if any slug is unknown; nothing
    /// is changed in that case.
    pub async fn set_book_genres(
        &self,
        book_id: BookId,
        genre_slugs: &[&str],
    ) -> Result<(), DatabaseError> {
        self.set_assignments(book_id, TaxonomyKind::Genre, genre_slugs)
            .await
    }

    /// Replace a book's tag assignments.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidState` if any slug is unknown; nothing
    /// is changed in that case.
    pub async fn set_book_tags(
        &self,
        book_id: BookId,
        tag_slugs: &[&str],
    ) -> Result<(), DatabaseError> {
        self.set_assignments(book_id, TaxonomyKind::Tag, tag_slugs)
            .await
    }

    async fn set_assignments(
        &self,
        book_id: BookId,
        kind: TaxonomyKind,
        slugs: &[&str],
    ) -> Result<(), DatabaseError> {
        let (table, column) = match kind {
            TaxonomyKind::Genre => ("book_genres", "genre_id"),
            TaxonomyKind::Tag => ("book_tags", "tag_id"),
            TaxonomyKind::Section => {
                return Err(DatabaseError::InvalidState(
                    "sections are assigned with assign_section".into(),
                ));
            }
        };
        let now = Utc::now().to_rfc3339();
        let _guard = self.write_gate().await;
        self.in_transaction(async |conn| {
            let ids = require_taxonomy_ids(conn, kind, slugs).await?;
            conn.execute(&format!("DELETE FROM {table} WHERE book_id = ?1"), [book_id])
                .await?;
            for id in ids {
                conn.execute(
                    &format!("INSERT OR IGNORE INTO {table} (book_id, {column}) VALUES (?1, ?2)"),
                    libsql::params![book_id, id],
                )
                .await?;
            }
            conn.execute(TOUCH_BOOK, libsql::params![now.as_str(), book_id])
                .await?;
            Ok(())
        })
        .await
    }

    /// Delete a book and, through foreign keys, all of its facts.
    ///
    /// Keyword rows are left for the next rebuild of `book_id` to remove.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the delete fails.
    pub async fn delete_book(&self, book_id: BookId) -> Result<bool, DatabaseError> {
        let _guard = self.write_gate().await;
        let removed = self
            .db()
            .conn()
            .execute("DELETE FROM books WHERE id = ?1", [book_id])
            .await?;
        Ok(removed > 0)
    }

    /// Fetch a single book, `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn get_book(&self, book_id: BookId) -> Result<Option<Book>, DatabaseError> {
        let _guard = self.read_gate().await;
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT id, slug, original_language, status, section_id FROM books WHERE id = ?1",
                [book_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_book(&row)?)),
            None => Ok(None),
        }
    }

    /// Every book id in ascending order.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn all_book_ids(&self) -> Result<Vec<BookId>, DatabaseError> {
        let _guard = self.read_gate().await;
        let mut rows = self
            .db()
            .conn()
            .query("SELECT id FROM books ORDER BY id", ())
            .await?;
        let mut ids = Vec::new();
        while let Some(row) = rows.next().await? {
            ids.push(row.get::<i64>(0)?);
        }
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use folio_core::enums::BookStatus;
    use pretty_assertions::assert_eq;

    use crate::error::DatabaseError;
    use crate::test_support::helpers::{names, test_service};

    #[tokio::test]
    async fn upsert_book_is_keyed_by_slug() {
        let svc = test_service().await;
        let first = svc
            .upsert_book("lost-kingdom", "zh", BookStatus::Ongoing)
            .await
            .unwrap();
        let second = svc
            .upsert_book("lost-kingdom", "zh", BookStatus::Completed)
            .await
            .unwrap();
        assert_eq!(first, second);

        let book = svc.get_book(first).await.unwrap().unwrap();
        assert_eq!(book.status, BookStatus::Completed);
        assert_eq!(book.original_language, "zh");
    }

    #[tokio::test]
    async fn get_missing_book_is_none() {
        let svc = test_service().await;
        assert!(svc.get_book(404).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn sub_genre_requires_existing_parent() {
        let svc = test_service().await;
        let err = svc
            .upsert_genre("eastern-fantasy", "Eastern Fantasy", &BTreeMap::new(), Some("fantasy"))
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidState(_)));

        svc.upsert_genre("fantasy", "Fantasy", &BTreeMap::new(), None)
            .await
            .unwrap();
        svc.upsert_genre("eastern-fantasy", "Eastern Fantasy", &BTreeMap::new(), Some("fantasy"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn unknown_tag_slug_leaves_assignments_untouched() {
        let svc = test_service().await;
        let book = svc.upsert_book("b", "en", BookStatus::Ongoing).await.unwrap();
        svc.upsert_tag("revenge", "Revenge", &BTreeMap::new(), Some("plot"))
            .await
            .unwrap();
        svc.set_book_tags(book, &["revenge"]).await.unwrap();

        assert!(svc.set_book_tags(book, &["revenge", "missing"]).await.is_err());

        let facts = svc.book_facts(book).await.unwrap().unwrap();
        assert_eq!(facts.tags.len(), 1);
        assert_eq!(facts.tags[0].slug, "revenge");
    }

    #[tokio::test]
    async fn localized_names_are_replaced_on_upsert() {
        let svc = test_service().await;
        svc.upsert_section("fiction", "Fiction", &names(&[("en", "Fiction"), ("zh", "小说")]))
            .await
            .unwrap();
        svc.upsert_section("fiction", "Fiction", &names(&[("fr", "Romans")]))
            .await
            .unwrap();

        let mut rows = svc
            .db()
            .conn()
            .query("SELECT language_code FROM section_names ORDER BY language_code", ())
            .await
            .unwrap();
        let mut langs = Vec::new();
        while let Some(row) = rows.next().await.unwrap() {
            langs.push(row.get::<String>(0).unwrap());
        }
        assert_eq!(langs, vec!["fr".to_string()]);
    }

    #[tokio::test]
    async fn assign_section_to_missing_book_fails() {
        let svc = test_service().await;
        svc.upsert_section("fiction", "Fiction", &BTreeMap::new())
            .await
            .unwrap();
        assert!(svc.assign_section(77, Some("fiction")).await.is_err());
    }

    #[tokio::test]
    async fn all_book_ids_are_sorted() {
        let svc = test_service().await;
        let b = svc.upsert_book("b", "en", BookStatus::Ongoing).await.unwrap();
        let a = svc.upsert_book("a", "en", BookStatus::Ongoing).await.unwrap();
        let mut expected = vec![a, b];
        expected.sort_unstable();
        assert_eq!(svc.all_book_ids().await.unwrap(), expected);
    }

    #[tokio::test]
    async fn language_codes_are_folded_on_write() {
        let svc = test_service().await;
        let book = svc.upsert_book("b", " ZH ", BookStatus::Ongoing).await.unwrap();
        svc.upsert_edition(book, "EN", "Title", None).await.unwrap();

        let facts = svc.book_facts(book).await.unwrap().unwrap();
        assert_eq!(facts.book.original_language, "zh");
        assert_eq!(facts.editions[0].language_code, "en");
    }

    #[tokio::test]
    async fn retain_editions_drops_unlisted_languages() {
        let svc = test_service().await;
        let book = svc.upsert_book("b", "zh", BookStatus::Ongoing).await.unwrap();
        for lang in ["zh", "en", "fr"] {
            svc.upsert_edition(book, lang, "Title", None).await.unwrap();
        }

        assert_eq!(svc.retain_editions(book, &["EN", "zh"]).await.unwrap(), 1);
        let facts = svc.book_facts(book).await.unwrap().unwrap();
        let langs: Vec<&str> = facts.editions.iter().map(|e| e.language_code.as_str()).collect();
        assert_eq!(langs, vec!["en", "zh"]);

        assert_eq!(svc.retain_editions(book, &[]).await.unwrap(), 2);
        assert!(svc.book_facts(book).await.unwrap().unwrap().editions.is_empty());
    }
}
