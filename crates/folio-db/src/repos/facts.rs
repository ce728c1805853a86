//! Assembles every source fact of one book for the index builder.

use std::collections::BTreeMap;

use folio_core::entities::{Book, BookFacts, BookId, TaxonomyFact, TitleAuthorFact};
use folio_core::enums::TaxonomyKind;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_enum};
use crate::repos::catalog::taxonomy_tables;
use crate::repos::entity::load_entity_facts;
use crate::service::FolioService;

/// A taxonomy row before its localized names and parent are attached.
struct TaxonomyRow {
    id: i64,
    slug: String,
    name: String,
    category: Option<String>,
    parent_id: Option<i64>,
}

impl FolioService {
    /// Load the facts of one book in a single consistent read.
    ///
    /// Returns `None` when the book does not exist.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if any query fails.
    pub async fn book_facts(&self, book_id: BookId) -> Result<Option<BookFacts>, DatabaseError> {
        let _guard = self.read_gate().await;
        let conn = self.db().conn();

        let mut rows = conn
            .query(
                "SELECT id, slug, original_language, status, section_id FROM books WHERE id = ?1",
                [book_id],
            )
            .await?;
        let Some(row) = rows.next().await? else {
            return Ok(None);
        };
        let book = Book {
            id: row.get::<i64>(0)?,
            slug: row.get::<String>(1)?,
            original_language: row.get::<String>(2)?,
            status: parse_enum(&row.get::<String>(3)?)?,
            section_id: row.get::<Option<i64>>(4)?,
        };
        drop(rows);

        let editions = load_editions(conn, book_id).await?;

        let section = match book.section_id {
            Some(section_id) => load_taxonomy(conn, TaxonomyKind::Section, section_id).await?,
            None => None,
        };

        let genres = load_assigned(conn, TaxonomyKind::Genre, "book_genres", book_id).await?;
        let tags = load_assigned(conn, TaxonomyKind::Tag, "book_tags", book_id).await?;
        let entities = load_entity_facts(conn, book_id).await?;

        Ok(Some(BookFacts {
            book,
            editions,
            section,
            genres,
            tags,
            entities,
        }))
    }
}

async fn load_editions(
    conn: &libsql::Connection,
    book_id: BookId,
) -> Result<Vec<TitleAuthorFact>, DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT language_code, title, author FROM book_editions
             WHERE book_id = ?1 ORDER BY language_code",
            [book_id],
        )
        .await?;
    let mut editions = Vec::new();
    while let Some(row) = rows.next().await? {
        editions.push(TitleAuthorFact {
            book_id,
            language_code: row.get::<String>(0)?,
            title: row.get::<String>(1)?,
            author: get_opt_string(&row, 2)?,
        });
    }
    Ok(editions)
}

fn select_columns(kind: TaxonomyKind) -> &'static str {
    match kind {
        TaxonomyKind::Section => "t.id, t.slug, t.name, NULL, NULL",
        TaxonomyKind::Genre => "t.id, t.slug, t.name, NULL, t.parent_id",
        TaxonomyKind::Tag => "t.id, t.slug, t.name, t.category, NULL",
    }
}

fn row_to_taxonomy(row: &libsql::Row) -> Result<TaxonomyRow, DatabaseError> {
    Ok(TaxonomyRow {
        id: row.get::<i64>(0)?,
        slug: row.get::<String>(1)?,
        name: row.get::<String>(2)?,
        category: get_opt_string(row, 3)?,
        parent_id: row.get::<Option<i64>>(4)?,
    })
}

async fn load_localized_names(
    conn: &libsql::Connection,
    kind: TaxonomyKind,
    id: i64,
) -> Result<BTreeMap<String, String>, DatabaseError> {
    let tables = taxonomy_tables(kind);
    let mut rows = conn
        .query(
            &format!(
                "SELECT language_code, name FROM {} WHERE {} = ?1",
                tables.names_table, tables.fk_column
            ),
            [id],
        )
        .await?;
    let mut names = BTreeMap::new();
    while let Some(row) = rows.next().await? {
        names.insert(row.get::<String>(0)?, row.get::<String>(1)?);
    }
    Ok(names)
}

/// Attach localized names and, for sub-genres, the primary genre.
async fn complete(
    conn: &libsql::Connection,
    kind: TaxonomyKind,
    row: TaxonomyRow,
) -> Result<TaxonomyFact, DatabaseError> {
    let localized_names = load_localized_names(conn, kind, row.id).await?;
    let parent = match row.parent_id {
        Some(parent_id) if parent_id != row.id => {
            let tables = taxonomy_tables(kind);
            let mut rows = conn
                .query(
                    &format!(
                        "SELECT {} FROM {} t WHERE t.id = ?1",
                        select_columns(kind),
                        tables.table
                    ),
                    [parent_id],
                )
                .await?;
            let parent_row = match rows.next().await? {
                Some(parent_row) => Some(row_to_taxonomy(&parent_row)?),
                None => None,
            };
            drop(rows);
            match parent_row {
                Some(parent_row) => {
                    let names = load_localized_names(conn, kind, parent_row.id).await?;
                    Some(Box::new(TaxonomyFact {
                        kind,
                        slug: parent_row.slug,
                        canonical_name: parent_row.name,
                        localized_names: names,
                        category: parent_row.category,
                        parent: None,
                    }))
                }
                None => None,
            }
        }
        _ => None,
    };
    Ok(TaxonomyFact {
        kind,
        slug: row.slug,
        canonical_name: row.name,
        localized_names,
        category: row.category,
        parent,
    })
}

async fn load_taxonomy(
    conn: &libsql::Connection,
    kind: TaxonomyKind,
    id: i64,
) -> Result<Option<TaxonomyFact>, DatabaseError> {
    let tables = taxonomy_tables(kind);
    let mut rows = conn
        .query(
            &format!(
                "SELECT {} FROM {} t WHERE t.id = ?1",
                select_columns(kind),
                tables.table
            ),
            [id],
        )
        .await?;
    let row = match rows.next().await? {
        Some(row) => row_to_taxonomy(&row)?,
        None => return Ok(None),
    };
    drop(rows);
    Ok(Some(complete(conn, kind, row).await?))
}

async fn load_assigned(
    conn: &libsql::Connection,
    kind: TaxonomyKind,
    join_table: &str,
    book_id: BookId,
) -> Result<Vec<TaxonomyFact>, DatabaseError> {
    let tables = taxonomy_tables(kind);
    let mut rows = conn
        .query(
            &format!(
                "SELECT {} FROM {} t
                 JOIN {join_table} j ON j.{} = t.id
                 WHERE j.book_id = ?1
                 ORDER BY t.slug",
                select_columns(kind),
                tables.table,
                tables.fk_column
            ),
            [book_id],
        )
        .await?;
    let mut assigned = Vec::new();
    while let Some(row) = rows.next().await? {
        assigned.push(row_to_taxonomy(&row)?);
    }
    drop(rows);

    let mut facts = Vec::with_capacity(assigned.len());
    for row in assigned {
        facts.push(complete(conn, kind, row).await?);
    }
    Ok(facts)
}
