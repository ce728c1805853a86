//! Keyword index repository.
//!
//! `book_keywords` is only ever written through [`FolioService::replace_keywords`],
//! which swaps one book's full keyword set inside a single transaction.

use std::collections::BTreeSet;

use folio_core::entities::{BookId, KeywordEntry};
use folio_core::enums::KeywordKind;
use folio_core::text::fold_language;
use serde::Serialize;

use crate::error::DatabaseError;
use crate::helpers::{get_count, parse_enum};
use crate::service::FolioService;

/// Row counts of one [`FolioService::replace_keywords`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReplaceStats {
    pub removed: u64,
    pub inserted: u64,
}

/// Keyword rows that may match a query, heaviest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateBatch {
    pub entries: Vec<KeywordEntry>,
    /// More rows matched than the cap allowed; the lightest were dropped.
    pub truncated: bool,
}

/// Index size for one `(language, kind)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordStat {
    pub language_code: String,
    pub kind: KeywordKind,
    pub entries: u64,
    pub books: u64,
}

fn row_to_entry(row: &libsql::Row) -> Result<KeywordEntry, DatabaseError> {
    Ok(KeywordEntry {
        book_id: row.get::<i64>(0)?,
        keyword: row.get::<String>(1)?,
        kind: parse_enum(&row.get::<String>(2)?)?,
        language_code: row.get::<String>(3)?,
        weight: row.get::<f64>(4)?,
    })
}

impl FolioService {
    /// Replace every keyword row of `book_id` with `entries`.
    ///
    /// Delete and inserts run in one transaction. On any failure the
    /// transaction is rolled back and the previous rows stay in place.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidState` if an entry belongs to another
    /// book, or the underlying error if a statement fails (for example a
    /// non-positive weight or a duplicate key).
    pub async fn replace_keywords(
        &self,
        book_id: BookId,
        entries: &[KeywordEntry],
    ) -> Result<ReplaceStats, DatabaseError> {
        if let Some(foreign) = entries.iter().find(|e| e.book_id != book_id) {
            return Err(DatabaseError::InvalidState(format!(
                "keyword '{}' belongs to book {}, not {book_id}",
                foreign.keyword, foreign.book_id
            )));
        }

        let _guard = self.write_gate().await;
        self.in_transaction(async |conn| {
            let removed = conn
                .execute("DELETE FROM book_keywords WHERE book_id = ?1", [book_id])
                .await?;
            let mut inserted = 0u64;
            for entry in entries {
                inserted += conn
                    .execute(
                        "INSERT INTO book_keywords (book_id, keyword, kind, language_code, weight)
                         VALUES (?1, ?2, ?3, ?4, ?5)",
                        libsql::params![
                            book_id,
                            entry.keyword.as_str(),
                            entry.kind.as_str(),
                            fold_language(&entry.language_code),
                            entry.weight
                        ],
                    )
                    .await?;
            }
            Ok(ReplaceStats { removed, inserted })
        })
        .await
    }

    /// All keyword rows of one book, ordered by language, kind and keyword.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn keywords_for_book(
        &self,
        book_id: BookId,
    ) -> Result<Vec<KeywordEntry>, DatabaseError> {
        let _guard = self.read_gate().await;
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT book_id, keyword, kind, language_code, weight FROM book_keywords
                 WHERE book_id = ?1
                 ORDER BY language_code, kind, keyword",
                [book_id],
            )
            .await?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next().await? {
            entries.push(row_to_entry(&row)?);
        }
        Ok(entries)
    }

    /// Keyword rows in `language_code` that contain at least one of `tokens`.
    ///
    /// At most `cap` rows are returned, heaviest first with a deterministic
    /// tie order. `truncated` reports whether more rows matched.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn keyword_candidates(
        &self,
        language_code: &str,
        tokens: &[String],
        cap: u32,
    ) -> Result<CandidateBatch, DatabaseError> {
        let distinct: BTreeSet<&str> = tokens
            .iter()
            .map(String::as_str)
            .filter(|t| !t.is_empty())
            .collect();
        if distinct.is_empty() || cap == 0 {
            return Ok(CandidateBatch::default());
        }

        let clauses = vec!["instr(keyword, ?) > 0"; distinct.len()].join(" OR ");
        let sql = format!(
            "SELECT book_id, keyword, kind, language_code, weight FROM book_keywords
             WHERE language_code = ? AND ({clauses})
             ORDER BY weight DESC, book_id, keyword, kind
             LIMIT ?"
        );
        let mut params: Vec<libsql::Value> = Vec::with_capacity(distinct.len() + 2);
        params.push(language_code.into());
        params.extend(distinct.iter().map(|t| libsql::Value::from(*t)));
        params.push(libsql::Value::Integer(i64::from(cap) + 1));

        let _guard = self.read_gate().await;
        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next().await? {
            entries.push(row_to_entry(&row)?);
        }

        let limit = usize::try_from(cap).unwrap_or(usize::MAX);
        let truncated = entries.len() > limit;
        entries.truncate(limit);
        Ok(CandidateBatch { entries, truncated })
    }

    /// Entry and distinct-book counts per language and kind.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn keyword_stats(&self) -> Result<Vec<KeywordStat>, DatabaseError> {
        let _guard = self.read_gate().await;
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT language_code, kind, COUNT(*), COUNT(DISTINCT book_id)
                 FROM book_keywords
                 GROUP BY language_code, kind
                 ORDER BY language_code, kind",
                (),
            )
            .await?;
        let mut stats = Vec::new();
        while let Some(row) = rows.next().await? {
            stats.push(KeywordStat {
                language_code: row.get::<String>(0)?,
                kind: parse_enum(&row.get::<String>(1)?)?,
                entries: get_count(&row, 2)?,
                books: get_count(&row, 3)?,
            });
        }
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use folio_core::entities::KeywordEntry;
    use folio_core::enums::KeywordKind;
    use pretty_assertions::assert_eq;

    use super::{KeywordStat, ReplaceStats};
    use crate::error::DatabaseError;
    use crate::test_support::helpers::{entry, test_service};

    #[tokio::test]
    async fn replace_swaps_the_whole_set() {
        let svc = test_service().await;
        svc.replace_keywords(
            1,
            &[
                entry(1, "fiction", KeywordKind::Section, "en", 1.5),
                entry(1, "fantasy", KeywordKind::Genre, "en", 1.0),
            ],
        )
        .await
        .unwrap();

        let stats = svc
            .replace_keywords(1, &[entry(1, "romance", KeywordKind::Genre, "en", 1.0)])
            .await
            .unwrap();
        assert_eq!(
            stats,
            ReplaceStats {
                removed: 2,
                inserted: 1
            }
        );
        let rows = svc.keywords_for_book(1).await.unwrap();
        assert_eq!(rows, vec![entry(1, "romance", KeywordKind::Genre, "en", 1.0)]);
    }

    #[tokio::test]
    async fn failed_insert_keeps_previous_rows() {
        let svc = test_service().await;
        let before = vec![entry(1, "fantasy", KeywordKind::Genre, "en", 1.0)];
        svc.replace_keywords(1, &before).await.unwrap();

        let result = svc
            .replace_keywords(
                1,
                &[
                    entry(1, "romance", KeywordKind::Genre, "en", 1.0),
                    entry(1, "broken", KeywordKind::Tag, "en", 0.0),
                ],
            )
            .await;
        assert!(result.is_err());
        assert_eq!(svc.keywords_for_book(1).await.unwrap(), before);
    }

    #[tokio::test]
    async fn foreign_entries_are_rejected_before_writing() {
        let svc = test_service().await;
        svc.replace_keywords(2, &[entry(2, "x", KeywordKind::Tag, "en", 0.8)])
            .await
            .unwrap();
        let err = svc
            .replace_keywords(1, &[entry(2, "y", KeywordKind::Tag, "en", 0.8)])
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidState(_)));
        assert_eq!(svc.keywords_for_book(2).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn replacing_one_book_leaves_others() {
        let svc = test_service().await;
        svc.replace_keywords(1, &[entry(1, "a", KeywordKind::Tag, "en", 0.8)])
            .await
            .unwrap();
        svc.replace_keywords(2, &[entry(2, "b", KeywordKind::Tag, "en", 0.8)])
            .await
            .unwrap();
        svc.replace_keywords(1, &[]).await.unwrap();

        assert!(svc.keywords_for_book(1).await.unwrap().is_empty());
        assert_eq!(svc.keywords_for_book(2).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn candidates_are_language_scoped_substring_matches() {
        let svc = test_service().await;
        svc.replace_keywords(
            1,
            &[
                entry(1, "fantasy", KeywordKind::Genre, "en", 1.0),
                entry(1, "奇幻", KeywordKind::Genre, "zh", 1.0),
                entry(1, "romance", KeywordKind::Genre, "en", 1.0),
            ],
        )
        .await
        .unwrap();

        let batch = svc
            .keyword_candidates("en", &["ant".to_string()], 10)
            .await
            .unwrap();
        assert!(!batch.truncated);
        let keywords: Vec<&str> = batch.entries.iter().map(|e| e.keyword.as_str()).collect();
        assert_eq!(keywords, vec!["fantasy"]);

        let zh = svc
            .keyword_candidates("zh", &["fantasy".to_string()], 10)
            .await
            .unwrap();
        assert!(zh.entries.is_empty());
    }

    #[tokio::test]
    async fn candidates_are_capped_heaviest_first() {
        let svc = test_service().await;
        svc.replace_keywords(
            1,
            &[
                entry(1, "fire", KeywordKind::Title, "en", 2.0),
                entry(1, "firefly", KeywordKind::Tag, "en", 0.8),
            ],
        )
        .await
        .unwrap();
        svc.replace_keywords(2, &[entry(2, "wildfire", KeywordKind::Genre, "en", 1.0)])
            .await
            .unwrap();

        let batch = svc
            .keyword_candidates("en", &["fire".to_string(), "fire".to_string()], 2)
            .await
            .unwrap();
        assert!(batch.truncated);
        let got: Vec<(i64, &str)> = batch
            .entries
            .iter()
            .map(|e| (e.book_id, e.keyword.as_str()))
            .collect();
        assert_eq!(got, vec![(1, "fire"), (2, "wildfire")]);
    }

    #[tokio::test]
    async fn no_tokens_means_no_candidates() {
        let svc = test_service().await;
        let batch = svc.keyword_candidates("en", &[], 10).await.unwrap();
        assert_eq!(batch.entries, Vec::<KeywordEntry>::new());
    }

    #[tokio::test]
    async fn stats_group_by_language_and_kind() {
        let svc = test_service().await;
        svc.replace_keywords(
            1,
            &[
                entry(1, "a", KeywordKind::Tag, "en", 0.8),
                entry(1, "b", KeywordKind::Tag, "en", 0.8),
            ],
        )
        .await
        .unwrap();
        svc.replace_keywords(2, &[entry(2, "a", KeywordKind::Tag, "en", 0.8)])
            .await
            .unwrap();

        assert_eq!(
            svc.keyword_stats().await.unwrap(),
            vec![KeywordStat {
                language_code: "en".into(),
                kind: KeywordKind::Tag,
                entries: 3,
                books: 2,
            }]
        );
    }
}
