//! Row-to-entity parsing helpers.
//!
//! Every repo converts `libsql::Row` (column-indexed) into typed structs.
//! These helpers isolate enum and count parsing.

use crate::error::DatabaseError;

/// Parse a TEXT column into a serde-deserializable enum.
///
/// Works with all folio-core enums that use `#[serde(rename_all = "snake_case")]`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string does not match any enum variant.
pub fn parse_enum<T: serde::de::DeserializeOwned>(s: &str) -> Result<T, DatabaseError> {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .map_err(|e| DatabaseError::Query(format!("Failed to parse enum from '{s}': {e}")))
}

/// Read a nullable TEXT column. Returns `None` for both SQL NULL and empty string.
///
/// `row.get::<String>(idx)` on a NULL column returns an error, not `""`.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_opt_string(row: &libsql::Row, idx: i32) -> Result<Option<String>, DatabaseError> {
    match row.get::<Option<String>>(idx)? {
        Some(s) if s.is_empty() => Ok(None),
        other => Ok(other),
    }
}

/// Read an INTEGER column that holds a non-negative count.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the stored value is negative.
pub fn get_count(row: &libsql::Row, idx: i32) -> Result<u64, DatabaseError> {
    let raw = row.get::<i64>(idx)?;
    u64::try_from(raw)
        .map_err(|_| DatabaseError::Query(format!("negative count {raw} in column {idx}")))
}

/// Convert a count into the INTEGER form SQLite stores.
///
/// # Errors
///
/// Returns `DatabaseError::InvalidState` if the count exceeds `i64::MAX`.
pub fn count_to_sql(count: u64) -> Result<i64, DatabaseError> {
    i64::try_from(count)
        .map_err(|_| DatabaseError::InvalidState(format!("count {count} does not fit in INTEGER")))
}

/// Build `?, ?, ?` with `n` anonymous placeholders.
#[must_use]
pub fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

#[cfg(test)]
mod tests {
    use folio_core::enums::{BookStatus, KeywordKind};

    use super::*;

    #[test]
    fn parse_enum_reads_snake_case() {
        let status: BookStatus = parse_enum("completed").unwrap();
        assert_eq!(status, BookStatus::Completed);
        let kind: KeywordKind = parse_enum("entity_place").unwrap();
        assert_eq!(kind, KeywordKind::EntityPlace);
    }

    #[test]
    fn parse_enum_rejects_unknown() {
        assert!(parse_enum::<BookStatus>("paused").is_err());
    }

    #[test]
    fn placeholders_join() {
        assert_eq!(placeholders(3), "?, ?, ?");
        assert_eq!(placeholders(0), "");
    }

    #[test]
    fn oversized_count_is_rejected() {
        assert!(count_to_sql(u64::MAX).is_err());
        assert_eq!(count_to_sql(7).unwrap(), 7);
    }
}
