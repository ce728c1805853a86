//! Keyword text folding.
//!
//! Index keywords and query tokens must fold the same way or exact matches
//! silently degrade to misses.

/// Fold a name into its index form: trimmed, lowercased, with internal
/// whitespace runs collapsed to a single space.
///
/// Returns `None` when nothing but whitespace remains.
#[must_use]
pub fn fold_keyword(raw: &str) -> Option<String> {
    let folded = raw
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ");
    if folded.is_empty() { None } else { Some(folded) }
}

/// Fold a single query token. Tokens never contain whitespace.
#[must_use]
pub fn fold_token(raw: &str) -> String {
    raw.to_lowercase()
}

/// Fold a language code: trimmed and ASCII-lowercased, so `"EN "` and
/// `"en"` name the same index partition.
#[must_use]
pub fn fold_language(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_case_and_whitespace() {
        assert_eq!(fold_keyword("  The  Lost\tKingdom ").as_deref(), Some("the lost kingdom"));
    }

    #[test]
    fn blank_names_fold_to_none() {
        assert_eq!(fold_keyword(""), None);
        assert_eq!(fold_keyword(" \n\t "), None);
    }

    #[test]
    fn non_ascii_is_case_folded() {
        assert_eq!(fold_keyword("ÉPOPÉE").as_deref(), Some("épopée"));
        assert_eq!(fold_keyword("李明").as_deref(), Some("李明"));
    }

    #[test]
    fn token_and_keyword_folding_agree() {
        assert_eq!(fold_token("Fantasy"), fold_keyword("Fantasy").unwrap());
    }

    #[test]
    fn language_codes_fold_to_lowercase() {
        assert_eq!(fold_language(" EN "), "en");
        assert_eq!(fold_language("zh-Hant"), "zh-hant");
    }
}
