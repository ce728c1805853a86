//! Keyword extractors, one per [`KeywordSource`].
//!
//! Each extractor sees the book's facts and returns candidates for its own
//! source only. Canonical names are emitted under the book's original
//! language, localized names under their own language. The builder merges
//! and deduplicates the outputs.

use folio_core::entities::{BookFacts, EntityFact, TaxonomyFact};
use folio_core::enums::{KeywordKind, KeywordSource};
use folio_core::text::fold_keyword;

use crate::entity_weight::EntityWeightCalculator;
use crate::error::IndexError;
use crate::weights::WeightTable;

/// One keyword an extractor wants indexed, before deduplication.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordCandidate {
    pub text: String,
    pub kind: KeywordKind,
    pub language_code: String,
    pub weight: f64,
}

/// Everything an extractor may read.
pub struct ExtractContext<'a> {
    pub facts: &'a BookFacts,
    pub weights: &'a WeightTable,
    pub entity_weights: &'a EntityWeightCalculator,
}

impl ExtractContext<'_> {
    fn original_language(&self) -> &str {
        &self.facts.book.original_language
    }
}

pub type Extractor = fn(&ExtractContext<'_>) -> Result<Vec<KeywordCandidate>, IndexError>;

/// One extractor per source, in extraction order.
#[must_use]
pub fn extractors() -> [(KeywordSource, Extractor); 6] {
    KeywordSource::ALL.map(|source| (source, extractor_for(source)))
}

fn extractor_for(source: KeywordSource) -> Extractor {
    match source {
        KeywordSource::Title => extract_titles,
        KeywordSource::Author => extract_authors,
        KeywordSource::Section => extract_section,
        KeywordSource::Genre => extract_genres,
        KeywordSource::Tag => extract_tags,
        KeywordSource::Entity => extract_entities,
    }
}

/// Fold `raw` and push it. Blank names are skipped.
fn push(
    out: &mut Vec<KeywordCandidate>,
    raw: &str,
    kind: KeywordKind,
    language_code: &str,
    weight: f64,
) -> Result<(), IndexError> {
    let source = kind.source();
    if language_code.trim().is_empty() {
        return Err(IndexError::extract(
            source,
            format!("name '{raw}' has an empty language code"),
        ));
    }
    if !weight.is_finite() || weight <= 0.0 {
        return Err(IndexError::extract(
            source,
            format!("name '{raw}' has unusable weight {weight}"),
        ));
    }
    if let Some(text) = fold_keyword(raw) {
        out.push(KeywordCandidate {
            text,
            kind,
            language_code: language_code.to_string(),
            weight,
        });
    }
    Ok(())
}

pub fn extract_titles(ctx: &ExtractContext<'_>) -> Result<Vec<KeywordCandidate>, IndexError> {
    let weight = ctx.weights.base(KeywordSource::Title);
    let mut out = Vec::with_capacity(ctx.facts.editions.len());
    for edition in &ctx.facts.editions {
        push(&mut out, &edition.title, KeywordKind::Title, &edition.language_code, weight)?;
    }
    Ok(out)
}

pub fn extract_authors(ctx: &ExtractContext<'_>) -> Result<Vec<KeywordCandidate>, IndexError> {
    let weight = ctx.weights.base(KeywordSource::Author);
    let mut out = Vec::new();
    for edition in &ctx.facts.editions {
        if let Some(author) = &edition.author {
            push(&mut out, author, KeywordKind::Author, &edition.language_code, weight)?;
        }
    }
    Ok(out)
}

/// Canonical name plus every localized name of one taxonomy fact.
fn taxonomy_names(
    out: &mut Vec<KeywordCandidate>,
    fact: &TaxonomyFact,
    kind: KeywordKind,
    original_language: &str,
    weight: f64,
) -> Result<(), IndexError> {
    push(out, &fact.canonical_name, kind, original_language, weight)?;
    for (language_code, name) in &fact.localized_names {
        push(out, name, kind, language_code, weight)?;
    }
    Ok(())
}

pub fn extract_section(ctx: &ExtractContext<'_>) -> Result<Vec<KeywordCandidate>, IndexError> {
    let mut out = Vec::new();
    if let Some(section) = &ctx.facts.section {
        taxonomy_names(
            &mut out,
            section,
            KeywordKind::Section,
            ctx.original_language(),
            ctx.weights.base(KeywordSource::Section),
        )?;
    }
    Ok(out)
}

/// Sub-genres also index their primary genre at the same weight.
pub fn extract_genres(ctx: &ExtractContext<'_>) -> Result<Vec<KeywordCandidate>, IndexError> {
    let weight = ctx.weights.base(KeywordSource::Genre);
    let mut out = Vec::new();
    for genre in &ctx.facts.genres {
        taxonomy_names(&mut out, genre, KeywordKind::Genre, ctx.original_language(), weight)?;
        if let Some(parent) = &genre.parent {
            taxonomy_names(&mut out, parent, KeywordKind::Genre, ctx.original_language(), weight)?;
        }
    }
    Ok(out)
}

pub fn extract_tags(ctx: &ExtractContext<'_>) -> Result<Vec<KeywordCandidate>, IndexError> {
    let weight = ctx.weights.base(KeywordSource::Tag);
    let mut out = Vec::new();
    for tag in &ctx.facts.tags {
        taxonomy_names(&mut out, tag, KeywordKind::Tag, ctx.original_language(), weight)?;
    }
    Ok(out)
}

fn entity_names(
    out: &mut Vec<KeywordCandidate>,
    fact: &EntityFact,
    original_language: &str,
    weight: f64,
) -> Result<(), IndexError> {
    let kind = KeywordKind::for_entity(fact.entity_type);
    push(out, &fact.canonical_name, kind, original_language, weight)?;
    for (language_code, name) in &fact.translated_names {
        push(out, name, kind, language_code, weight)?;
    }
    Ok(())
}

pub fn extract_entities(ctx: &ExtractContext<'_>) -> Result<Vec<KeywordCandidate>, IndexError> {
    let mut out = Vec::new();
    for fact in &ctx.facts.entities {
        let weight = ctx.entity_weights.weight(fact);
        entity_names(&mut out, fact, ctx.original_language(), weight)?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use folio_core::entities::{Book, BookFacts, EntityFact, TaxonomyFact, TitleAuthorFact};
    use folio_core::enums::{BookStatus, EntityKind, KeywordKind, KeywordSource, TaxonomyKind};
    use pretty_assertions::assert_eq;

    use super::*;

    fn localized(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(l, n)| ((*l).to_string(), (*n).to_string()))
            .collect()
    }

    fn taxonomy(kind: TaxonomyKind, slug: &str, name: &str, names: &[(&str, &str)]) -> TaxonomyFact {
        TaxonomyFact {
            kind,
            slug: slug.to_string(),
            canonical_name: name.to_string(),
            localized_names: localized(names),
            category: None,
            parent: None,
        }
    }

    fn facts() -> BookFacts {
        let mut sub = taxonomy(TaxonomyKind::Genre, "xianxia", "Xianxia", &[("zh", "仙侠")]);
        sub.parent = Some(Box::new(taxonomy(
            TaxonomyKind::Genre,
            "fantasy",
            "Fantasy",
            &[("zh", "奇幻")],
        )));
        BookFacts {
            book: Book {
                id: 3,
                slug: "renegade".to_string(),
                original_language: "zh".to_string(),
                status: BookStatus::Completed,
                section_id: None,
            },
            editions: vec![
                TitleAuthorFact {
                    book_id: 3,
                    language_code: "en".to_string(),
                    title: "Renegade  Immortal".to_string(),
                    author: None,
                },
                TitleAuthorFact {
                    book_id: 3,
                    language_code: "zh".to_string(),
                    title: "仙逆".to_string(),
                    author: Some("耳根".to_string()),
                },
            ],
            section: Some(taxonomy(TaxonomyKind::Section, "fiction", "Fiction", &[("en", "Fiction")])),
            genres: vec![sub],
            tags: vec![taxonomy(TaxonomyKind::Tag, "revenge", "   ", &[("en", "Revenge")])],
            entities: vec![EntityFact {
                book_id: 3,
                entity_type: EntityKind::Character,
                canonical_name: "王林".to_string(),
                translated_names: localized(&[("en", "Wang Lin")]),
                occurrence_count: 100,
                total_unit_count: 100,
            }],
        }
    }

    fn run(source: KeywordSource, facts: &BookFacts) -> Result<Vec<KeywordCandidate>, IndexError> {
        let weights = WeightTable::default();
        let entity_weights = EntityWeightCalculator::default();
        let ctx = ExtractContext {
            facts,
            weights: &weights,
            entity_weights: &entity_weights,
        };
        extractor_for(source)(&ctx)
    }

    fn texts(candidates: &[KeywordCandidate]) -> Vec<(&str, &str)> {
        candidates
            .iter()
            .map(|c| (c.text.as_str(), c.language_code.as_str()))
            .collect()
    }

    #[test]
    fn table_covers_every_source_once() {
        let sources: Vec<KeywordSource> = extractors().iter().map(|(s, _)| *s).collect();
        assert_eq!(sources, KeywordSource::ALL.to_vec());
    }

    #[test]
    fn titles_are_folded_per_edition() {
        let got = run(KeywordSource::Title, &facts()).unwrap();
        assert_eq!(texts(&got), vec![("renegade immortal", "en"), ("仙逆", "zh")]);
        assert!(got.iter().all(|c| c.kind == KeywordKind::Title));
        assert!(got.iter().all(|c| (c.weight - 2.0).abs() < f64::EPSILON));
    }

    #[test]
    fn missing_author_is_skipped() {
        let got = run(KeywordSource::Author, &facts()).unwrap();
        assert_eq!(texts(&got), vec![("耳根", "zh")]);
    }

    #[test]
    fn canonical_section_name_uses_original_language() {
        let got = run(KeywordSource::Section, &facts()).unwrap();
        assert_eq!(texts(&got), vec![("fiction", "zh"), ("fiction", "en")]);
    }

    #[test]
    fn sub_genre_also_yields_its_primary_genre() {
        let got = run(KeywordSource::Genre, &facts()).unwrap();
        assert_eq!(
            texts(&got),
            vec![("xianxia", "zh"), ("仙侠", "zh"), ("fantasy", "zh"), ("奇幻", "zh")]
        );
        assert!(got.iter().all(|c| (c.weight - 1.0).abs() < f64::EPSILON));
    }

    #[test]
    fn blank_canonical_tag_is_dropped() {
        let got = run(KeywordSource::Tag, &facts()).unwrap();
        assert_eq!(texts(&got), vec![("revenge", "en")]);
    }

    #[test]
    fn entity_weight_is_dynamic() {
        let got = run(KeywordSource::Entity, &facts()).unwrap();
        assert_eq!(texts(&got), vec![("王林", "zh"), ("wang lin", "en")]);
        assert!(got.iter().all(|c| c.kind == KeywordKind::EntityCharacter));
        assert!(got.iter().all(|c| (c.weight - 1.1).abs() < 1e-9));
    }

    #[test]
    fn empty_language_code_is_an_error() {
        let mut facts = facts();
        facts.editions[0].language_code = " ".to_string();
        let err = run(KeywordSource::Title, &facts).unwrap_err();
        assert!(matches!(
            err,
            IndexError::Extract {
                source_kind: KeywordSource::Title,
                ..
            }
        ));
    }
}
