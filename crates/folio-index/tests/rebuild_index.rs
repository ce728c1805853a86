//! Index rebuild integration tests
//!
//! - Rows produced for a fully described book
//! - Rebuilding one book never touches another
//! - Rows follow fact changes on the next rebuild

use std::collections::BTreeMap;
use std::sync::Arc;

use pretty_assertions::assert_eq;

use folio_config::FolioConfig;
use folio_core::entities::{BookId, EntityFact};
use folio_core::enums::{BookStatus, EntityKind, KeywordKind};
use folio_db::service::FolioService;
use folio_index::IndexBuilder;

fn names(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(l, n)| ((*l).to_string(), (*n).to_string()))
        .collect()
}

async fn setup() -> (Arc<FolioService>, IndexBuilder) {
    let svc = Arc::new(FolioService::new_local(":memory:").await.unwrap());
    let builder = IndexBuilder::from_config(Arc::clone(&svc), &FolioConfig::default());
    (svc, builder)
}

async fn seed_xianxia(svc: &FolioService) -> BookId {
    svc.upsert_genre("fantasy", "Fantasy", &names(&[("en", "Fantasy")]), None)
        .await
        .unwrap();
    svc.upsert_genre("xianxia", "Xianxia", &names(&[("en", "Xianxia")]), Some("fantasy"))
        .await
        .unwrap();

    let book = svc
        .upsert_book("renegade-immortal", "zh", BookStatus::Completed)
        .await
        .unwrap();
    svc.upsert_edition(book, "zh", "仙逆", Some("耳根")).await.unwrap();
    svc.upsert_edition(book, "en", "Renegade Immortal", Some("Er Gen"))
        .await
        .unwrap();
    svc.set_book_genres(book, &["xianxia"]).await.unwrap();
    svc.upsert_entity_fact(&EntityFact {
        book_id: book,
        entity_type: EntityKind::Character,
        canonical_name: "王林".to_string(),
        translated_names: names(&[("en", "Wang Lin")]),
        occurrence_count: 2,
        total_unit_count: 100,
    })
    .await
    .unwrap();
    book
}

fn rows_in(
    rows: &[folio_core::entities::KeywordEntry],
    language: &str,
) -> Vec<(String, KeywordKind)> {
    rows.iter()
        .filter(|r| r.language_code == language)
        .map(|r| (r.keyword.clone(), r.kind))
        .collect()
}

#[tokio::test]
async fn english_rows_cover_every_source() {
    let (svc, builder) = setup().await;
    let book = seed_xianxia(&svc).await;

    builder.rebuild(book).await.unwrap();
    let rows = svc.keywords_for_book(book).await.unwrap();

    assert_eq!(
        rows_in(&rows, "en"),
        vec![
            ("er gen".to_string(), KeywordKind::Author),
            ("wang lin".to_string(), KeywordKind::EntityCharacter),
            ("fantasy".to_string(), KeywordKind::Genre),
            ("xianxia".to_string(), KeywordKind::Genre),
            ("renegade immortal".to_string(), KeywordKind::Title),
        ]
    );

    let wang_lin = rows.iter().find(|r| r.keyword == "wang lin").unwrap();
    assert!((wang_lin.weight - 0.512).abs() < 1e-9);
}

#[tokio::test]
async fn canonical_names_land_in_the_original_language() {
    let (svc, builder) = setup().await;
    let book = seed_xianxia(&svc).await;

    builder.rebuild(book).await.unwrap();
    let rows = svc.keywords_for_book(book).await.unwrap();
    let zh = rows_in(&rows, "zh");

    assert!(zh.contains(&("仙逆".to_string(), KeywordKind::Title)));
    assert!(zh.contains(&("王林".to_string(), KeywordKind::EntityCharacter)));
    assert!(zh.contains(&("xianxia".to_string(), KeywordKind::Genre)));
    assert!(zh.contains(&("fantasy".to_string(), KeywordKind::Genre)));
}

#[tokio::test]
async fn rebuilding_one_book_leaves_another_alone() {
    let (svc, builder) = setup().await;
    let a = seed_xianxia(&svc).await;
    let b = svc.upsert_book("other", "en", BookStatus::Ongoing).await.unwrap();
    svc.upsert_edition(b, "en", "Other Tale", None).await.unwrap();

    builder.rebuild(a).await.unwrap();
    builder.rebuild(b).await.unwrap();
    let before = svc.keywords_for_book(b).await.unwrap();

    svc.upsert_edition(a, "en", "Renegade", None).await.unwrap();
    builder.rebuild(a).await.unwrap();

    assert_eq!(svc.keywords_for_book(b).await.unwrap(), before);
}

#[tokio::test]
async fn rows_follow_fact_changes() {
    let (svc, builder) = setup().await;
    let book = seed_xianxia(&svc).await;
    builder.rebuild(book).await.unwrap();

    svc.set_book_genres(book, &[]).await.unwrap();
    let stats = builder.rebuild(book).await.unwrap();

    assert_eq!(stats.per_kind.get(&KeywordKind::Genre), None);
    let rows = svc.keywords_for_book(book).await.unwrap();
    assert!(rows.iter().all(|r| r.kind != KeywordKind::Genre));
}

#[tokio::test]
async fn frequent_entity_is_indexed_at_the_cap() {
    let (svc, builder) = setup().await;
    let book = svc.upsert_book("li-ming", "zh", BookStatus::Ongoing).await.unwrap();
    svc.upsert_entity_fact(&EntityFact {
        book_id: book,
        entity_type: EntityKind::Character,
        canonical_name: "李明".to_string(),
        translated_names: names(&[("en", "Li Ming")]),
        occurrence_count: 450,
        total_unit_count: 100,
    })
    .await
    .unwrap();

    builder.rebuild(book).await.unwrap();
    let rows = svc.keywords_for_book(book).await.unwrap();
    let li_ming = rows.iter().find(|r| r.keyword == "li ming").unwrap();
    assert_eq!(li_ming.kind, KeywordKind::EntityCharacter);
    assert!((li_ming.weight - 1.1).abs() < 1e-9);
}
