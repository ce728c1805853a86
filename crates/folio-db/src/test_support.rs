//! Shared fixtures for folio-db unit tests.

pub(crate) mod helpers {
    use std::collections::BTreeMap;

    use folio_core::entities::{BookId, EntityFact, KeywordEntry};
    use folio_core::enums::{BookStatus, EntityKind, KeywordKind};

    use crate::service::FolioService;

    pub async fn test_service() -> FolioService {
        FolioService::new_local(":memory:").await.unwrap()
    }

    pub fn names(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(lang, name)| ((*lang).to_string(), (*name).to_string()))
            .collect()
    }

    pub fn entry(
        book_id: BookId,
        keyword: &str,
        kind: KeywordKind,
        language_code: &str,
        weight: f64,
    ) -> KeywordEntry {
        KeywordEntry {
            book_id,
            keyword: keyword.to_string(),
            kind,
            language_code: language_code.to_string(),
            weight,
        }
    }

    /// A zh-original ongoing book with an en edition, section `fiction`,
    /// sub-genre `eastern-fantasy` (parent `fantasy`), tag `revenge` and one
    /// character.
    pub async fn seed_book(svc: &FolioService) -> BookId {
        svc.upsert_section("fiction", "Fiction", &names(&[("en", "Fiction"), ("zh", "小说")]))
            .await
            .unwrap();
        svc.upsert_genre("fantasy", "Fantasy", &names(&[("en", "Fantasy"), ("zh", "奇幻")]), None)
            .await
            .unwrap();
        svc.upsert_genre(
            "eastern-fantasy",
            "Eastern Fantasy",
            &names(&[("en", "Eastern Fantasy"), ("zh", "东方玄幻")]),
            Some("fantasy"),
        )
        .await
        .unwrap();
        svc.upsert_tag("revenge", "Revenge", &names(&[("en", "Revenge")]), Some("plot"))
            .await
            .unwrap();
        svc.upsert_tag("harem", "Harem", &BTreeMap::new(), Some("romance"))
            .await
            .unwrap();

        let book = svc
            .upsert_book("lost-kingdom", "zh", BookStatus::Ongoing)
            .await
            .unwrap();
        svc.upsert_edition(book, "zh", "失落王国", Some("青山"))
            .await
            .unwrap();
        svc.upsert_edition(book, "en", "The Lost Kingdom", Some("Qing Shan"))
            .await
            .unwrap();
        svc.assign_section(book, Some("fiction")).await.unwrap();
        svc.set_book_genres(book, &["eastern-fantasy"]).await.unwrap();
        svc.set_book_tags(book, &["revenge"]).await.unwrap();
        svc.upsert_entity_fact(&EntityFact {
            book_id: book,
            entity_type: EntityKind::Character,
            canonical_name: "Lin Feng".to_string(),
            translated_names: names(&[("zh", "林风")]),
            occurrence_count: 40,
            total_unit_count: 50,
        })
        .await
        .unwrap();
        book
    }
}
