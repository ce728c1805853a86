//! `folio load`: import catalog facts from a JSON document.
//!
//! The document lists sections, genres, tags and books. Taxonomy is upserted
//! first (primary genres before sub-genres), then every book with its
//! editions, assignments and entity facts. Editions and entity facts listed
//! for a book replace the ones already stored for it; omitting either list
//! keeps what is stored.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, bail};
use folio_core::entities::{BookId, EntityFact};
use folio_core::enums::{BookStatus, EntityKind};
use folio_db::service::FolioService;
use serde::{Deserialize, Serialize};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::LoadArgs;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogDocument {
    #[serde(default)]
    pub sections: Vec<TaxonomyEntry>,
    #[serde(default)]
    pub genres: Vec<TaxonomyEntry>,
    #[serde(default)]
    pub tags: Vec<TaxonomyEntry>,
    #[serde(default)]
    pub books: Vec<BookEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaxonomyEntry {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub names: BTreeMap<String, String>,
    /// Genres only.
    #[serde(default)]
    pub parent: Option<String>,
    /// Tags only.
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BookEntry {
    pub slug: String,
    pub original_language: String,
    pub status: BookStatus,
    #[serde(default)]
    pub section: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub editions: Option<Vec<EditionEntry>>,
    /// `None` keeps stored entity facts; a list replaces them.
    #[serde(default)]
    pub entities: Option<Vec<EntityEntry>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EditionEntry {
    pub language_code: String,
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntityEntry {
    pub entity_type: EntityKind,
    pub canonical_name: String,
    #[serde(default)]
    pub translated_names: BTreeMap<String, String>,
    pub occurrence_count: u64,
    pub total_unit_count: u64,
}

#[derive(Debug, Default, Serialize)]
struct LoadSummary {
    sections: usize,
    genres: usize,
    tags: usize,
    books: Vec<BookId>,
    keywords_inserted: u64,
    rebuild_failures: Vec<BookId>,
}

/// Read and parse a catalog document.
pub fn read_document(path: &Path) -> anyhow::Result<CatalogDocument> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid catalog document {}", path.display()))
}

async fn import_taxonomy(service: &FolioService, doc: &CatalogDocument) -> anyhow::Result<()> {
    for section in &doc.sections {
        service
            .upsert_section(&section.slug, &section.name, &section.names)
            .await
            .with_context(|| format!("failed to import section '{}'", section.slug))?;
    }

    let (primary, sub): (Vec<&TaxonomyEntry>, Vec<&TaxonomyEntry>) =
        doc.genres.iter().partition(|g| g.parent.is_none());
    for genre in primary.into_iter().chain(sub) {
        service
            .upsert_genre(&genre.slug, &genre.name, &genre.names, genre.parent.as_deref())
            .await
            .with_context(|| format!("failed to import genre '{}'", genre.slug))?;
    }

    for tag in &doc.tags {
        service
            .upsert_tag(&tag.slug, &tag.name, &tag.names, tag.category.as_deref())
            .await
            .with_context(|| format!("failed to import tag '{}'", tag.slug))?;
    }
    Ok(())
}

async fn import_book(service: &FolioService, entry: &BookEntry) -> anyhow::Result<BookId> {
    let book_id = service
        .upsert_book(&entry.slug, &entry.original_language, entry.status)
        .await?;

    if let Some(editions) = &entry.editions {
        for edition in editions {
            service
                .upsert_edition(
                    book_id,
                    &edition.language_code,
                    &edition.title,
                    edition.author.as_deref(),
                )
                .await
                .with_context(|| format!("edition '{}'", edition.language_code))?;
        }
        let keep: Vec<&str> = editions.iter().map(|e| e.language_code.as_str()).collect();
        service.retain_editions(book_id, &keep).await?;
    }

    service
        .assign_section(book_id, entry.section.as_deref())
        .await?;
    let genres: Vec<&str> = entry.genres.iter().map(String::as_str).collect();
    service.set_book_genres(book_id, &genres).await?;
    let tags: Vec<&str> = entry.tags.iter().map(String::as_str).collect();
    service.set_book_tags(book_id, &tags).await?;

    if let Some(entities) = &entry.entities {
        service.clear_entity_facts(book_id).await?;
        for entity in entities {
            service
                .upsert_entity_fact(&EntityFact {
                    book_id,
                    entity_type: entity.entity_type,
                    canonical_name: entity.canonical_name.clone(),
                    translated_names: entity.translated_names.clone(),
                    occurrence_count: entity.occurrence_count,
                    total_unit_count: entity.total_unit_count,
                })
                .await
                .with_context(|| format!("entity '{}'", entity.canonical_name))?;
        }
    }
    Ok(book_id)
}

/// Handle `folio load`.
pub async fn handle(args: &LoadArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let doc = read_document(&args.path)?;
    import_taxonomy(&ctx.service, &doc).await?;

    let mut summary = LoadSummary {
        sections: doc.sections.len(),
        genres: doc.genres.len(),
        tags: doc.tags.len(),
        ..LoadSummary::default()
    };
    for entry in &doc.books {
        let book_id = import_book(&ctx.service, entry)
            .await
            .with_context(|| format!("failed to import book '{}'", entry.slug))?;
        summary.books.push(book_id);
    }
    tracing::info!(
        path = %args.path.display(),
        books = summary.books.len(),
        "catalog facts imported"
    );

    if !args.no_rebuild {
        for &book_id in &summary.books {
            match ctx.builder.rebuild(book_id).await {
                Ok(stats) => summary.keywords_inserted += stats.inserted,
                Err(error) => {
                    tracing::warn!(book_id, %error, "rebuild after load failed");
                    summary.rebuild_failures.push(book_id);
                }
            }
        }
    }

    output(&summary, flags.format)?;
    if !summary.rebuild_failures.is_empty() {
        bail!(
            "{} imported books failed to rebuild; run `folio rebuild` for them",
            summary.rebuild_failures.len()
        );
    }
    Ok(())
}
