use anyhow::Context;
use folio_core::entities::{BookCard, BookId};
use folio_search::{SearchFilters, SearchRequest, SearchResult};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SearchArgs;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct SearchHit {
    id: BookId,
    score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<String>,
}

#[derive(Debug, Serialize)]
struct SearchView {
    query: String,
    language: String,
    tokens: Vec<String>,
    hits: Vec<SearchHit>,
    matched_keywords: Vec<String>,
    total_results: u32,
    candidates_truncated: bool,
    elapsed_ms: u128,
}

/// Pair ranked ids with their cards. Cards come back in rank order but a
/// book deleted between search and load has none.
fn hits(result: &SearchResult, cards: Option<Vec<BookCard>>) -> Vec<SearchHit> {
    let mut cards = cards.unwrap_or_default().into_iter().peekable();
    result
        .hits()
        .into_iter()
        .map(|hit| {
            let card = cards.next_if(|c| c.id == hit.book_id);
            SearchHit {
                id: hit.book_id,
                score: hit.score,
                slug: card.as_ref().map(|c| c.slug.clone()),
                title: card.as_ref().map(|c| c.title.clone()),
                author: card.as_ref().and_then(|c| c.author.clone()),
                status: card.map(|c| c.status.to_string()),
            }
        })
        .collect()
}

/// Handle `folio search`.
pub async fn handle(args: &SearchArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let request = SearchRequest {
        query: args.query.clone(),
        language_code: args.language.clone(),
        filters: SearchFilters {
            section: args.section.clone(),
            genre: args.genre.clone(),
            tag: args.tag.clone(),
            status: args.status.clone(),
        },
        limit: flags.limit,
    };

    let result = ctx.engine.search(&request).await.context("search failed")?;
    let cards = if args.ids_only {
        None
    } else {
        Some(
            ctx.engine
                .materialize(&result, &args.language)
                .await
                .context("failed to load search hits")?,
        )
    };

    let view = SearchView {
        query: args.query.clone(),
        language: args.language.clone(),
        hits: hits(&result, cards),
        tokens: result.tokens,
        matched_keywords: result.matched_keywords,
        total_results: result.total_results,
        candidates_truncated: result.candidates_truncated,
        elapsed_ms: result.elapsed.as_millis(),
    };
    output(&view, flags.format)
}
