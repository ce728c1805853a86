use anyhow::{Context, bail};
use folio_index::RebuildStats;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::RebuildArgs;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct RebuildRow<'a> {
    book_id: i64,
    book_missing: bool,
    removed: u64,
    inserted: u64,
    duplicates_collapsed: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

impl<'a> RebuildRow<'a> {
    const fn rebuilt(stats: &RebuildStats) -> Self {
        Self {
            book_id: stats.book_id,
            book_missing: stats.book_missing,
            removed: stats.removed,
            inserted: stats.inserted,
            duplicates_collapsed: stats.duplicates_collapsed,
            error: None,
        }
    }

    const fn failed(book_id: i64, error: &'a str) -> Self {
        Self {
            book_id,
            book_missing: false,
            removed: 0,
            inserted: 0,
            duplicates_collapsed: 0,
            error: Some(error),
        }
    }
}

/// Handle `folio rebuild`.
pub async fn handle(args: &RebuildArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    if let Some(book_id) = args.id.filter(|_| !args.all) {
        let stats = ctx
            .builder
            .rebuild(book_id)
            .await
            .with_context(|| format!("failed to rebuild book {book_id}"))?;
        return output(&stats, flags.format);
    }

    let report = ctx
        .builder
        .rebuild_all()
        .await
        .context("failed to list catalog books")?;

    let mut rows: Vec<RebuildRow<'_>> = report.rebuilt.iter().map(RebuildRow::rebuilt).collect();
    rows.extend(
        report
            .failed
            .iter()
            .map(|f| RebuildRow::failed(f.book_id, &f.error)),
    );
    output(&rows, flags.format)?;

    if !report.is_clean() {
        bail!(
            "{} of {} books failed to rebuild",
            report.failed.len(),
            report.failed.len() + report.rebuilt.len()
        );
    }
    Ok(())
}
