use anyhow::Context;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

/// Handle `folio stats`.
pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let stats = ctx
        .service
        .keyword_stats()
        .await
        .context("failed to read keyword statistics")?;
    output(&stats, flags.format)
}
