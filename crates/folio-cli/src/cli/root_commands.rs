use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Top-level commands of the `folio` binary.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Import catalog facts from a JSON file and rebuild the affected books.
    Load(LoadArgs),
    /// Regenerate keyword rows for one book or the whole catalog.
    Rebuild(RebuildArgs),
    /// Search the keyword index.
    Search(SearchArgs),
    /// Keyword index size per language and kind.
    Stats,
}

/// Arguments for `folio load`.
#[derive(Clone, Debug, Args)]
pub struct LoadArgs {
    /// Path to a catalog facts JSON file.
    pub path: PathBuf,

    /// Import facts without rebuilding keyword rows.
    #[arg(long)]
    pub no_rebuild: bool,
}

/// Arguments for `folio rebuild`.
#[derive(Clone, Debug, Args)]
pub struct RebuildArgs {
    /// Book id to rebuild.
    #[arg(required_unless_present = "all", conflicts_with = "all")]
    pub id: Option<i64>,

    /// Rebuild every book in the catalog.
    #[arg(long)]
    pub all: bool,
}

/// Arguments for `folio search`.
#[derive(Clone, Debug, Args)]
pub struct SearchArgs {
    pub query: String,

    /// Language the query is written in.
    #[arg(long = "lang")]
    pub language: String,

    #[arg(long)]
    pub section: Option<String>,

    /// Genre slug; a primary genre also matches its sub-genres.
    #[arg(long)]
    pub genre: Option<String>,

    #[arg(long)]
    pub tag: Option<String>,

    /// ongoing, completed, hiatus or dropped.
    #[arg(long)]
    pub status: Option<String>,

    /// Return ids and scores only, without loading titles.
    #[arg(long)]
    pub ids_only: bool,
}
