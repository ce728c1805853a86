use std::sync::Arc;

use anyhow::Context;
use folio_config::FolioConfig;
use folio_db::service::FolioService;
use folio_index::IndexBuilder;
use folio_search::SearchEngine;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: Arc<FolioService>,
    pub builder: IndexBuilder,
    pub engine: SearchEngine,
}

impl AppContext {
    pub async fn init(config: FolioConfig) -> anyhow::Result<Self> {
        if config.database.is_in_memory() {
            tracing::warn!("database.path is :memory:; nothing will persist after this command");
        }

        let service = FolioService::new_local(&config.database.path)
            .await
            .with_context(|| format!("failed to open database '{}'", config.database.path))?;
        let service = Arc::new(service);

        let builder = IndexBuilder::from_config(Arc::clone(&service), &config);
        let engine = SearchEngine::new(Arc::clone(&service), &config.search);

        Ok(Self {
            service,
            builder,
            engine,
        })
    }
}
