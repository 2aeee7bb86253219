use std::sync::Arc;

use crate::category::CategoryCatalog;
use crate::config::AppConfig;
use crate::remote::{Fetcher, RemoteQuery};

/// Shared application state handed to every handler.
pub struct AppState {
    pub config: AppConfig,
    pub source: Arc<dyn RemoteQuery>,
    pub categories: CategoryCatalog,
}

impl AppState {
    pub fn new(config: AppConfig, source: Arc<dyn RemoteQuery>) -> Self {
        let categories = CategoryCatalog::new(source.clone(), &config.tables);
        Self {
            config,
            source,
            categories,
        }
    }

    pub fn fetcher(&self) -> Fetcher<'_> {
        Fetcher::new(self.source.as_ref(), self.config.source_error_policy)
    }
}
