use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use futures::future::try_join_all;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::remote::{RemoteError, RemoteQuery};

type Names = Arc<HashMap<String, String>>;

/// Id → display name lookup for one category table.
///
/// With a lookup table configured, the whole table is loaded the first time a
/// name is needed (and again whenever the cache is found empty). Without one,
/// each unknown id is fetched as a single record and remembered. Only one load
/// runs at a time; callers arriving during a load wait for it and then read
/// the filled cache.
pub struct CategoryCache {
    source: Arc<dyn RemoteQuery>,
    table_id: Option<String>,
    title_property: &'static str,
    names: RwLock<Names>,
    loading: Mutex<()>,
}

impl CategoryCache {
    pub fn new(
        source: Arc<dyn RemoteQuery>,
        table_id: Option<String>,
        title_property: &'static str,
    ) -> Self {
        Self {
            source,
            table_id,
            title_property,
            names: RwLock::new(Arc::new(HashMap::new())),
            loading: Mutex::new(()),
        }
    }

    fn snapshot(&self) -> Names {
        self.names
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    /// Display names for `ids`, loading whatever the cache is missing with a
    /// single remote round. Unknown ids map to an empty string.
    pub async fn names(&self, ids: &[&str]) -> Result<HashMap<String, String>, RemoteError> {
        let known = match self.table_id.as_deref() {
            Some(table_id) => self.ensure_populated(table_id).await?,
            None => self.retrieve_missing(ids).await?,
        };

        Ok(ids
            .iter()
            .map(|id| (id.to_string(), known.get(*id).cloned().unwrap_or_default()))
            .collect())
    }

    async fn ensure_populated(&self, table_id: &str) -> Result<Names, RemoteError> {
        let current = self.snapshot();
        if !current.is_empty() {
            return Ok(current);
        }

        let _guard = self.loading.lock().await;

        // Another caller may have finished loading while we waited
        let current = self.snapshot();
        if !current.is_empty() {
            return Ok(current);
        }

        info!(
            table_id,
            property = self.title_property,
            "Category cache is empty, loading"
        );
        let pages = self.source.query_all(table_id, None).await?;

        let mut names = HashMap::with_capacity(pages.len());
        for page in &pages {
            match page.text(self.title_property) {
                Ok(Some(name)) => {
                    names.insert(page.id.clone(), name);
                }
                Ok(None) => {}
                Err(e) => warn!(record_id = %page.id, error = %e, "Skipping category row"),
            }
        }
        info!(table_id, entries = names.len(), "Category cache loaded");

        let names = Arc::new(names);
        *self.names.write().unwrap_or_else(|e| e.into_inner()) = names.clone();
        Ok(names)
    }

    async fn retrieve_missing(&self, ids: &[&str]) -> Result<Names, RemoteError> {
        let is_missing = |names: &Names| ids.iter().any(|id| !names.contains_key(*id));

        let current = self.snapshot();
        if !is_missing(&current) {
            return Ok(current);
        }

        let _guard = self.loading.lock().await;

        let current = self.snapshot();
        let mut missing: Vec<&str> = ids
            .iter()
            .copied()
            .filter(|id| !current.contains_key(*id))
            .collect();
        missing.sort_unstable();
        missing.dedup();
        if missing.is_empty() {
            return Ok(current);
        }

        let pages = try_join_all(missing.iter().map(|id| self.source.retrieve_page(id))).await?;

        let mut guard = self.names.write().unwrap_or_else(|e| e.into_inner());
        let names = Arc::make_mut(&mut *guard);
        for (id, page) in missing.into_iter().zip(pages) {
            let name = page
                .text(self.title_property)
                .unwrap_or_else(|e| {
                    warn!(record_id = id, error = %e, "Category record has no usable title");
                    None
                })
                .unwrap_or_default();
            names.insert(id.to_string(), name);
        }
        Ok((*guard).clone())
    }
}
