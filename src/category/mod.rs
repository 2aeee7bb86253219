mod cache;

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

pub use cache::CategoryCache;

use crate::config::{Table, Tables};
use crate::remote::{RemoteError, RemoteQuery};
use crate::transaction::models::CategoryValue;

/// Lookup tables and the title property holding each row's display name.
const LOOKUP_TABLES: [(Table, &str); 5] = [
    (Table::ExpenseCategories, "Category"),
    (Table::ExpenseSubCategories, "Sub Category"),
    (Table::IncomeCategories, "Category"),
    (Table::IncomeSubCategories, "Sub Category"),
    (Table::InvestmentAccounts, "Investment Account"),
];

/// One [`CategoryCache`] per lookup table, shared by all requests.
pub struct CategoryCatalog {
    caches: Vec<(Table, CategoryCache)>,
}

impl CategoryCatalog {
    pub fn new(source: Arc<dyn RemoteQuery>, tables: &Tables) -> Self {
        let caches = LOOKUP_TABLES
            .into_iter()
            .map(|(table, title_property)| {
                let cache = CategoryCache::new(
                    source.clone(),
                    tables.get(table).map(str::to_string),
                    title_property,
                );
                (table, cache)
            })
            .collect();
        Self { caches }
    }

    pub fn cache(&self, table: Table) -> Option<&CategoryCache> {
        self.caches
            .iter()
            .find(|(t, _)| *t == table)
            .map(|(_, cache)| cache)
    }

    /// Display names for the ids referenced from records, keyed by id.
    pub async fn names(
        &self,
        table: Table,
        ids: &[&str],
    ) -> Result<HashMap<String, String>, RemoteError> {
        match self.cache(table) {
            Some(cache) if !ids.is_empty() => cache.names(ids).await,
            _ => Ok(HashMap::new()),
        }
    }
}

/// Distinct ids among `values`; names stored inline need no lookup.
pub fn referenced_ids<'a>(values: impl Iterator<Item = &'a CategoryValue>) -> Vec<&'a str> {
    let ids: BTreeSet<&str> = values
        .filter_map(|value| match value {
            CategoryValue::Reference(id) => Some(id.as_str()),
            CategoryValue::Name(_) => None,
        })
        .collect();
    ids.into_iter().collect()
}
