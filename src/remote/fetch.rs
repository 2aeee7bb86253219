use tracing::{info, warn};

use super::filter::Filter;
use super::models::Page;
use super::{RemoteError, RemoteQuery};
use crate::config::SourceErrorPolicy;
use crate::errors::AppError;

/// Records fetched from one source, with a warning when the source was skipped.
#[derive(Debug, Default)]
pub struct SourcePages {
    pub pages: Vec<Page>,
    pub warning: Option<String>,
}

impl SourcePages {
    fn skipped(warning: String) -> Self {
        Self {
            pages: Vec::new(),
            warning: Some(warning),
        }
    }
}

/// Fetches whole tables and applies the configured source error policy.
pub struct Fetcher<'a> {
    source: &'a dyn RemoteQuery,
    policy: SourceErrorPolicy,
}

impl<'a> Fetcher<'a> {
    pub fn new(source: &'a dyn RemoteQuery, policy: SourceErrorPolicy) -> Self {
        Self { source, policy }
    }

    /// Fetch every record of `table` matching `filter`.
    ///
    /// An unconfigured table yields no records. Remote failures either degrade
    /// to no records plus a warning, or fail the request, depending on policy.
    /// A missing API key always fails the request.
    pub async fn fetch(
        &self,
        label: &str,
        table: Option<&str>,
        filter: Option<&Filter>,
    ) -> Result<SourcePages, AppError> {
        let Some(database_id) = table.map(str::trim).filter(|id| !id.is_empty()) else {
            warn!(source = label, "Source table is not configured, skipping");
            return Ok(SourcePages::skipped(format!(
                "{label} source is not configured"
            )));
        };

        match self.source.query_all(database_id, filter).await {
            Ok(pages) => {
                info!(source = label, records = pages.len(), "Fetched remote records");
                Ok(SourcePages {
                    pages,
                    warning: None,
                })
            }
            Err(RemoteError::MissingApiKey) => Err(RemoteError::MissingApiKey.into()),
            Err(e) => match self.policy {
                SourceErrorPolicy::Degrade => {
                    warn!(source = label, database_id, error = %e, "Remote fetch failed, continuing without it");
                    Ok(SourcePages::skipped(format!(
                        "{label} could not be loaded"
                    )))
                }
                SourceErrorPolicy::Propagate => Err(AppError::RemoteFetchFailed(format!(
                    "Failed to fetch {label}: {e}"
                ))),
            },
        }
    }
}
