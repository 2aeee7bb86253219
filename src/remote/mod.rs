pub mod client;
mod fetch;
pub mod filter;
pub mod models;

use async_trait::async_trait;
use std::fmt;

pub use client::NotionClient;
pub use fetch::{Fetcher, SourcePages};
pub use filter::Filter;
pub use models::{Icon, Page, QueryResponse};

/// Upper bound on records requested per remote round-trip.
pub const PAGE_SIZE: u32 = 100;

#[derive(Debug)]
pub enum RemoteError {
    MissingApiKey,
    Transport(String),
    Status { status: u16, body: String },
    Decode(String),
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteError::MissingApiKey => write!(f, "Notion API key is not configured"),
            RemoteError::Transport(msg) => write!(f, "transport error: {msg}"),
            RemoteError::Status { status, body } => {
                write!(f, "remote returned status {status}: {body}")
            }
            RemoteError::Decode(msg) => write!(f, "failed to decode remote response: {msg}"),
        }
    }
}

impl std::error::Error for RemoteError {}

/// A remote store of tables that can be queried page by page.
#[async_trait]
pub trait RemoteQuery: Send + Sync {
    /// Fetch one page of records from `database_id`.
    async fn query_page(
        &self,
        database_id: &str,
        filter: Option<&Filter>,
        start_cursor: Option<&str>,
    ) -> Result<QueryResponse, RemoteError>;

    /// Fetch a single record by id.
    async fn retrieve_page(&self, page_id: &str) -> Result<Page, RemoteError>;

    /// Fetch every matching record, following `next_cursor` until exhausted.
    async fn query_all(
        &self,
        database_id: &str,
        filter: Option<&Filter>,
    ) -> Result<Vec<Page>, RemoteError> {
        let mut pages = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let response = self
                .query_page(database_id, filter, cursor.as_deref())
                .await?;
            pages.extend(response.results);

            match response.next_cursor {
                Some(next) if response.has_more => cursor = Some(next),
                _ => break,
            }
        }

        Ok(pages)
    }
}
