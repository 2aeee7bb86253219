use async_trait::async_trait;
use secrecy::{ExposeSecret, Secret};
use serde_json::{json, Value};
use tracing::debug;

use super::filter::Filter;
use super::models::{Page, QueryResponse};
use super::{RemoteError, RemoteQuery, PAGE_SIZE};

/// Notion API version sent with every request
pub const NOTION_VERSION: &str = "2022-06-28";

pub const DEFAULT_BASE_URL: &str = "https://api.notion.com/v1";

/// HTTP client for the Notion databases/pages API.
pub struct NotionClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<Secret<String>>,
}

impl NotionClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<Secret<String>>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn api_key(&self) -> Result<&str, RemoteError> {
        self.api_key
            .as_ref()
            .map(|key| key.expose_secret().as_str())
            .ok_or(RemoteError::MissingApiKey)
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, RemoteError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()))
    }
}

#[async_trait]
impl RemoteQuery for NotionClient {
    async fn query_page(
        &self,
        database_id: &str,
        filter: Option<&Filter>,
        start_cursor: Option<&str>,
    ) -> Result<QueryResponse, RemoteError> {
        let url = format!("{}/databases/{}/query", self.base_url, database_id);

        let mut body = json!({ "page_size": PAGE_SIZE });
        if let Some(filter) = filter {
            body["filter"] = filter.to_json();
        }
        if let Some(cursor) = start_cursor {
            body["start_cursor"] = Value::String(cursor.to_string());
        }

        debug!(database_id, cursor = ?start_cursor, "Querying remote database");

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.api_key()?)
            .header("Notion-Version", NOTION_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))?;

        Self::decode(response).await
    }

    async fn retrieve_page(&self, page_id: &str) -> Result<Page, RemoteError> {
        let url = format!("{}/pages/{}", self.base_url, page_id);

        debug!(page_id, "Retrieving remote page");

        let response = self
            .http
            .get(&url)
            .bearer_auth(self.api_key()?)
            .header("Notion-Version", NOTION_VERSION)
            .send()
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))?;

        Self::decode(response).await
    }
}
