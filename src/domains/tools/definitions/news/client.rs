//! Client for thenewsapi.com.

use std::time::Duration;

use rmcp::model::CallToolResult;
use serde_json::Value;
use tracing::debug;

use crate::core::config::Config;
use crate::core::fetch::{FetchError, HttpClient};
use crate::core::format::format_value;
use crate::core::params::{QueryParams, join_path};

use super::super::common::{text_result, unavailable};

/// Failure text for every news tool.
pub const UNAVAILABLE: &str = "Unable to fetch news.";

/// Shared news API access: base URL, optional token, fixed headers.
#[derive(Debug, Clone)]
pub struct NewsClient {
    base_url: String,
    api_key: Option<String>,
    http: HttpClient,
}

impl NewsClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key,
            http: HttpClient::default().accept_json(),
        }
    }

    /// Replace the per-call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http = HttpClient::new(timeout).accept_json();
        self
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.upstreams.news.clone(),
            config.credentials.news_api_key.clone(),
        )
    }

    /// URL for `path` with the given filters and the API token appended last.
    pub fn url(&self, path: &[&str], params: QueryParams) -> Result<String, FetchError> {
        let params = match &self.api_key {
            Some(key) => params.raw("api_token", key),
            None => params,
        };
        params.url_for(&join_path(&self.base_url, path)?)
    }

    pub async fn fetch(&self, path: &[&str], params: QueryParams) -> Result<Value, FetchError> {
        let url = self.url(path, params)?;
        debug!(path = ?path, "Requesting news");
        self.http.get_json(&url).await
    }

    /// Fetch and render as text, or the fixed failure text. A body with no
    /// data counts as a failure.
    pub async fn fetch_formatted(&self, path: &[&str], params: QueryParams) -> CallToolResult {
        let result = self.fetch(path, params).await.and_then(|data| {
            if is_empty(&data) {
                Err(FetchError::DecodeFailed("empty response".to_string()))
            } else {
                Ok(data)
            }
        });
        match result {
            Ok(data) => text_result(format_value(&data)),
            Err(e) => unavailable(UNAVAILABLE, &e),
        }
    }
}

fn is_empty(data: &Value) -> bool {
    match data {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}
