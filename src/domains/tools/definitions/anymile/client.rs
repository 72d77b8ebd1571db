//! Client for the AnyMile public drone-logistics API.

use std::time::Duration;

use reqwest::header::USER_AGENT;
use serde_json::Value;

use crate::core::fetch::{FetchError, HttpClient};
use crate::core::params::{QueryParams, join_path};

pub const AGENT: &str = "anymile-mcp-nanda/1.0";
pub const TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct AnymileClient {
    base_url: String,
    http: HttpClient,
}

impl AnymileClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: HttpClient::new(TIMEOUT)
                .with_header(USER_AGENT, AGENT)
                .accept_json(),
        }
    }

    pub async fn get(&self, path: &str, params: QueryParams) -> Result<Value, FetchError> {
        let url = params.url_for(&join_path(&self.base_url, &[path])?)?;
        non_empty(self.http.get_json(&url).await?)
    }

    pub async fn post(&self, path: &str, body: &Value) -> Result<Value, FetchError> {
        let url = join_path(&self.base_url, &[path])?;
        self.http.post_json(&url, body).await
    }
}

/// Empty collections count as "nothing to report".
fn non_empty(value: Value) -> Result<Value, FetchError> {
    let empty = match &value {
        Value::Null => true,
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    };
    if empty {
        Err(FetchError::DecodeFailed("empty response".to_string()))
    } else {
        Ok(value)
    }
}
