//! Traction (ACA-Py multitenant) API access.
//!
//! Every call first exchanges the tenant id and API key for a bearer
//! token, then issues the request. Upstream failures are reported as JSON
//! objects rather than errors so tools can relay them verbatim.

use std::time::Duration;

use reqwest::Method;
use reqwest::header::AUTHORIZATION;
use serde_json::{Value, json};
use tracing::{error, info};

use crate::core::config::Config;
use crate::core::fetch::HttpClient;
use crate::core::params::QueryParams;

pub const TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct TractionClient {
    base_url: Option<String>,
    tenant_id: Option<String>,
    api_key: Option<String>,
    invitation_url: Option<String>,
    http: HttpClient,
}

impl TractionClient {
    pub fn new(
        base_url: Option<String>,
        tenant_id: Option<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            base_url,
            tenant_id,
            api_key,
            invitation_url: None,
            http: HttpClient::new(TIMEOUT),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.upstreams.traction.clone(),
            config.credentials.traction_tenant_id.clone(),
            config.credentials.traction_api_key.clone(),
        )
        .with_invitation_url(config.upstreams.traction_invitation.clone())
    }

    pub fn with_invitation_url(mut self, url: Option<String>) -> Self {
        self.invitation_url = url;
        self
    }

    /// Public endpoint invitations point at. Falls back to the API base.
    pub fn invitation_base(&self) -> Option<&str> {
        self.invitation_url
            .as_deref()
            .or(self.base_url.as_deref())
    }

    fn url(&self, path: &str, query: &QueryParams) -> Result<String, Value> {
        let base = self
            .base_url
            .as_deref()
            .ok_or_else(|| json!({"error": "MCP_TRACTION_URL is not configured"}))?;
        query
            .url_for(&format!("{}{}", base.trim_end_matches('/'), path))
            .map_err(|e| json!({"error": e.to_string()}))
    }

    async fn raw_request(
        &self,
        method: Method,
        path: &str,
        query: &QueryParams,
        body: Option<&Value>,
        token: Option<&str>,
    ) -> Value {
        let url = match self.url(path, query) {
            Ok(url) => url,
            Err(e) => return e,
        };
        info!("Making {} request to {}", method, url);

        let headers: Vec<_> = token
            .map(|t| (AUTHORIZATION, format!("Bearer {t}")))
            .into_iter()
            .collect();
        match self.http.request_text(method, &url, body, &headers).await {
            Ok((200 | 201, text)) => serde_json::from_str(&text)
                .unwrap_or_else(|e| json!({"error": format!("invalid JSON response: {e}")})),
            Ok((status, text)) => {
                error!("Error response ({}): {}", status, text);
                json!({"error": text, "status": status})
            }
            Err(e) => {
                error!(error = %e, "Traction request failed");
                json!({"error": e.to_string()})
            }
        }
    }

    /// Exchange the tenant credentials for a bearer token.
    pub async fn token(&self) -> Result<String, Value> {
        if self.base_url.is_none() {
            return Err(json!({"error": "MCP_TRACTION_URL is not configured"}));
        }
        let (Some(tenant), Some(key)) = (self.tenant_id.as_deref(), self.api_key.as_deref()) else {
            error!("Traction tenant id or API key not set");
            return Err(json!({"error": "TENANT_ID or API_KEY is missing"}));
        };

        let path = format!("/multitenancy/tenant/{tenant}/token");
        let result = self
            .raw_request(
                Method::POST,
                &path,
                &QueryParams::new(),
                Some(&json!({"api_key": key})),
                None,
            )
            .await;

        match result.get("token").and_then(Value::as_str) {
            Some(token) if !token.is_empty() => {
                info!("Successfully retrieved token.");
                Ok(token.to_string())
            }
            _ => {
                error!("Failed to retrieve token: {}", result);
                Err(json!({"error": "Unable to retrieve token"}))
            }
        }
    }

    /// Authenticated request. Token failures are returned as the result.
    pub async fn call(
        &self,
        method: Method,
        path: &str,
        query: QueryParams,
        body: Option<&Value>,
    ) -> Value {
        match self.token().await {
            Ok(token) => {
                self.raw_request(method, path, &query, body, Some(&token))
                    .await
            }
            Err(e) => e,
        }
    }

    pub async fn get(&self, path: &str, query: QueryParams) -> Value {
        self.call(Method::GET, path, query, None).await
    }

    pub async fn post(&self, path: &str, query: QueryParams, body: &Value) -> Value {
        self.call(Method::POST, path, query, Some(body)).await
    }
}
