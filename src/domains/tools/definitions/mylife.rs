//! MyLife (Human Remembrance Project) public memories.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{instrument, warn};

use crate::core::config::Config;
use crate::core::fetch::{FetchError, HttpClient};
use crate::core::params::join_path;
use crate::domains::tools::{ToolDefinition, ToolRegistry};

use super::common::{NoParams, json_result, non_blank};

/// Most memories returned by one listing.
pub const MAX_MEMORIES: usize = 10;

#[derive(Debug, Clone)]
pub struct MyLifeClient {
    base_url: String,
    http: HttpClient,
}

impl MyLifeClient {
    pub fn new(base_url: impl Into<String>, token: Option<&str>) -> Self {
        let http = HttpClient::default().accept_json();
        let http = match token {
            Some(token) => http.with_header(AUTHORIZATION, &format!("Bearer {token}")),
            None => {
                warn!("MCP_MYLIFE_API_TOKEN not set - MyLife requests are unauthenticated");
                http
            }
        };
        Self {
            base_url: base_url.into(),
            http,
        }
    }

    /// GET below the base URL. A body with `success: false` is a failure.
    async fn get(&self, path: &[&str]) -> Result<Value, FetchError> {
        let data = self.http.get_json(&join_path(&self.base_url, path)?).await?;
        if data.get("success") == Some(&Value::Bool(false)) {
            return Err(FetchError::DecodeFailed("upstream reported success=false".into()));
        }
        Ok(data)
    }

    /// Up to [`MAX_MEMORIES`] shared memories, or a one-line status list.
    pub async fn shared_memories(&self) -> Value {
        let data = match self.get(&["memories"]).await {
            Ok(data) => data,
            Err(e) => {
                warn!(error = %e, "Unable to list MyLife memories");
                return json!(["System Error"]);
            }
        };
        match data.get("memories").and_then(Value::as_array) {
            Some(memories) if !memories.is_empty() => {
                Value::Array(memories.iter().take(MAX_MEMORIES).cloned().collect())
            }
            _ => json!(["No memories to share"]),
        }
    }

    /// One memory by id, or a random one.
    pub async fn shared_memory(&self, id: Option<&str>) -> Value {
        let mut path = vec!["memories", "memory"];
        path.extend(id);
        match self.get(&path).await {
            Ok(data) if !data.is_null() => data,
            Ok(_) => json!({"error": "Memory not found or system error"}),
            Err(e) => {
                warn!(error = %e, "Unable to fetch MyLife memory");
                json!({"error": "Memory not found or system error"})
            }
        }
    }
}

/// `get_shared_memories`
pub struct SharedMemoriesTool {
    client: Arc<MyLifeClient>,
}

#[async_trait]
impl ToolDefinition for SharedMemoriesTool {
    const NAME: &'static str = "get_shared_memories";
    const DESCRIPTION: &'static str = "Gets a list (max 10) of MyLife public memories as { id, title } objects.";
    type Params = NoParams;

    #[instrument(skip_all, name = "get_shared_memories")]
    async fn execute(&self, _params: NoParams) -> CallToolResult {
        json_result(&self.client.shared_memories().await)
    }
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct SharedMemoryParams {
    #[schemars(description = "Memory id; omit for a random memory")]
    pub id: Option<String>,
}

/// `get_shared_memory`
pub struct SharedMemoryTool {
    client: Arc<MyLifeClient>,
}

#[async_trait]
impl ToolDefinition for SharedMemoryTool {
    const NAME: &'static str = "get_shared_memory";
    const DESCRIPTION: &'static str = "Gets a MyLife public memory by id, or a random one. A memory has a title, a list of scenes and a conclusion; relay the scenes one by one and end with the conclusion.";
    type Params = SharedMemoryParams;

    #[instrument(skip_all, name = "get_shared_memory")]
    async fn execute(&self, params: SharedMemoryParams) -> CallToolResult {
        json_result(&self.client.shared_memory(non_blank(&params.id)).await)
    }
}

/// Register the MyLife tools.
pub fn register(registry: &mut ToolRegistry, config: &Config) {
    let client = Arc::new(MyLifeClient::new(
        config.upstreams.mylife.clone(),
        config.credentials.mylife_api_token.as_deref(),
    ));
    registry.register(SharedMemoriesTool {
        client: client.clone(),
    });
    registry.register(SharedMemoryTool { client });
}
