//! Article lookups keyed by UUID.

use std::sync::Arc;

use async_trait::async_trait;
use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::core::params::QueryParams;
use crate::domains::tools::ToolDefinition;

use super::client::NewsClient;

/// Filters for the similar-stories endpoint. `uuid` goes in the path.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct SimilarNewsParams {
    #[schemars(description = "The unique identifier of the article")]
    #[serde(skip_serializing)]
    pub uuid: String,
    #[schemars(
        description = "Categories to include [general, science, sports, business, health, entertainment, tech, politics, food, travel]"
    )]
    pub categories: Option<String>,
    #[schemars(description = "Comma separated list of languages to include, default is all")]
    pub language: Option<String>,
    #[schemars(description = "Comma separated list of categories to exclude")]
    pub exclude_categories: Option<String>,
    #[schemars(description = "Comma separated list of source ids to include")]
    pub source_ids: Option<String>,
    #[schemars(description = "Comma separated list of source ids to exclude")]
    pub exclude_source_ids: Option<String>,
    #[schemars(description = "Only articles published before this date")]
    pub published_before: Option<String>,
    #[schemars(description = "Only articles published after this date")]
    pub published_after: Option<String>,
    #[schemars(description = "Only articles published on this date")]
    pub published_on: Option<String>,
    #[schemars(description = "Number of articles to return")]
    pub limit: Option<String>,
    #[schemars(description = "Page of the result set")]
    pub page: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ArticleParams {
    #[schemars(description = "The unique identifier of the article")]
    pub uuid: String,
}

/// `get_similar_news`
pub struct SimilarNewsTool {
    client: Arc<NewsClient>,
}

impl SimilarNewsTool {
    pub fn new(client: Arc<NewsClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolDefinition for SimilarNewsTool {
    const NAME: &'static str = "get_similar_news";
    const DESCRIPTION: &'static str = "Find stories similar to a specific article, identified by its UUID.";
    type Params = SimilarNewsParams;

    #[instrument(skip_all, name = "get_similar_news", fields(uuid = %params.uuid))]
    async fn execute(&self, params: SimilarNewsParams) -> CallToolResult {
        let uuid = params.uuid.trim().to_string();
        self.client
            .fetch_formatted(&["similar", uuid.as_str()], QueryParams::from_params(&params))
            .await
    }
}

/// `get_article_by_uuid`
pub struct ArticleByUuidTool {
    client: Arc<NewsClient>,
}

impl ArticleByUuidTool {
    pub fn new(client: Arc<NewsClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolDefinition for ArticleByUuidTool {
    const NAME: &'static str = "get_article_by_uuid";
    const DESCRIPTION: &'static str = "Get a specific article by the UUID returned from the search endpoints.";
    type Params = ArticleParams;

    #[instrument(skip_all, name = "get_article_by_uuid", fields(uuid = %params.uuid))]
    async fn execute(&self, params: ArticleParams) -> CallToolResult {
        self.client
            .fetch_formatted(&["uuid", params.uuid.trim()], QueryParams::new())
            .await
    }
}
