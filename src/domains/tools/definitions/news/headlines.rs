//! Top stories and full-archive search.

use std::sync::Arc;

use async_trait::async_trait;
use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::core::params::QueryParams;
use crate::domains::tools::ToolDefinition;

use super::client::NewsClient;

/// Filters for the top-stories endpoint, in query order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct TopNewsParams {
    #[schemars(description = "2-letter ISO 3166-1 country code, default is all countries")]
    pub locale: Option<String>,
    #[schemars(
        description = "Comma separated list of categories to include [general, science, sports, business, health, entertainment, tech, politics, food, travel]"
    )]
    pub categories: Option<String>,
    #[schemars(description = "Keywords or a phrase to search for")]
    pub search: Option<String>,
    #[schemars(
        description = "Comma separated list of fields to apply the search to [title, description, keywords, main_text]"
    )]
    pub search_fields: Option<String>,
    #[schemars(description = "Comma separated list of categories to exclude")]
    pub exclude_categories: Option<String>,
    #[schemars(description = "Comma separated list of domains to include")]
    pub domains: Option<String>,
    #[schemars(description = "Comma separated list of domains to exclude")]
    pub exclude_domains: Option<String>,
    #[schemars(description = "Comma separated list of source ids to include")]
    pub source_ids: Option<String>,
    #[schemars(description = "Comma separated list of source ids to exclude")]
    pub exclude_source_ids: Option<String>,
    #[schemars(description = "Comma separated list of languages to include, default is all")]
    pub language: Option<String>,
    #[schemars(description = "Only articles published before this date")]
    pub published_before: Option<String>,
    #[schemars(description = "Only articles published after this date")]
    pub published_after: Option<String>,
    #[schemars(description = "Only articles published on this date")]
    pub published_on: Option<String>,
    #[schemars(description = "Sort by published_on or relevance_score (relevance needs a search)")]
    pub sort: Option<String>,
    #[schemars(description = "Number of articles to return")]
    pub limit: Option<String>,
    #[schemars(description = "Page of the result set")]
    pub page: Option<String>,
}

/// Filters for the all-news endpoint, in query order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct AllNewsParams {
    #[schemars(
        description = "Categories to include [general, science, sports, business, health, entertainment, tech, politics, food, travel]"
    )]
    pub categories: Option<String>,
    #[schemars(description = "Comma separated list of languages to include, default is all")]
    pub language: Option<String>,
    #[schemars(description = "Keywords or a phrase to search for")]
    pub search: Option<String>,
    #[schemars(
        description = "Comma separated list of fields to apply the search to [title, description, keywords, main_text]"
    )]
    pub search_fields: Option<String>,
    #[schemars(description = "Comma separated list of categories to exclude")]
    pub exclude_categories: Option<String>,
    #[schemars(description = "Comma separated list of domains to include")]
    pub domains: Option<String>,
    #[schemars(description = "Comma separated list of domains to exclude")]
    pub exclude_domains: Option<String>,
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
    #[schemars(description = "Sort by published_on or relevance_score (relevance needs a search)")]
    pub sort: Option<String>,
    #[schemars(description = "Number of articles to return")]
    pub limit: Option<String>,
    #[schemars(description = "Page of the result set")]
    pub page: Option<String>,
}

/// `get_top_news`
pub struct TopNewsTool {
    client: Arc<NewsClient>,
}

impl TopNewsTool {
    pub fn new(client: Arc<NewsClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolDefinition for TopNewsTool {
    const NAME: &'static str = "get_top_news";
    const DESCRIPTION: &'static str = "Get top news stories. All filters are optional; blank filters are ignored.";
    type Params = TopNewsParams;

    #[instrument(skip_all, name = "get_top_news")]
    async fn execute(&self, params: TopNewsParams) -> CallToolResult {
        self.client
            .fetch_formatted(&["top"], QueryParams::from_params(&params))
            .await
    }
}

/// `get_all_news`
pub struct AllNewsTool {
    client: Arc<NewsClient>,
}

impl AllNewsTool {
    pub fn new(client: Arc<NewsClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolDefinition for AllNewsTool {
    const NAME: &'static str = "get_all_news";
    const DESCRIPTION: &'static str = "Find all live and historical articles. Filter by language, category, source and publish date, or search titles and article text.";
    type Params = AllNewsParams;

    #[instrument(skip_all, name = "get_all_news")]
    async fn execute(&self, params: AllNewsParams) -> CallToolResult {
        self.client
            .fetch_formatted(&["all"], QueryParams::from_params(&params))
            .await
    }
}
