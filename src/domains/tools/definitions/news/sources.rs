use std::sync::Arc;

use async_trait::async_trait;
use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::core::params::QueryParams;
use crate::domains::tools::ToolDefinition;

use super::client::NewsClient;

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct NewsSourcesParams {
    #[schemars(
        description = "Categories to include [general, science, sports, business, health, entertainment, tech, politics, food, travel]"
    )]
    pub categories: Option<String>,
    #[schemars(description = "Comma separated list of languages to include, default is all")]
    pub language: Option<String>,
    #[schemars(description = "Comma separated list of categories to exclude")]
    pub exclude_categories: Option<String>,
    #[schemars(description = "Page of the result set, default is 1")]
    pub page: Option<String>,
}

/// `get_news_sources`
pub struct NewsSourcesTool {
    client: Arc<NewsClient>,
}

impl NewsSourcesTool {
    pub fn new(client: Arc<NewsClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolDefinition for NewsSourcesTool {
    const NAME: &'static str = "get_news_sources";
    const DESCRIPTION: &'static str = "List the news sources usable in other news requests. The upstream limit is 50 per request.";
    type Params = NewsSourcesParams;

    #[instrument(skip_all, name = "get_news_sources")]
    async fn execute(&self, params: NewsSourcesParams) -> CallToolResult {
        self.client
            .fetch_formatted(&["sources"], QueryParams::from_params(&params))
            .await
    }
}
