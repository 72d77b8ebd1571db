use std::sync::Arc;

use async_trait::async_trait;
use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use crate::domains::tools::ToolDefinition;

use super::super::common::json_result;
use super::client::HyperskillClient;

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct TopicsParams {
    #[schemars(
        description = "Topic keywords using Hyperskill-compatible names, e.g. \"for loop\", \"list comprehensions\", \"decorators\". Be precise, avoid duplicates and overly broad topics."
    )]
    pub topics: Vec<String>,
    #[schemars(description = "Programming language to filter topics by")]
    pub programming_language: String,
}

/// `find_topics_on_hyperskill`
pub struct FindTopicsTool {
    client: Arc<HyperskillClient>,
}

impl FindTopicsTool {
    pub fn new(client: Arc<HyperskillClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolDefinition for FindTopicsTool {
    const NAME: &'static str = "find_topics_on_hyperskill";
    const DESCRIPTION: &'static str = "Find topics on Hyperskill and return their id, title, url, hierarchy and a clickable link.";
    type Params = TopicsParams;

    #[instrument(skip_all, name = "find_topics_on_hyperskill", fields(count = params.topics.len()))]
    async fn execute(&self, params: TopicsParams) -> CallToolResult {
        let found = self
            .client
            .find_topics(&params.topics, &params.programming_language)
            .await;
        json_result(&Value::Array(found))
    }
}

/// `explain_topics_in_the_code`
pub struct ExplainTopicsTool {
    inner: FindTopicsTool,
}

impl ExplainTopicsTool {
    pub fn new(client: Arc<HyperskillClient>) -> Self {
        Self {
            inner: FindTopicsTool::new(client),
        }
    }
}

#[async_trait]
impl ToolDefinition for ExplainTopicsTool {
    const NAME: &'static str = "explain_topics_in_the_code";
    const DESCRIPTION: &'static str = "List the key concepts a user needs to understand some code, as Hyperskill topics with links and hierarchy.";
    type Params = TopicsParams;

    async fn execute(&self, params: TopicsParams) -> CallToolResult {
        self.inner.execute(params).await
    }
}
