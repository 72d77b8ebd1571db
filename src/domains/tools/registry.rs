//! Tool Registry - central registration and dispatch for all tools.
//!
//! Tools are registered once at start-up, in suite order, and the registry
//! is then shared read-only between transports as `Arc<ToolRegistry>`.

use std::collections::HashMap;
use std::sync::Arc;

use rmcp::model::{CallToolResult, JsonObject, Tool};
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::core::config::Config;

use super::definitions;
use super::{ToolError, ToolHandler};

// ============================================================================
// Tool Registry
// ============================================================================

/// Tool registry - name-keyed, insertion-ordered collection of handlers.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn ToolHandler>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every suite enabled in `config`.
    pub fn from_config(config: &Config) -> Self {
        let mut registry = Self::new();
        for suite in &config.tools.suites {
            definitions::register_suite(*suite, &mut registry, config);
        }
        info!(
            "Registered {} tools from {} suite(s)",
            registry.len(),
            config.tools.suites.len()
        );
        registry
    }

    /// Register a tool. A name that is already taken keeps its first
    /// handler; the new one is dropped and `false` is returned.
    pub fn register<H: ToolHandler + 'static>(&mut self, handler: H) -> bool {
        self.register_arc(Arc::new(handler))
    }

    /// Register an already shared handler.
    pub fn register_arc(&mut self, handler: Arc<dyn ToolHandler>) -> bool {
        let name = handler.name().to_string();
        if self.index.contains_key(&name) {
            warn!("Tool '{}' is already registered, ignoring duplicate", name);
            return false;
        }
        self.index.insert(name, self.tools.len());
        self.tools.push(handler);
        true
    }

    /// Look a handler up by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn ToolHandler>> {
        self.index.get(name).map(|&i| self.tools[i].clone())
    }

    /// Get all tool names, in registration order.
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// Get all tools as Tool models (metadata).
    pub fn get_all_tools(&self) -> Vec<Tool> {
        self.tools.iter().map(|t| t.to_tool()).collect()
    }

    /// Iterate over the registered handlers.
    pub fn handlers(&self) -> impl Iterator<Item = &Arc<dyn ToolHandler>> {
        self.tools.iter()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Dispatch a tool call by name.
    ///
    /// Used by the JSON-RPC transports (http, sse). `null` arguments are
    /// treated as an empty object.
    #[instrument(skip(self, arguments))]
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: Value,
    ) -> Result<CallToolResult, ToolError> {
        let handler = self.get(name).ok_or_else(|| {
            warn!("Unknown tool requested: {}", name);
            ToolError::not_found(name)
        })?;

        let arguments = match arguments {
            Value::Object(map) => map,
            Value::Null => JsonObject::new(),
            other => {
                return Err(ToolError::invalid_arguments(format!(
                    "arguments must be an object, got {other}"
                )));
            }
        };

        handler.call(arguments).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Suite;
    use crate::domains::tools::ToolDefinition;
    use crate::test_support::result_text;
    use async_trait::async_trait;
    use rmcp::model::Content;
    use schemars::JsonSchema;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, JsonSchema)]
    struct EchoParams {
        text: String,
    }

    struct EchoTool(&'static str);

    #[async_trait]
    impl ToolDefinition for EchoTool {
        const NAME: &'static str = "echo";
        const DESCRIPTION: &'static str = "Echo the input";
        type Params = EchoParams;

        async fn execute(&self, params: EchoParams) -> CallToolResult {
            CallToolResult::success(vec![Content::text(format!("{}{}", self.0, params.text))])
        }
    }

    #[tokio::test]
    async fn test_duplicate_name_keeps_first() {
        let mut registry = ToolRegistry::new();
        assert!(registry.register(EchoTool("first:")));
        assert!(!registry.register(EchoTool("second:")));
        assert_eq!(registry.len(), 1);

        let result = registry
            .call_tool("echo", serde_json::json!({"text": "hi"}))
            .await
            .unwrap();
        assert_eq!(result_text(&result), "first:hi");
    }

    #[tokio::test]
    async fn test_call_unknown() {
        let registry = ToolRegistry::new();
        let err = registry
            .call_tool("unknown", serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_call_rejects_non_object_arguments() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool(""));
        let err = registry
            .call_tool("echo", serde_json::json!(["hi"]))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[test]
    fn test_registry_from_config_all_suites() {
        let registry = ToolRegistry::from_config(&Config::default());
        let names = registry.tool_names();

        assert!(names.contains(&"get_top_news"));
        assert!(names.contains(&"get_geo_summary"));
        assert!(names.contains(&"get_nutrition"));
        assert!(names.contains(&"request_shipment"));
        assert!(names.contains(&"get_shared_memories"));
        assert!(names.contains(&"find_topics_on_hyperskill"));
        assert!(names.contains(&"arxiv_download_paper"));
        assert!(names.contains(&"issue_credential_v2"));
        assert!(names.contains(&"get_item_info"));
        assert!(names.contains(&"query_memory"));
        assert!(names.contains(&"convert-contents"));
        assert!(names.contains(&"about_tb"));

        let mut unique = names.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), names.len());
    }

    #[test]
    fn test_registry_from_config_subset() {
        let mut config = Config::default();
        config.tools.suites = vec![Suite::News, Suite::Ufmr];
        let registry = ToolRegistry::from_config(&config);
        assert_eq!(
            registry.tool_names(),
            vec![
                "get_top_news",
                "get_all_news",
                "get_similar_news",
                "get_article_by_uuid",
                "get_news_sources",
                "about_tb"
            ]
        );
    }
}
