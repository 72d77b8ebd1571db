//! Tool handler traits.
//!
//! [`ToolDefinition`] is what a tool author implements: a name, a
//! description, a typed parameter struct and an `execute` body.
//! [`ToolHandler`] is the object-safe form the registry stores; every
//! `ToolDefinition` gets it for free through the blanket impl below.

use std::sync::Arc;

use async_trait::async_trait;
use rmcp::handler::server::tool::cached_schema_for_type;
use rmcp::model::{CallToolResult, JsonObject, Tool};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;

use super::ToolError;

/// Object-safe tool interface used by the registry and the transports.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Name the tool is registered and called under.
    fn name(&self) -> &str;

    /// Description shown to clients.
    fn description(&self) -> &str;

    /// JSON schema of the argument object.
    fn input_schema(&self) -> Arc<JsonObject>;

    /// Tool metadata as listed by `tools/list`.
    fn to_tool(&self) -> Tool {
        Tool {
            name: self.name().to_string().into(),
            description: Some(self.description().to_string().into()),
            input_schema: self.input_schema(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// Run the tool against a raw argument object.
    async fn call(&self, arguments: JsonObject) -> Result<CallToolResult, ToolError>;
}

/// Typed tool definition.
///
/// Upstream failures are reported inside the returned [`CallToolResult`];
/// only argument decoding fails at the protocol level.
#[async_trait]
pub trait ToolDefinition: Send + Sync + 'static {
    /// Tool name as registered in MCP.
    const NAME: &'static str;

    /// Tool description shown to clients.
    const DESCRIPTION: &'static str;

    /// Typed parameters, decoded from the argument object.
    type Params: DeserializeOwned + JsonSchema + Send + 'static;

    /// Execute the tool logic.
    async fn execute(&self, params: Self::Params) -> CallToolResult;
}

#[async_trait]
impl<T: ToolDefinition> ToolHandler for T {
    fn name(&self) -> &str {
        T::NAME
    }

    fn description(&self) -> &str {
        T::DESCRIPTION
    }

    fn input_schema(&self) -> Arc<JsonObject> {
        cached_schema_for_type::<T::Params>()
    }

    async fn call(&self, arguments: JsonObject) -> Result<CallToolResult, ToolError> {
        let params: T::Params = serde_json::from_value(serde_json::Value::Object(arguments))
            .map_err(|e| ToolError::invalid_arguments(format!("{}: {}", T::NAME, e)))?;
        Ok(self.execute(params).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::result_text;
    use rmcp::model::Content;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, JsonSchema)]
    struct GreetParams {
        name: String,
        #[serde(default)]
        shout: bool,
    }

    struct GreetTool;

    #[async_trait]
    impl ToolDefinition for GreetTool {
        const NAME: &'static str = "greet";
        const DESCRIPTION: &'static str = "Say hello";
        type Params = GreetParams;

        async fn execute(&self, params: GreetParams) -> CallToolResult {
            let text = format!("hello {}", params.name);
            let text = if params.shout { text.to_uppercase() } else { text };
            CallToolResult::success(vec![Content::text(text)])
        }
    }

    fn args(value: serde_json::Value) -> JsonObject {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_typed_call() {
        let tool = GreetTool;
        let result = tool
            .call(args(serde_json::json!({"name": "ada", "shout": true})))
            .await
            .unwrap();
        assert_eq!(result_text(&result), "HELLO ADA");
    }

    #[tokio::test]
    async fn test_missing_required_argument() {
        let err = GreetTool.call(JsonObject::new()).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(msg) if msg.contains("name")));
    }

    #[test]
    fn test_to_tool_metadata() {
        let tool = GreetTool.to_tool();
        assert_eq!(tool.name, "greet");
        assert_eq!(tool.description.as_deref(), Some("Say hello"));
        assert!(tool.input_schema.contains_key("properties"));
    }
}
