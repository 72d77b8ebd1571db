//! JSON-RPC 2.0 message types and method dispatch.
//!
//! Shared by the HTTP and SSE transports, which carry the same messages and
//! differ only in how a response travels back to the client.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, info, instrument, warn};

use crate::core::McpServer;
use crate::core::server::INSTRUCTIONS;
use crate::domains::resources::ResourceError;

/// MCP protocol revision announced on `initialize`.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// JSON-RPC request structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    /// Notifications carry no id and expect no response.
    pub fn is_notification(&self) -> bool {
        self.id.is_none() || self.method.starts_with("notifications/")
    }
}

/// JSON-RPC response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcResponse {
    /// Create a success response.
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response.
    pub fn error(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }

    /// Parse error: the body was not JSON-RPC.
    pub fn parse_error(msg: impl Into<String>) -> Self {
        Self::error(None, -32700, msg)
    }

    /// Method not found error.
    pub fn method_not_found(id: Option<Value>) -> Self {
        Self::error(id, -32601, "Method not found")
    }

    /// Invalid request error.
    pub fn invalid_request(id: Option<Value>) -> Self {
        Self::error(id, -32600, "Invalid Request")
    }

    /// Invalid params error.
    pub fn invalid_params(id: Option<Value>, msg: impl Into<String>) -> Self {
        Self::error(id, -32602, msg)
    }

    /// Internal error.
    pub fn internal_error(id: Option<Value>, msg: impl Into<String>) -> Self {
        Self::error(id, -32603, msg)
    }

    /// MCP "resource not found" error.
    pub fn resource_not_found(id: Option<Value>, msg: impl Into<String>) -> Self {
        Self::error(id, -32002, msg)
    }
}

/// Process one message. Notifications yield `None`.
#[instrument(skip_all, fields(method = %request.method))]
pub async fn dispatch(server: &McpServer, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
    if request.jsonrpc != "2.0" {
        return Some(JsonRpcResponse::invalid_request(request.id));
    }

    if request.is_notification() {
        handle_notification(&request);
        return None;
    }

    let id = request.id.clone();
    let response = match request.method.as_str() {
        "initialize" => handle_initialize(server, id),
        "ping" => JsonRpcResponse::success(id, json!({})),
        "tools/list" => JsonRpcResponse::success(id, json!({ "tools": server.list_tools() })),
        "tools/call" => handle_tools_call(server, request).await,
        "resources/list" => JsonRpcResponse::success(
            id,
            json!({ "resources": server.list_resources().await }),
        ),
        "resources/templates/list" => JsonRpcResponse::success(
            id,
            json!({ "resourceTemplates": server.list_resource_templates().await }),
        ),
        "resources/read" => handle_resources_read(server, request).await,
        "prompts/list" => {
            JsonRpcResponse::success(id, json!({ "prompts": server.list_prompts().await }))
        }
        "prompts/get" => handle_prompts_get(server, request).await,
        _ => {
            warn!("Unknown method: {}", request.method);
            JsonRpcResponse::method_not_found(id)
        }
    };

    Some(response)
}

/// Parse a raw body and process it.
pub async fn dispatch_str(server: &McpServer, body: &str) -> Option<JsonRpcResponse> {
    match serde_json::from_str::<JsonRpcRequest>(body) {
        Ok(request) => dispatch(server, request).await,
        Err(e) => Some(JsonRpcResponse::parse_error(e.to_string())),
    }
}

fn handle_initialize(server: &McpServer, id: Option<Value>) -> JsonRpcResponse {
    info!("Processing initialize request");

    JsonRpcResponse::success(
        id,
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": {},
                "resources": {},
                "prompts": {}
            },
            "serverInfo": {
                "name": server.name(),
                "version": server.version()
            },
            "instructions": INSTRUCTIONS
        }),
    )
}

/// `params.<field>` as a string, or the matching invalid-params response.
fn required_str(
    params: &Option<Value>,
    field: &str,
    id: &Option<Value>,
) -> Result<String, JsonRpcResponse> {
    let params = params
        .as_ref()
        .ok_or_else(|| JsonRpcResponse::invalid_params(id.clone(), "Missing params"))?;
    params
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| JsonRpcResponse::invalid_params(id.clone(), format!("Missing {field}")))
}

async fn handle_tools_call(server: &McpServer, request: JsonRpcRequest) -> JsonRpcResponse {
    let name = match required_str(&request.params, "name", &request.id) {
        Ok(name) => name,
        Err(response) => return response,
    };
    info!(tool = %name, "Processing tools/call request");

    let arguments = request
        .params
        .as_ref()
        .and_then(|p| p.get("arguments"))
        .cloned()
        .unwrap_or(Value::Null);

    match server.call_tool(&name, arguments).await {
        Ok(result) => JsonRpcResponse::success(request.id, result),
        Err(e) => JsonRpcResponse::error(request.id, e.code(), e.to_string()),
    }
}

async fn handle_resources_read(server: &McpServer, request: JsonRpcRequest) -> JsonRpcResponse {
    let uri = match required_str(&request.params, "uri", &request.id) {
        Ok(uri) => uri,
        Err(response) => return response,
    };

    match server.read_resource(&uri).await {
        Ok(result) => JsonRpcResponse::success(request.id, result),
        Err(e @ ResourceError::NotFound(_)) => {
            JsonRpcResponse::resource_not_found(request.id, e.to_string())
        }
        Err(e @ ResourceError::InvalidUri(_)) => {
            JsonRpcResponse::invalid_params(request.id, e.to_string())
        }
        Err(e) => JsonRpcResponse::internal_error(request.id, e.to_string()),
    }
}

async fn handle_prompts_get(server: &McpServer, request: JsonRpcRequest) -> JsonRpcResponse {
    let name = match required_str(&request.params, "name", &request.id) {
        Ok(name) => name,
        Err(response) => return response,
    };
    let arguments = request
        .params
        .as_ref()
        .and_then(|p| p.get("arguments"))
        .cloned();

    match server.get_prompt(&name, arguments).await {
        Ok(result) => JsonRpcResponse::success(request.id, result),
        Err(e) => JsonRpcResponse::invalid_params(request.id, e.to_string()),
    }
}

fn handle_notification(request: &JsonRpcRequest) {
    match request.method.as_str() {
        "notifications/initialized" => info!("Client sent initialized notification"),
        other => debug!("Received notification: {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{Config, Suite};

    fn server() -> McpServer {
        let mut config = Config::default();
        config.tools.suites = vec![Suite::Ufmr, Suite::Arxiv];
        McpServer::new(config)
    }

    fn request(method: &str, params: Value) -> JsonRpcRequest {
        JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: Some(json!(1)),
            method: method.to_string(),
            params: Some(params),
        }
    }

    #[tokio::test]
    async fn test_initialize_reports_server_info() {
        let response = dispatch(&server(), request("initialize", json!({})))
            .await
            .unwrap();
        let result = response.result.unwrap();
        assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(result["serverInfo"]["name"], "api-toolbox");
    }

    #[tokio::test]
    async fn test_tools_list_and_call() {
        let server = server();
        let listed = dispatch(&server, request("tools/list", json!({})))
            .await
            .unwrap()
            .result
            .unwrap();
        let names: Vec<_> = listed["tools"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names[0], "about_tb");
        assert!(names.contains(&"arxiv_search_papers".to_string()));

        let called = dispatch(&server, request("tools/call", json!({"name": "about_tb"})))
            .await
            .unwrap();
        assert!(called.error.is_none());
        assert_eq!(called.result.unwrap()["content"][0]["type"], "text");
    }

    #[tokio::test]
    async fn test_tool_errors() {
        let server = server();
        let missing = dispatch(&server, request("tools/call", json!({"name": "nope"})))
            .await
            .unwrap();
        assert_eq!(missing.error.unwrap().code, -32602);

        let no_name = dispatch(&server, request("tools/call", json!({})))
            .await
            .unwrap();
        assert_eq!(no_name.error.unwrap().message, "Missing name");

        let bad_args = dispatch(
            &server,
            request("tools/call", json!({"name": "arxiv_is_paper", "arguments": {}})),
        )
        .await
        .unwrap();
        assert_eq!(bad_args.error.unwrap().code, -32602);
    }

    #[tokio::test]
    async fn test_resources_and_prompts() {
        let server = server();
        let read = dispatch(&server, request("resources/read", json!({"uri": "arxiv://schema"})))
            .await
            .unwrap();
        assert_eq!(read.result.unwrap()["contents"][0]["uri"], "arxiv://schema");

        let unknown = dispatch(&server, request("resources/read", json!({"uri": "x://y"})))
            .await
            .unwrap();
        assert_eq!(unknown.error.unwrap().code, -32002);

        let prompts = dispatch(&server, request("prompts/list", json!({})))
            .await
            .unwrap()
            .result
            .unwrap();
        assert_eq!(prompts["prompts"].as_array().unwrap().len(), 2);

        let missing_arg = dispatch(
            &server,
            request("prompts/get", json!({"name": "arxiv_search_prompt"})),
        )
        .await
        .unwrap();
        assert!(missing_arg.error.unwrap().message.contains("query"));
    }

    #[tokio::test]
    async fn test_notifications_and_unknown_methods() {
        let server = server();
        let mut notification = request("notifications/initialized", json!({}));
        notification.id = None;
        assert!(notification.is_notification());
        assert!(dispatch(&server, notification).await.is_none());

        let unknown = dispatch(&server, request("sampling/createMessage", json!({})))
            .await
            .unwrap();
        assert_eq!(unknown.error.unwrap().code, -32601);

        let ping = dispatch(&server, request("ping", json!({}))).await.unwrap();
        assert_eq!(ping.result, Some(json!({})));
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let response = dispatch_str(&server(), "{not json").await.unwrap();
        assert_eq!(response.error.unwrap().code, -32700);

        let wrong_version = dispatch_str(
            &server(),
            r#"{"jsonrpc":"1.0","id":3,"method":"ping"}"#,
        )
        .await
        .unwrap();
        assert_eq!(wrong_version.error.unwrap().code, -32600);
    }
}
