//! Tenant, connection and messaging tools.

use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::{debug, info, instrument};

use crate::core::params::QueryParams;
use crate::domains::tools::ToolDefinition;

use super::super::common::{NoParams, json_result, non_blank, text_result};
use super::client::TractionClient;

/// DID-exchange protocol advertised in invitations.
pub const DIDEXCHANGE_PROTOCOL: &str = "https://didcomm.org/didexchange/1.0";

/// `get_tenant_details`
pub struct TenantDetailsTool {
    client: Arc<TractionClient>,
}

impl TenantDetailsTool {
    pub fn new(client: Arc<TractionClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolDefinition for TenantDetailsTool {
    const NAME: &'static str = "get_tenant_details";
    const DESCRIPTION: &'static str = "Retrieves tenant details for the configured wallet tenant.";
    type Params = NoParams;

    async fn execute(&self, _params: NoParams) -> CallToolResult {
        json_result(&self.client.get("/tenant", QueryParams::new()).await)
    }
}

fn default_limit() -> u32 {
    100
}

fn default_state() -> Option<String> {
    Some("active".to_string())
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ConnectionsParams {
    #[schemars(description = "Optional alias filter")]
    pub alias: Option<String>,
    #[schemars(description = "Optional connection protocol filter")]
    pub connection_protocol: Option<String>,
    #[schemars(description = "Optional invitation key filter")]
    pub invitation_key: Option<String>,
    #[schemars(description = "Optional invitation message ID filter")]
    pub invitation_msg_id: Option<String>,
    #[schemars(description = "Number of results to return (default: 100)")]
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[schemars(description = "Filter by my DID")]
    pub my_did: Option<String>,
    #[schemars(description = "Pagination offset (default: 0)")]
    #[serde(default)]
    pub offset: u32,
    #[schemars(description = "Filter by connection state (default: active)")]
    #[serde(default = "default_state")]
    pub state: Option<String>,
    #[schemars(description = "Filter by their DID")]
    pub their_did: Option<String>,
    #[schemars(description = "Filter by their public DID")]
    pub their_public_did: Option<String>,
    #[schemars(description = "Filter by their role")]
    pub their_role: Option<String>,
}

/// `query_connections`
pub struct QueryConnectionsTool {
    client: Arc<TractionClient>,
}

impl QueryConnectionsTool {
    pub fn new(client: Arc<TractionClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolDefinition for QueryConnectionsTool {
    const NAME: &'static str = "query_connections";
    const DESCRIPTION: &'static str = "Query agent-to-agent connections using the /connections endpoint.";
    type Params = ConnectionsParams;

    /// Enumerated filters (protocol, state, role) are normalised; aliases,
    /// keys, ids and DIDs are matched verbatim upstream and sent raw.
    async fn execute(&self, p: ConnectionsParams) -> CallToolResult {
        let query = QueryParams::new()
            .opt_raw("alias", non_blank(&p.alias))
            .opt_text("connection_protocol", p.connection_protocol.as_deref())
            .opt_raw("invitation_key", non_blank(&p.invitation_key))
            .opt_raw("invitation_msg_id", non_blank(&p.invitation_msg_id))
            .number("limit", Some(p.limit))
            .opt_raw("my_did", non_blank(&p.my_did))
            .number("offset", Some(p.offset))
            .opt_text("state", p.state.as_deref())
            .opt_raw("their_did", non_blank(&p.their_did))
            .opt_raw("their_public_did", non_blank(&p.their_public_did))
            .opt_text("their_role", p.their_role.as_deref());
        json_result(&self.client.get("/connections", query).await)
    }
}

fn default_alias() -> String {
    "Default Alias".to_string()
}

fn default_label() -> String {
    "Default Label".to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct InvitationParams {
    #[schemars(description = "An optional alias for the invitation")]
    #[serde(default = "default_alias")]
    pub alias: String,
    #[schemars(description = "Whether to include handshake protocols")]
    #[serde(default = "default_true")]
    pub handshake: bool,
    #[schemars(description = "Additional metadata to include in the invitation")]
    pub metadata: Option<Map<String, Value>>,
    #[schemars(description = "If true, the public DID is used")]
    #[serde(default)]
    pub use_public_did: bool,
    #[schemars(description = "A label used in the invitation")]
    #[serde(default = "default_label")]
    pub my_label: String,
}

/// `create_out_of_band_invitation`
pub struct OutOfBandInvitationTool {
    client: Arc<TractionClient>,
}

impl OutOfBandInvitationTool {
    pub fn new(client: Arc<TractionClient>) -> Self {
        Self { client }
    }
}

/// `{base}?oob=<url-safe base64 of the compact invitation JSON>`
pub fn invitation_url(base: &str, invitation: &Value) -> String {
    let compact = serde_json::to_string(invitation).unwrap_or_else(|_| invitation.to_string());
    debug!("Serialized invitation JSON: {}", compact);
    format!("{base}?oob={}", URL_SAFE_NO_PAD.encode(compact.as_bytes()))
}

#[async_trait]
impl ToolDefinition for OutOfBandInvitationTool {
    const NAME: &'static str = "create_out_of_band_invitation";
    const DESCRIPTION: &'static str = "Create a new out-of-band (RFC 0434) invitation and return a connection URL.";
    type Params = InvitationParams;

    #[instrument(skip_all, name = "create_out_of_band_invitation", fields(alias = %params.alias))]
    async fn execute(&self, params: InvitationParams) -> CallToolResult {
        let mut payload = json!({
            "alias": params.alias,
            "my_label": params.my_label,
            "use_public_did": params.use_public_did,
        });
        if params.handshake {
            payload["handshake_protocols"] = json!([DIDEXCHANGE_PROTOCOL]);
        }
        if let Some(metadata) = params.metadata.filter(|m| !m.is_empty()) {
            payload["metadata"] = Value::Object(metadata);
        }

        let result = self
            .client
            .post("/out-of-band/create-invitation", QueryParams::new(), &payload)
            .await;

        match (result.get("invitation"), self.client.invitation_base()) {
            (Some(invitation), Some(base)) => {
                info!("Invitation created");
                text_result(invitation_url(base, invitation))
            }
            _ => json_result(&result),
        }
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SendMessageParams {
    #[schemars(description = "The connection ID to which the message will be sent")]
    pub conn_id: String,
    #[schemars(description = "The text content of the message")]
    pub content: String,
}

/// `send_message`
pub struct SendMessageTool {
    client: Arc<TractionClient>,
}

impl SendMessageTool {
    pub fn new(client: Arc<TractionClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolDefinition for SendMessageTool {
    const NAME: &'static str = "send_message";
    const DESCRIPTION: &'static str = "Send a basic message to a connection.";
    type Params = SendMessageParams;

    async fn execute(&self, params: SendMessageParams) -> CallToolResult {
        let path = format!("/connections/{}/send-message", params.conn_id.trim());
        let body = json!({"content": params.content});
        json_result(&self.client.post(&path, QueryParams::new(), &body).await)
    }
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct BasicMessagesParams {
    #[schemars(description = "Limit messages to a specific connection ID")]
    pub connection_id: Option<String>,
    #[schemars(description = "Message state: 'sent' or 'received'")]
    pub state: Option<String>,
}

/// `query_basic_messages`
pub struct BasicMessagesTool {
    client: Arc<TractionClient>,
}

impl BasicMessagesTool {
    pub fn new(client: Arc<TractionClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolDefinition for BasicMessagesTool {
    const NAME: &'static str = "query_basic_messages";
    const DESCRIPTION: &'static str = "Query basic messages exchanged with all connections.";
    type Params = BasicMessagesParams;

    async fn execute(&self, params: BasicMessagesParams) -> CallToolResult {
        let query = QueryParams::new()
            .opt_raw("connection_id", non_blank(&params.connection_id))
            .opt_text("state", params.state.as_deref());
        json_result(&self.client.get("/basicmessages", query).await)
    }
}
