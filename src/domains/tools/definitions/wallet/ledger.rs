//! Schema, credential definition and issuance tools.

use std::sync::Arc;

use async_trait::async_trait;
use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::instrument;

use crate::core::params::QueryParams;
use crate::domains::tools::ToolDefinition;

use super::super::common::{json_result, non_blank};
use super::client::TractionClient;

/// Query flags shared by the endorser-aware write endpoints.
fn endorser_query(conn_id: &Option<String>, for_endorser: bool) -> QueryParams {
    let query = QueryParams::new().opt_raw("conn_id", non_blank(conn_id));
    if for_endorser {
        query.raw("create_transaction_for_endorser", "true")
    } else {
        query
    }
}

/// Schema ids are `DID:2:name:version`; colons are escaped in the path.
pub fn schema_path(schema_id: &str) -> String {
    format!("/schemas/{}", schema_id.trim().replace(':', "%3A"))
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateSchemaParams {
    #[schemars(description = "List of schema attribute names")]
    pub attributes: Vec<String>,
    #[schemars(description = "Name of the schema")]
    pub schema_name: String,
    #[schemars(description = "Version of the schema")]
    pub schema_version: String,
    #[schemars(description = "Optional connection ID for endorser flow")]
    pub conn_id: Option<String>,
    #[schemars(description = "If true, prepares a transaction for an endorser")]
    #[serde(default)]
    pub create_transaction_for_endorser: bool,
}

/// `create_schema`
pub struct CreateSchemaTool {
    client: Arc<TractionClient>,
}

impl CreateSchemaTool {
    pub fn new(client: Arc<TractionClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolDefinition for CreateSchemaTool {
    const NAME: &'static str = "create_schema";
    const DESCRIPTION: &'static str = "Create and send a schema to the ledger.";
    type Params = CreateSchemaParams;

    #[instrument(skip_all, name = "create_schema", fields(name = %p.schema_name, version = %p.schema_version))]
    async fn execute(&self, p: CreateSchemaParams) -> CallToolResult {
        let body = json!({
            "attributes": p.attributes,
            "schema_name": p.schema_name,
            "schema_version": p.schema_version,
        });
        let query = endorser_query(&p.conn_id, p.create_transaction_for_endorser);
        json_result(&self.client.post("/schemas", query, &body).await)
    }
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct CreatedSchemasParams {
    pub schema_id: Option<String>,
    pub schema_issuer_did: Option<String>,
    pub schema_name: Option<String>,
    pub schema_version: Option<String>,
}

/// `list_created_schemas`
pub struct ListSchemasTool {
    client: Arc<TractionClient>,
}

impl ListSchemasTool {
    pub fn new(client: Arc<TractionClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolDefinition for ListSchemasTool {
    const NAME: &'static str = "list_created_schemas";
    const DESCRIPTION: &'static str = "Retrieve ids of schemas created by this agent.";
    type Params = CreatedSchemasParams;

    async fn execute(&self, p: CreatedSchemasParams) -> CallToolResult {
        let query = QueryParams::new()
            .opt_raw("schema_id", non_blank(&p.schema_id))
            .opt_raw("schema_issuer_did", non_blank(&p.schema_issuer_did))
            .opt_raw("schema_name", non_blank(&p.schema_name))
            .opt_raw("schema_version", non_blank(&p.schema_version));
        json_result(&self.client.get("/schemas/created", query).await)
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SchemaIdParams {
    #[schemars(description = "Fully-qualified schema ID (e.g., DID:2:name:version)")]
    pub schema_id: String,
}

/// `get_schema_by_id`
pub struct SchemaByIdTool {
    client: Arc<TractionClient>,
}

impl SchemaByIdTool {
    pub fn new(client: Arc<TractionClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolDefinition for SchemaByIdTool {
    const NAME: &'static str = "get_schema_by_id";
    const DESCRIPTION: &'static str = "Retrieve a schema definition from the ledger by schema_id.";
    type Params = SchemaIdParams;

    async fn execute(&self, p: SchemaIdParams) -> CallToolResult {
        json_result(&self.client.get(&schema_path(&p.schema_id), QueryParams::new()).await)
    }
}

fn default_tag() -> String {
    "default".to_string()
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateCredDefParams {
    #[schemars(description = "ID of the schema to base the credential definition on")]
    pub schema_id: String,
    #[schemars(description = "Whether the credential supports revocation")]
    pub support_revocation: bool,
    #[schemars(description = "Tag name for the definition (default \"default\")")]
    #[serde(default = "default_tag")]
    pub tag: String,
    pub revocation_registry_size: Option<u32>,
    pub conn_id: Option<String>,
    #[serde(default)]
    pub create_transaction_for_endorser: bool,
}

/// `create_credential_definition`
pub struct CreateCredDefTool {
    client: Arc<TractionClient>,
}

impl CreateCredDefTool {
    pub fn new(client: Arc<TractionClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolDefinition for CreateCredDefTool {
    const NAME: &'static str = "create_credential_definition";
    const DESCRIPTION: &'static str = "Create and send a credential definition to the ledger.";
    type Params = CreateCredDefParams;

    async fn execute(&self, p: CreateCredDefParams) -> CallToolResult {
        let mut body = json!({
            "schema_id": p.schema_id,
            "support_revocation": p.support_revocation,
            "tag": p.tag,
        });
        if let Some(size) = p.revocation_registry_size {
            body["revocation_registry_size"] = json!(size);
        }
        let query = endorser_query(&p.conn_id, p.create_transaction_for_endorser);
        json_result(&self.client.post("/credential-definitions", query, &body).await)
    }
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct CreatedCredDefsParams {
    pub cred_def_id: Option<String>,
    pub issuer_id: Option<String>,
    pub schema_id: Option<String>,
    pub schema_issuer_did: Option<String>,
    pub schema_name: Option<String>,
    pub schema_version: Option<String>,
}

/// `get_created_credential_definitions`
pub struct ListCredDefsTool {
    client: Arc<TractionClient>,
}

impl ListCredDefsTool {
    pub fn new(client: Arc<TractionClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolDefinition for ListCredDefsTool {
    const NAME: &'static str = "get_created_credential_definitions";
    const DESCRIPTION: &'static str = "Retrieve credential definitions created by this agent.";
    type Params = CreatedCredDefsParams;

    async fn execute(&self, p: CreatedCredDefsParams) -> CallToolResult {
        let query = QueryParams::new()
            .opt_raw("cred_def_id", non_blank(&p.cred_def_id))
            .opt_raw("issuer_id", non_blank(&p.issuer_id))
            .opt_raw("schema_id", non_blank(&p.schema_id))
            .opt_raw("schema_issuer_did", non_blank(&p.schema_issuer_did))
            .opt_raw("schema_name", non_blank(&p.schema_name))
            .opt_raw("schema_version", non_blank(&p.schema_version));
        json_result(&self.client.get("/credential-definitions/created", query).await)
    }
}

fn default_comment() -> String {
    "Issuing credential".to_string()
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct IssueCredentialParams {
    #[schemars(description = "The connection ID to send the credential to")]
    pub connection_id: String,
    #[schemars(description = "Credential definition ID")]
    pub cred_def_id: String,
    #[schemars(description = "Schema ID the credential is based on")]
    pub schema_id: String,
    #[schemars(description = "Attribute names and values")]
    pub attributes: Map<String, Value>,
    #[schemars(description = "Remove the exchange record after issuance (default true)")]
    #[serde(default = "default_auto_remove")]
    pub auto_remove: bool,
    #[serde(default = "default_comment")]
    pub comment: String,
}

fn default_auto_remove() -> bool {
    true
}

/// Request body for `/issue-credential-2.0/send`.
pub fn issue_body(p: &IssueCredentialParams) -> Value {
    let attributes: Vec<Value> = p
        .attributes
        .iter()
        .map(|(name, value)| json!({"name": name, "value": value, "mime-type": "text/plain"}))
        .collect();
    json!({
        "auto_remove": p.auto_remove,
        "comment": p.comment,
        "connection_id": p.connection_id,
        "credential_preview": {
            "@type": "issue-credential/2.0/credential-preview",
            "attributes": attributes,
        },
        "filter": {
            "indy": {
                "cred_def_id": p.cred_def_id,
                "schema_id": p.schema_id,
            }
        }
    })
}

/// `issue_credential_v2`
pub struct IssueCredentialTool {
    client: Arc<TractionClient>,
}

impl IssueCredentialTool {
    pub fn new(client: Arc<TractionClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolDefinition for IssueCredentialTool {
    const NAME: &'static str = "issue_credential_v2";
    const DESCRIPTION: &'static str = "Issue a verifiable credential to a connection.";
    type Params = IssueCredentialParams;

    #[instrument(skip_all, name = "issue_credential_v2", fields(connection = %p.connection_id))]
    async fn execute(&self, p: IssueCredentialParams) -> CallToolResult {
        let body = issue_body(&p);
        json_result(
            &self
                .client
                .post("/issue-credential-2.0/send", QueryParams::new(), &body)
                .await,
        )
    }
}
