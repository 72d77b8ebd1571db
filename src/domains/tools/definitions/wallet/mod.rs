//! Self-sovereign identity wallet tools over the Traction tenant API.

mod client;
mod connections;
mod ledger;

use std::sync::Arc;

use crate::core::config::Config;
use crate::domains::tools::ToolRegistry;

pub use client::{TIMEOUT, TractionClient};
pub use connections::{
    BasicMessagesTool, DIDEXCHANGE_PROTOCOL, OutOfBandInvitationTool, QueryConnectionsTool,
    SendMessageTool, TenantDetailsTool, invitation_url,
};
pub use ledger::{
    CreateCredDefTool, CreateSchemaTool, IssueCredentialTool, ListCredDefsTool, ListSchemasTool,
    SchemaByIdTool, issue_body, schema_path,
};

pub fn register(registry: &mut ToolRegistry, config: &Config) {
    if config.upstreams.traction.is_none() {
        tracing::warn!("MCP_TRACTION_URL not set - wallet tools will report an error");
    }
    let client = Arc::new(TractionClient::from_config(config));
    registry.register(TenantDetailsTool::new(client.clone()));
    registry.register(QueryConnectionsTool::new(client.clone()));
    registry.register(OutOfBandInvitationTool::new(client.clone()));
    registry.register(CreateSchemaTool::new(client.clone()));
    registry.register(ListSchemasTool::new(client.clone()));
    registry.register(SchemaByIdTool::new(client.clone()));
    registry.register(CreateCredDefTool::new(client.clone()));
    registry.register(ListCredDefsTool::new(client.clone()));
    registry.register(SendMessageTool::new(client.clone()));
    registry.register(BasicMessagesTool::new(client.clone()));
    registry.register(IssueCredentialTool::new(client));
}

#[cfg(test)]
mod tests {
    use super::connections::{BasicMessagesParams, ConnectionsParams, InvitationParams};
    use super::ledger::{IssueCredentialParams, SchemaIdParams};
    use super::*;
    use crate::domains::tools::ToolDefinition;
    use crate::test_support::{MockResponse, MockUpstream, result_json, result_text};
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use serde_json::{Value, json};

    /// Issues a token for tenant `t1`, then answers per path.
    async fn traction_upstream() -> MockUpstream {
        MockUpstream::start(|request| match request.path() {
            "/multitenancy/tenant/t1/token" => {
                if request.json_body() == json!({"api_key": "k1"}) {
                    MockResponse::json(json!({"token": "tok"}))
                } else {
                    MockResponse::text("bad key").with_status(401)
                }
            }
            "/tenant" => MockResponse::json(json!({"tenant_name": "acme"})),
            "/connections" => MockResponse::json(json!({"results": []})),
            "/out-of-band/create-invitation" => MockResponse::json(json!({
                "invitation": {"@type": "oob", "label": "Bob"}
            })),
            "/issue-credential-2.0/send" => MockResponse::json(json!({"state": "offer-sent"})),
            _ => MockResponse::text("no such record").with_status(404),
        })
        .await
    }

    fn client(upstream: &MockUpstream, key: &str) -> Arc<TractionClient> {
        Arc::new(TractionClient::new(
            Some(upstream.base_url.clone()),
            Some("t1".into()),
            Some(key.into()),
        ))
    }

    #[tokio::test]
    async fn test_tenant_details_with_bearer() {
        let upstream = traction_upstream().await;
        let tool = TenantDetailsTool::new(client(&upstream, "k1"));

        let result = result_json(&tool.execute(Default::default()).await);
        assert_eq!(result, json!({"tenant_name": "acme"}));

        let request = upstream.last_request().unwrap();
        assert_eq!(request.header("authorization"), Some("Bearer tok"));
    }

    #[tokio::test]
    async fn test_token_failure_short_circuits() {
        let upstream = traction_upstream().await;
        let tool = TenantDetailsTool::new(client(&upstream, "wrong"));

        let result = result_json(&tool.execute(Default::default()).await);
        assert_eq!(result, json!({"error": "Unable to retrieve token"}));
        assert_eq!(upstream.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_credentials() {
        let upstream = traction_upstream().await;
        let client = Arc::new(TractionClient::new(Some(upstream.base_url.clone()), None, None));

        let result = result_json(&TenantDetailsTool::new(client).execute(Default::default()).await);
        assert_eq!(result["error"], "TENANT_ID or API_KEY is missing");
        assert!(upstream.requests().is_empty());
    }

    #[tokio::test]
    async fn test_unconfigured_base_url() {
        let client = Arc::new(TractionClient::new(None, Some("t1".into()), Some("k1".into())));
        let result = result_json(&TenantDetailsTool::new(client).execute(Default::default()).await);
        assert_eq!(result["error"], "MCP_TRACTION_URL is not configured");
    }

    #[tokio::test]
    async fn test_query_connections_defaults() {
        let upstream = traction_upstream().await;
        let tool = QueryConnectionsTool::new(client(&upstream, "k1"));
        let params: ConnectionsParams =
            serde_json::from_value(json!({"their_did": "did:sov:ABC"})).unwrap();

        tool.execute(params).await;
        assert_eq!(
            upstream.last_request().unwrap().query(),
            Some("limit=100&offset=0&state=active&their_did=did%3Asov%3AABC")
        );
    }

    #[tokio::test]
    async fn test_query_connections_normalises_enumerated_filters() {
        let upstream = traction_upstream().await;
        let tool = QueryConnectionsTool::new(client(&upstream, "k1"));
        let params: ConnectionsParams = serde_json::from_value(json!({
            "alias": "Alice Wallet",
            "state": " Completed ",
            "their_role": "INVITEE"
        }))
        .unwrap();

        tool.execute(params).await;
        assert_eq!(
            upstream.last_request().unwrap().query(),
            Some("alias=Alice+Wallet&limit=100&offset=0&state=completed&their_role=invitee")
        );
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let upstream = traction_upstream().await;
        let tool = SchemaByIdTool::new(client(&upstream, "k1"));

        let result = result_json(
            &tool
                .execute(SchemaIdParams {
                    schema_id: "did:2:nanda:4.0".into(),
                })
                .await,
        );
        assert_eq!(result, json!({"error": "no such record", "status": 404}));
        assert_eq!(
            upstream.last_request().unwrap().path(),
            "/schemas/did%3A2%3Ananda%3A4.0"
        );
    }

    #[tokio::test]
    async fn test_invitation_url_encoding() {
        let upstream = traction_upstream().await;
        let client = TractionClient::new(
            Some(upstream.base_url.clone()),
            Some("t1".into()),
            Some("k1".into()),
        )
        .with_invitation_url(Some("https://wallet.example".into()));
        let tool = OutOfBandInvitationTool::new(Arc::new(client));
        let params: InvitationParams = serde_json::from_value(json!({"alias": "Bob"})).unwrap();

        let url = result_text(&tool.execute(params).await);
        let encoded = url.strip_prefix("https://wallet.example?oob=").unwrap();
        assert!(!encoded.contains('='));
        let decoded = URL_SAFE_NO_PAD.decode(encoded).unwrap();
        assert_eq!(decoded, br#"{"@type":"oob","label":"Bob"}"#);

        let sent = upstream.last_request().unwrap().json_body();
        assert_eq!(sent["alias"], "Bob");
        assert_eq!(sent["my_label"], "Default Label");
        assert_eq!(sent["handshake_protocols"], json!([DIDEXCHANGE_PROTOCOL]));
        assert!(sent.get("metadata").is_none());
    }

    #[tokio::test]
    async fn test_issue_credential_body() {
        let upstream = traction_upstream().await;
        let tool = IssueCredentialTool::new(client(&upstream, "k1"));
        let params: IssueCredentialParams = serde_json::from_value(json!({
            "connection_id": "c1",
            "cred_def_id": "cd1",
            "schema_id": "s1",
            "attributes": {"attended": "yes", "name": "Bob"}
        }))
        .unwrap();

        let result = result_json(&tool.execute(params).await);
        assert_eq!(result["state"], "offer-sent");

        let body = upstream.last_request().unwrap().json_body();
        assert_eq!(body["auto_remove"], true);
        assert_eq!(body["comment"], "Issuing credential");
        assert_eq!(body["filter"]["indy"]["cred_def_id"], "cd1");
        assert_eq!(
            body["credential_preview"]["attributes"][1],
            json!({"name": "name", "value": "Bob", "mime-type": "text/plain"})
        );
    }

    #[tokio::test]
    async fn test_basic_messages_filters() {
        let upstream = traction_upstream().await;
        let tool = BasicMessagesTool::new(client(&upstream, "k1"));
        let result = tool
            .execute(BasicMessagesParams {
                connection_id: Some("c1".into()),
                state: Some("  ".into()),
            })
            .await;

        assert_eq!(result_json(&result)["status"], Value::from(404));
        assert_eq!(upstream.last_request().unwrap().query(), Some("connection_id=c1"));
    }
}
