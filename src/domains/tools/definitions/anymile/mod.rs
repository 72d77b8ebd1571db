//! AnyMile drone-logistics suite.

mod catalog;
mod client;
mod shipment;

use std::sync::Arc;

use crate::core::config::Config;
use crate::domains::tools::ToolRegistry;

pub use catalog::{ENDPOINTS, Endpoint, EndpointTool, TerminalsParams, TerminalsTool};
pub use client::AnymileClient;
pub use shipment::{
    PackageParams, PackageRequestTool, RequestShipmentTool, SHIPMENT_FAILURE, ShipmentParams,
    iso_millis, package_request, shipment_body,
};

/// Register the AnyMile tools.
pub fn register(registry: &mut ToolRegistry, config: &Config) {
    let client = Arc::new(AnymileClient::new(config.upstreams.anymile.clone()));
    registry.register(EndpointTool::new(ENDPOINTS[0], client.clone()));
    registry.register(TerminalsTool::new(client.clone()));
    registry.register(PackageRequestTool);
    for endpoint in &ENDPOINTS[1..] {
        registry.register(EndpointTool::new(*endpoint, client.clone()));
    }
    registry.register(RequestShipmentTool::new(client));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::{ToolDefinition, ToolHandler};
    use crate::test_support::{MockResponse, MockUpstream, result_json, result_text};
    use rmcp::model::JsonObject;
    use serde_json::json;

    fn client(upstream: &MockUpstream) -> Arc<AnymileClient> {
        Arc::new(AnymileClient::new(upstream.url("/api/v1/mcp/public")))
    }

    #[tokio::test]
    async fn test_endpoint_tool_passes_json_through() {
        let upstream = MockUpstream::json(json!([{"id": "r1", "name": "Harbor loop"}])).await;
        let tool = EndpointTool::new(ENDPOINTS[0], client(&upstream));

        let result = tool.call(JsonObject::new()).await.unwrap();
        assert_eq!(result_json(&result), json!([{"id": "r1", "name": "Harbor loop"}]));

        let request = upstream.last_request().unwrap();
        assert_eq!(request.path(), "/api/v1/mcp/public/routes");
        assert_eq!(request.header("user-agent"), Some("anymile-mcp-nanda/1.0"));
    }

    #[tokio::test]
    async fn test_empty_recipients_is_failure_text() {
        let upstream = MockUpstream::json(json!([])).await;
        let recipients = ENDPOINTS.iter().find(|e| e.name == "get_recipients").unwrap();
        let tool = EndpointTool::new(*recipients, client(&upstream));

        let result = tool.call(JsonObject::new()).await.unwrap();
        assert_eq!(result_text(&result), "No recipients available.");
    }

    #[tokio::test]
    async fn test_terminals_joined_ids() {
        let upstream = MockUpstream::json(json!([{"id": "a"}])).await;
        let tool = TerminalsTool::new(client(&upstream));

        tool.execute(TerminalsParams {
            terminal_ids: vec!["A-1".into(), " ".into(), "b-2".into()],
        })
        .await;
        assert_eq!(
            upstream.last_request().unwrap().query(),
            Some("terminalIds=A-1%2Cb-2")
        );
    }

    #[tokio::test]
    async fn test_request_shipment_body() {
        let upstream = MockUpstream::json(json!({"shipmentId": "s-1"})).await;
        let tool = RequestShipmentTool::new(client(&upstream));
        let package = package_request(&PackageParams {
            package_type: "SMALL_BOX".into(),
            weight: 1.5,
            height: 0.2,
            width: 0.3,
            length: 0.4,
            description: "Books".into(),
        });

        let result = tool
            .execute(ShipmentParams {
                on_demand_type: "ASAP".into(),
                shipment_type: "STANDARD".into(),
                shipper_drop_off_start_time: "2025-03-01T09:00:00Z".into(),
                shipper_drop_off_end_time: "2025-03-01T10:00:00+02:00".into(),
                shipper_delivery_start_time: "2025-03-01T11:00:00".into(),
                shipper_delivery_end_time: "2025-03-01 12:30".into(),
                origin_terminal_id: "t-origin".into(),
                destination_terminal_id: "t-dest".into(),
                recipient_id: "rcp-9".into(),
                shipment_package_request: json!(package.to_string()),
            })
            .await;
        assert_eq!(result_json(&result)["shipmentId"], "s-1");

        let request = upstream.last_request().unwrap();
        assert_eq!(request.path(), "/api/v1/mcp/public/shipment");
        let body = request.json_body();
        assert_eq!(body["shipperDropOffStartTime"], "2025-03-01T09:00:00.000+00:00");
        assert_eq!(body["shipperDropOffEndTime"], "2025-03-01T10:00:00.000+02:00");
        assert_eq!(body["shipperRequestedDeliveryStartTime"], "2025-03-01T11:00:00.000");
        assert_eq!(body["shipperRequestedDeliveryEndTime"], "2025-03-01T12:30:00.000");
        assert_eq!(body["packages"][0]["amount"], 1);
        assert_eq!(body["packages"][0]["packageType"], "SMALL_BOX");
    }

    #[tokio::test]
    async fn test_shipment_upstream_failure() {
        let upstream = MockUpstream::start(|_| MockResponse::status(422)).await;
        let tool = RequestShipmentTool::new(client(&upstream));
        let result = tool
            .execute(ShipmentParams {
                on_demand_type: "ASAP".into(),
                shipment_type: "STANDARD".into(),
                shipper_drop_off_start_time: "2025-03-01T09:00:00Z".into(),
                shipper_drop_off_end_time: "2025-03-01T10:00:00Z".into(),
                shipper_delivery_start_time: "2025-03-01T11:00:00Z".into(),
                shipper_delivery_end_time: "2025-03-01T12:00:00Z".into(),
                origin_terminal_id: "a".into(),
                destination_terminal_id: "b".into(),
                recipient_id: "c".into(),
                shipment_package_request: json!({"amount": 1}),
            })
            .await;
        assert_eq!(result_text(&result), SHIPMENT_FAILURE);
    }

    #[test]
    fn test_iso_millis_rejects_garbage() {
        assert!(iso_millis("next tuesday").is_err());
    }
}
