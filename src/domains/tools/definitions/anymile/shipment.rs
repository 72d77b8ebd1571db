//! Package construction and shipment requests.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, SecondsFormat};
use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use crate::domains::tools::ToolDefinition;

use super::super::common::{error_result, json_result, unavailable};
use super::client::AnymileClient;

pub const SHIPMENT_FAILURE: &str = "Unable to request shipment.";

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct PackageParams {
    #[schemars(description = "One of the package types available from AnyMile")]
    pub package_type: String,
    #[schemars(description = "Weight of the package in kilograms")]
    pub weight: f64,
    #[schemars(description = "Height of the package in meters")]
    pub height: f64,
    #[schemars(description = "Width of the package in meters")]
    pub width: f64,
    #[schemars(description = "Length of the package in meters")]
    pub length: f64,
    #[schemars(description = "Description of the package contents")]
    pub description: String,
}

/// Package body as the shipment endpoint expects it.
pub fn package_request(params: &PackageParams) -> Value {
    json!({
        "amount": 1,
        "packageType": params.package_type,
        "length": params.length,
        "width": params.width,
        "height": params.height,
        "weight": params.weight,
        "description": params.description,
    })
}

/// `create_shipment_package_request`
pub struct PackageRequestTool;

#[async_trait]
impl ToolDefinition for PackageRequestTool {
    const NAME: &'static str = "create_shipment_package_request";
    const DESCRIPTION: &'static str = "Builds a drone shipment package request to pass to request_shipment.";
    type Params = PackageParams;

    async fn execute(&self, params: PackageParams) -> CallToolResult {
        json_result(&package_request(&params))
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ShipmentParams {
    #[schemars(description = "On Demand type, as returned by get_on_demand_types")]
    pub on_demand_type: String,
    #[schemars(description = "Shipment type, as returned by get_shipment_types")]
    pub shipment_type: String,
    #[schemars(description = "Start of the drop-off window (ISO 8601 datetime)")]
    pub shipper_drop_off_start_time: String,
    #[schemars(description = "End of the drop-off window (ISO 8601 datetime)")]
    pub shipper_drop_off_end_time: String,
    #[schemars(description = "Start of the delivery window (ISO 8601 datetime)")]
    pub shipper_delivery_start_time: String,
    #[schemars(description = "End of the delivery window (ISO 8601 datetime)")]
    pub shipper_delivery_end_time: String,
    #[schemars(description = "Origin terminal id, taken from a route")]
    pub origin_terminal_id: String,
    #[schemars(description = "Destination terminal id, taken from a route")]
    pub destination_terminal_id: String,
    #[schemars(description = "Recipient id, created by the user or fetched from AnyMile")]
    pub recipient_id: String,
    #[schemars(description = "Package object (or its JSON text) from create_shipment_package_request")]
    pub shipment_package_request: Value,
}

/// ISO 8601 with millisecond precision. Offsets are kept; naive times stay naive.
pub fn iso_millis(input: &str) -> Result<String, String> {
    let input = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.to_rfc3339_opts(SecondsFormat::Millis, false));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .map(|dt| dt.format("%Y-%m-%dT%H:%M:%S%.3f").to_string())
        .ok_or_else(|| format!("'{input}' is not an ISO 8601 datetime"))
}

/// Build the camelCase shipment body.
pub fn shipment_body(params: &ShipmentParams) -> Result<Value, String> {
    let package = match &params.shipment_package_request {
        Value::String(text) => serde_json::from_str(text)
            .map_err(|e| format!("shipment_package_request is not valid JSON: {e}"))?,
        other => other.clone(),
    };

    Ok(json!({
        "onDemandType": params.on_demand_type,
        "shipmentType": params.shipment_type,
        "shipperDropOffStartTime": iso_millis(&params.shipper_drop_off_start_time)?,
        "shipperDropOffEndTime": iso_millis(&params.shipper_drop_off_end_time)?,
        "shipperRequestedDeliveryStartTime": iso_millis(&params.shipper_delivery_start_time)?,
        "shipperRequestedDeliveryEndTime": iso_millis(&params.shipper_delivery_end_time)?,
        "originTerminalId": params.origin_terminal_id,
        "destinationTerminalId": params.destination_terminal_id,
        "recipientId": params.recipient_id,
        "packages": [package],
    }))
}

/// `request_shipment`
pub struct RequestShipmentTool {
    client: Arc<AnymileClient>,
}

impl RequestShipmentTool {
    pub fn new(client: Arc<AnymileClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolDefinition for RequestShipmentTool {
    const NAME: &'static str = "request_shipment";
    const DESCRIPTION: &'static str = "Requests a drone shipment for a package from AnyMile.";
    type Params = ShipmentParams;

    #[instrument(skip_all, name = "request_shipment")]
    async fn execute(&self, params: ShipmentParams) -> CallToolResult {
        let body = match shipment_body(&params) {
            Ok(body) => body,
            Err(message) => return error_result(&message),
        };
        match self.client.post("shipment", &body).await {
            Ok(response) => json_result(&response),
            Err(e) => unavailable(SHIPMENT_FAILURE, &e),
        }
    }
}
