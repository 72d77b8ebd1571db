//! Read-only catalog endpoints: routes, terminals, types and recipients.

use std::sync::Arc;

use async_trait::async_trait;
use rmcp::model::{CallToolResult, JsonObject};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::core::params::QueryParams;
use crate::domains::tools::{ToolDefinition, ToolError, ToolHandler};

use super::super::common::{NoParams, json_result, unavailable};
use super::client::AnymileClient;

/// A parameterless GET endpoint exposed as a tool.
#[derive(Debug, Clone, Copy)]
pub struct Endpoint {
    pub name: &'static str,
    pub description: &'static str,
    pub path: &'static str,
    pub failure: &'static str,
}

pub const ENDPOINTS: [Endpoint; 6] = [
    Endpoint {
        name: "get_routes",
        description: "Gets the publicly available drone routes from AnyMile.",
        path: "routes",
        failure: "Unable to fetch routes this location.",
    },
    Endpoint {
        name: "get_package_types",
        description: "Retrieves the available package types from AnyMile.",
        path: "package-types",
        failure: "Unable to fetch package types.",
    },
    Endpoint {
        name: "get_route_types",
        description: "Retrieves the available drone route types from AnyMile.",
        path: "route-types",
        failure: "Unable to fetch route types.",
    },
    Endpoint {
        name: "get_on_demand_types",
        description: "Retrieves the available On Demand Types from AnyMile for a drone shipment request.",
        path: "on-demand-types",
        failure: "Unable to fetch on demand types.",
    },
    Endpoint {
        name: "get_shipment_types",
        description: "Retrieves the available Shipment Types from AnyMile for a shipment request.",
        path: "shipment-types",
        failure: "Unable to fetch shipment types.",
    },
    Endpoint {
        name: "get_recipients",
        description: "Retrieves the list of recipients for a shipment package.",
        path: "recipients",
        failure: "No recipients available.",
    },
];

/// Tool backed by one [`Endpoint`].
pub struct EndpointTool {
    endpoint: Endpoint,
    client: Arc<AnymileClient>,
}

impl EndpointTool {
    pub fn new(endpoint: Endpoint, client: Arc<AnymileClient>) -> Self {
        Self { endpoint, client }
    }
}

#[async_trait]
impl ToolHandler for EndpointTool {
    fn name(&self) -> &str {
        self.endpoint.name
    }

    fn description(&self) -> &str {
        self.endpoint.description
    }

    fn input_schema(&self) -> Arc<JsonObject> {
        rmcp::handler::server::tool::cached_schema_for_type::<NoParams>()
    }

    async fn call(&self, _arguments: JsonObject) -> Result<CallToolResult, ToolError> {
        debug!(tool = self.endpoint.name, "Fetching AnyMile catalog");
        Ok(match self.client.get(self.endpoint.path, QueryParams::new()).await {
            Ok(data) => json_result(&data),
            Err(e) => unavailable(self.endpoint.failure, &e),
        })
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct TerminalsParams {
    #[schemars(description = "Terminal UUIDs to look up")]
    pub terminal_ids: Vec<String>,
}

/// `get_terminals_by_ids`
pub struct TerminalsTool {
    client: Arc<AnymileClient>,
}

impl TerminalsTool {
    pub const FAILURE: &'static str = "Unable to fetch terminals.";

    pub fn new(client: Arc<AnymileClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolDefinition for TerminalsTool {
    const NAME: &'static str = "get_terminals_by_ids";
    const DESCRIPTION: &'static str = "Gets the publicly available drone terminals by their IDs.";
    type Params = TerminalsParams;

    #[instrument(skip_all, name = "get_terminals_by_ids")]
    async fn execute(&self, params: TerminalsParams) -> CallToolResult {
        let ids: Vec<&str> = params
            .terminal_ids
            .iter()
            .map(|id| id.trim())
            .filter(|id| !id.is_empty())
            .collect();
        let query = QueryParams::new().raw("terminalIds", &ids.join(","));
        match self.client.get("terminal", query).await {
            Ok(data) => json_result(&data),
            Err(e) => unavailable(Self::FAILURE, &e),
        }
    }
}
