//! Location, weather and local time.

use std::sync::Arc;

use async_trait::async_trait;
use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::instrument;

use crate::domains::tools::ToolDefinition;

use super::super::common::{NoParams, json_result, unavailable};
use super::client::{GeoClient, UNAVAILABLE};

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CoordinateParams {
    #[schemars(description = "Latitude in decimal degrees")]
    pub lat: f64,
    #[schemars(description = "Longitude in decimal degrees")]
    pub lon: f64,
}

/// `get_my_location`
pub struct MyLocationTool {
    client: Arc<GeoClient>,
}

impl MyLocationTool {
    pub fn new(client: Arc<GeoClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolDefinition for MyLocationTool {
    const NAME: &'static str = "get_my_location";
    const DESCRIPTION: &'static str = "Get the current public IP address with its city, country and coordinates.";
    type Params = NoParams;

    #[instrument(skip_all, name = "get_my_location")]
    async fn execute(&self, _params: NoParams) -> CallToolResult {
        match self.client.location().await {
            Ok(location) => json_result(&location),
            Err(e) => unavailable(UNAVAILABLE, &e),
        }
    }
}

/// `get_weather`
pub struct WeatherTool {
    client: Arc<GeoClient>,
}

impl WeatherTool {
    pub fn new(client: Arc<GeoClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolDefinition for WeatherTool {
    const NAME: &'static str = "get_weather";
    const DESCRIPTION: &'static str = "Get the current weather at a latitude/longitude.";
    type Params = CoordinateParams;

    #[instrument(skip_all, name = "get_weather", fields(lat = params.lat, lon = params.lon))]
    async fn execute(&self, params: CoordinateParams) -> CallToolResult {
        match self.client.weather(params.lat, params.lon).await {
            Ok(weather) => json_result(&weather),
            Err(e) => unavailable(UNAVAILABLE, &e),
        }
    }
}

/// `get_local_time`
pub struct LocalTimeTool {
    client: Arc<GeoClient>,
}

impl LocalTimeTool {
    pub fn new(client: Arc<GeoClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolDefinition for LocalTimeTool {
    const NAME: &'static str = "get_local_time";
    const DESCRIPTION: &'static str = "Get the local time zone and time at a latitude/longitude.";
    type Params = CoordinateParams;

    #[instrument(skip_all, name = "get_local_time")]
    async fn execute(&self, params: CoordinateParams) -> CallToolResult {
        match self.client.local_time(params.lat, params.lon).await {
            Ok(time) => json_result(&time),
            Err(e) => unavailable(UNAVAILABLE, &e),
        }
    }
}
