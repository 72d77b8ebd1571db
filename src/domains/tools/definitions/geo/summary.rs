//! One-shot summary built from the other four geo calls.

use std::sync::Arc;

use async_trait::async_trait;
use rmcp::model::CallToolResult;
use serde_json::{Value, json};
use tracing::instrument;

use crate::core::fetch::FetchError;
use crate::domains::tools::ToolDefinition;

use super::super::common::{NoParams, json_result, unavailable};
use super::client::{GeoClient, UNAVAILABLE};

/// `get_geo_summary`
pub struct GeoSummaryTool {
    client: Arc<GeoClient>,
}

impl GeoSummaryTool {
    pub fn new(client: Arc<GeoClient>) -> Self {
        Self { client }
    }

    /// Location first, then weather, time and country, one after another.
    pub async fn summary(&self) -> Result<Value, FetchError> {
        let location = self.client.location().await?;
        let coordinate = |key: &str| {
            location
                .get(key)
                .and_then(Value::as_f64)
                .ok_or_else(|| FetchError::DecodeFailed(format!("location has no numeric '{key}'")))
        };
        let lat = coordinate("latitude")?;
        let lon = coordinate("longitude")?;
        let country = location.get("country").and_then(Value::as_str).unwrap_or_default();
        let city = location.get("city").and_then(Value::as_str).unwrap_or_default();

        let weather = self.client.weather(lat, lon).await?;
        let time = self.client.local_time(lat, lon).await?;
        let country_info = self.client.country_info(country).await?;

        Ok(json!({
            "location": format!("{city}, {country}"),
            "ip": location.get("ip").cloned().unwrap_or(Value::Null),
            "lat": lat,
            "lon": lon,
            "weather": weather,
            "time": time,
            "country_info": country_info,
        }))
    }
}

#[async_trait]
impl ToolDefinition for GeoSummaryTool {
    const NAME: &'static str = "get_geo_summary";
    const DESCRIPTION: &'static str = "Summarize the current location: IP, coordinates, weather, local time and country facts.";
    type Params = NoParams;

    #[instrument(skip_all, name = "get_geo_summary")]
    async fn execute(&self, _params: NoParams) -> CallToolResult {
        match self.summary().await {
            Ok(summary) => json_result(&summary),
            Err(e) => unavailable(UNAVAILABLE, &e),
        }
    }
}
