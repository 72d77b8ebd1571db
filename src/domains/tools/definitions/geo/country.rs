use std::sync::Arc;

use async_trait::async_trait;
use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::instrument;

use crate::domains::tools::ToolDefinition;

use super::super::common::{json_result, unavailable};
use super::client::{GeoClient, UNAVAILABLE};

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CountryParams {
    #[schemars(description = "Country name, e.g. \"Germany\"")]
    pub country: String,
}

/// `get_country_info`
pub struct CountryInfoTool {
    client: Arc<GeoClient>,
}

impl CountryInfoTool {
    pub fn new(client: Arc<GeoClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolDefinition for CountryInfoTool {
    const NAME: &'static str = "get_country_info";
    const DESCRIPTION: &'static str = "Get population, region, capital, currency and languages of a country.";
    type Params = CountryParams;

    #[instrument(skip_all, name = "get_country_info", fields(country = %params.country))]
    async fn execute(&self, params: CountryParams) -> CallToolResult {
        match self.client.country_info(&params.country).await {
            Ok(info) => json_result(&info),
            Err(e) => unavailable(UNAVAILABLE, &e),
        }
    }
}
