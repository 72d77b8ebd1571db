//! Nutrition facts from Open Food Facts.

use std::sync::Arc;

use async_trait::async_trait;
use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use crate::core::config::Config;
use crate::core::fetch::{FetchError, HttpClient};
use crate::core::params::{QueryParams, join_path};
use crate::domains::tools::{ToolDefinition, ToolRegistry};

use super::common::{json_result, unavailable};

pub const UNAVAILABLE: &str = "Unable to fetch nutrition data.";

/// `(output key, Open Food Facts nutriment key)`, per 100 g.
const NUTRIMENTS: [(&str, &str); 7] = [
    ("calories_kcal", "energy-kcal_100g"),
    ("fat_g", "fat_100g"),
    ("saturated_fat_g", "saturated-fat_100g"),
    ("sugars_g", "sugars_100g"),
    ("fiber_g", "fiber_100g"),
    ("proteins_g", "proteins_100g"),
    ("salt_g", "salt_100g"),
];

#[derive(Debug, Clone)]
pub struct NutritionClient {
    base_url: String,
    http: HttpClient,
}

impl NutritionClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: HttpClient::default(),
        }
    }

    /// Facts for the best match of `food`.
    pub async fn lookup(&self, food: &str) -> Result<Value, FetchError> {
        let url = QueryParams::new()
            .text("search_terms", food)
            .raw("search_simple", "1")
            .raw("action", "process")
            .raw("json", "1")
            .raw("page_size", "1")
            .url_for(&join_path(&self.base_url, &["cgi", "search.pl"])?)?;
        let data = self.http.get_json(&url).await?;
        Ok(summarize_product(&data))
    }
}

/// First product reduced to name, brand and per-100g nutriments.
pub fn summarize_product(data: &Value) -> Value {
    let Some(product) = data
        .get("products")
        .and_then(Value::as_array)
        .and_then(|p| p.first())
    else {
        return json!({"error": "No results found."});
    };

    let text_or_unknown = |key: &str| {
        product
            .get(key)
            .cloned()
            .filter(|v| !v.is_null())
            .unwrap_or_else(|| json!("Unknown"))
    };

    let mut summary = serde_json::Map::new();
    summary.insert("product_name".into(), text_or_unknown("product_name"));
    summary.insert("brand".into(), text_or_unknown("brands"));
    for (out_key, source_key) in NUTRIMENTS {
        let value = product
            .pointer(&format!("/nutriments/{source_key}"))
            .cloned()
            .unwrap_or(Value::Null);
        summary.insert(out_key.into(), value);
    }
    Value::Object(summary)
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct NutritionParams {
    #[schemars(description = "Food or product to look up, e.g. \"peanut butter\"")]
    pub food: String,
}

/// `get_nutrition`
pub struct NutritionTool {
    client: Arc<NutritionClient>,
}

impl NutritionTool {
    pub fn new(client: Arc<NutritionClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolDefinition for NutritionTool {
    const NAME: &'static str = "get_nutrition";
    const DESCRIPTION: &'static str = "Get nutrition facts per 100 g for a food using Open Food Facts.";
    type Params = NutritionParams;

    #[instrument(skip_all, name = "get_nutrition", fields(food = %params.food))]
    async fn execute(&self, params: NutritionParams) -> CallToolResult {
        match self.client.lookup(&params.food).await {
            Ok(facts) => json_result(&facts),
            Err(e) => unavailable(UNAVAILABLE, &e),
        }
    }
}

/// Register the nutrition tool.
pub fn register(registry: &mut ToolRegistry, config: &Config) {
    let client = Arc::new(NutritionClient::new(config.upstreams.openfoodfacts.clone()));
    registry.register(NutritionTool::new(client));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockUpstream, result_json};

    #[tokio::test]
    async fn test_lookup_first_product() {
        let upstream = MockUpstream::json(json!({
            "count": 2,
            "products": [
                {
                    "product_name": "Crunchy Peanut Butter",
                    "nutriments": {"energy-kcal_100g": 588, "fat_100g": 50.0, "salt_100g": 0.9}
                },
                {"product_name": "Ignored"}
            ]
        }))
        .await;
        let tool = NutritionTool::new(Arc::new(NutritionClient::new(upstream.base_url.clone())));

        let facts = result_json(&tool.execute(NutritionParams { food: " Peanut Butter ".into() }).await);
        assert_eq!(facts["product_name"], "Crunchy Peanut Butter");
        assert_eq!(facts["brand"], "Unknown");
        assert_eq!(facts["calories_kcal"], 588);
        assert!(facts["sugars_g"].is_null());

        let request = upstream.last_request().unwrap();
        assert_eq!(request.path(), "/cgi/search.pl");
        assert_eq!(
            request.query(),
            Some("search_terms=peanut+butter&search_simple=1&action=process&json=1&page_size=1")
        );
    }

    #[test]
    fn test_no_products() {
        assert_eq!(
            summarize_product(&json!({"products": []})),
            json!({"error": "No results found."})
        );
    }
}
