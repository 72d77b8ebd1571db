//! Geolocation suite: IP location, weather, local time, country facts.

mod client;
mod country;
mod location;
mod summary;

use std::sync::Arc;

use crate::core::config::Config;
use crate::domains::tools::ToolRegistry;

pub use client::{GeoClient, UNAVAILABLE, summarize_country};
pub use country::{CountryInfoTool, CountryParams};
pub use location::{CoordinateParams, LocalTimeTool, MyLocationTool, WeatherTool};
pub use summary::GeoSummaryTool;

/// Register the geolocation tools.
pub fn register(registry: &mut ToolRegistry, config: &Config) {
    let client = Arc::new(GeoClient::from_config(config));
    registry.register(MyLocationTool::new(client.clone()));
    registry.register(WeatherTool::new(client.clone()));
    registry.register(LocalTimeTool::new(client.clone()));
    registry.register(CountryInfoTool::new(client.clone()));
    registry.register(GeoSummaryTool::new(client));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::ToolDefinition;
    use crate::domains::tools::definitions::common::NoParams;
    use crate::test_support::{MockResponse, MockUpstream, result_json, result_text};
    use serde_json::json;

    async fn geo_upstream() -> MockUpstream {
        MockUpstream::start(|request| match request.path() {
            "/" => MockResponse::json(json!({
                "ip": "203.0.113.7",
                "city": "Berlin",
                "country": "Germany",
                "latitude": 52.52,
                "longitude": 13.405
            })),
            "/v1/forecast" => MockResponse::json(json!({
                "latitude": 52.52,
                "current_weather": {"temperature": 11.4, "windspeed": 7.2}
            })),
            "/api/timezone" => MockResponse::json(json!(["Europe/Berlin", "Etc/UTC"])),
            "/v3.1/name/Germany" => MockResponse::json(json!([{
                "name": {"common": "Germany", "official": "Federal Republic of Germany"},
                "population": 83240525,
                "region": "Europe",
                "capital": ["Berlin"],
                "currencies": {"EUR": {"name": "Euro"}},
                "languages": {"deu": "German"}
            }])),
            _ => MockResponse::status(404),
        })
        .await
    }

    #[tokio::test]
    async fn test_weather_extracts_current_weather() {
        let upstream = geo_upstream().await;
        let tool = WeatherTool::new(Arc::new(GeoClient::with_base(&upstream.base_url)));

        let result = tool.execute(CoordinateParams { lat: 52.52, lon: 13.405 }).await;
        assert_eq!(result_json(&result), json!({"temperature": 11.4, "windspeed": 7.2}));
        assert_eq!(
            upstream.last_request().unwrap().query(),
            Some("latitude=52.52&longitude=13.405&current_weather=true")
        );
    }

    #[tokio::test]
    async fn test_summary_combines_sub_calls() {
        let upstream = geo_upstream().await;
        let tool = GeoSummaryTool::new(Arc::new(GeoClient::with_base(&upstream.base_url)));

        let summary = result_json(&tool.execute(NoParams {}).await);
        assert_eq!(summary["location"], "Berlin, Germany");
        assert_eq!(summary["ip"], "203.0.113.7");
        assert_eq!(summary["weather"]["temperature"], 11.4);
        assert_eq!(summary["time"], json!({"timezone": "UTC", "datetime": "Unknown"}));
        assert_eq!(summary["country_info"]["currency"], "EUR");
        assert_eq!(summary["country_info"]["languages"], json!(["German"]));

        let paths: Vec<_> = upstream
            .requests()
            .iter()
            .map(|r| r.path().to_string())
            .collect();
        assert_eq!(
            paths,
            vec!["/", "/v1/forecast", "/api/timezone", "/v3.1/name/Germany"]
        );
    }

    #[tokio::test]
    async fn test_unknown_country_is_failure_text() {
        let upstream = geo_upstream().await;
        let tool = CountryInfoTool::new(Arc::new(GeoClient::with_base(&upstream.base_url)));

        let result = tool
            .execute(CountryParams { country: "Atlantis".into() })
            .await;
        assert_eq!(result_text(&result), UNAVAILABLE);
    }

    #[test]
    fn test_summarize_country_handles_sparse_data() {
        assert_eq!(summarize_country(&json!([])), json!({}));
        let sparse = summarize_country(&json!([{"name": {"common": "Nowhere"}, "capital": []}]));
        assert_eq!(sparse["name"], "Nowhere");
        assert!(sparse["capital"].is_null());
        assert!(sparse["currency"].is_null());
        assert_eq!(sparse["languages"], json!([]));
    }
}
