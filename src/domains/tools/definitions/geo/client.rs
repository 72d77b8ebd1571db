//! Client for the four public geolocation upstreams.

use serde_json::{Value, json};
use tracing::debug;

use crate::core::config::Config;
use crate::core::fetch::{FetchError, HttpClient};
use crate::core::params::{QueryParams, join_path};

/// Failure text shared by the geo tools.
pub const UNAVAILABLE: &str = "Unable to fetch location data.";

#[derive(Debug, Clone)]
pub struct GeoClient {
    ipwho: String,
    open_meteo: String,
    worldtime: String,
    restcountries: String,
    http: HttpClient,
}

impl GeoClient {
    pub fn from_config(config: &Config) -> Self {
        let upstreams = &config.upstreams;
        Self {
            ipwho: upstreams.ipwho.clone(),
            open_meteo: upstreams.open_meteo.clone(),
            worldtime: upstreams.worldtime.clone(),
            restcountries: upstreams.restcountries.clone(),
            http: HttpClient::default(),
        }
    }

    /// Point every upstream at the same base URL.
    #[cfg(test)]
    pub fn with_base(base: &str) -> Self {
        Self {
            ipwho: base.to_string(),
            open_meteo: base.to_string(),
            worldtime: base.to_string(),
            restcountries: base.to_string(),
            http: HttpClient::default(),
        }
    }

    /// Caller's IP geolocation, passed through.
    pub async fn location(&self) -> Result<Value, FetchError> {
        let url = join_path(&self.ipwho, &[""])?;
        self.http.get_json(&url).await
    }

    /// Current weather at a coordinate; `{}` when the upstream has none.
    pub async fn weather(&self, lat: f64, lon: f64) -> Result<Value, FetchError> {
        let url = QueryParams::new()
            .number("latitude", Some(lat))
            .number("longitude", Some(lon))
            .raw("current_weather", "true")
            .url_for(&join_path(&self.open_meteo, &["v1", "forecast"])?)?;
        let data = self.http.get_json(&url).await?;
        Ok(data.get("current_weather").cloned().unwrap_or_else(|| json!({})))
    }

    /// Local time. The timezone list is only fetched to confirm the upstream
    /// is reachable; the coordinate is not resolved to a zone.
    pub async fn local_time(&self, lat: f64, lon: f64) -> Result<Value, FetchError> {
        debug!(lat, lon, "Resolving local time");
        let url = join_path(&self.worldtime, &["api", "timezone"])?;
        self.http.get_json(&url).await?;
        Ok(json!({"timezone": "UTC", "datetime": "Unknown"}))
    }

    /// Selected facts about the first country matching `name`.
    pub async fn country_info(&self, name: &str) -> Result<Value, FetchError> {
        let url = join_path(&self.restcountries, &["v3.1", "name", name.trim()])?;
        let data = self.http.get_json(&url).await?;
        Ok(summarize_country(&data))
    }
}

/// Reduce a restcountries response to the fields the tools report.
pub fn summarize_country(data: &Value) -> Value {
    let Some(info) = data.as_array().and_then(|list| list.first()) else {
        return json!({});
    };

    let currency = info
        .get("currencies")
        .and_then(Value::as_object)
        .and_then(|c| c.keys().next().cloned());
    let languages: Vec<Value> = info
        .get("languages")
        .and_then(Value::as_object)
        .map(|l| l.values().cloned().collect())
        .unwrap_or_default();

    json!({
        "name": info.pointer("/name/common").cloned().unwrap_or(Value::Null),
        "population": info.get("population").cloned().unwrap_or(Value::Null),
        "region": info.get("region").cloned().unwrap_or(Value::Null),
        "capital": info.pointer("/capital/0").cloned().unwrap_or(Value::Null),
        "currency": currency,
        "languages": languages,
    })
}
