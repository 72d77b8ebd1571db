//! News suite (thenewsapi.com).
//!
//! Five read-only tools over the same base URL. Responses are rendered with
//! the recursive text formatter; any failure yields "Unable to fetch news.".

mod client;
mod headlines;
mod similar;
mod sources;

use std::sync::Arc;

use crate::core::config::Config;
use crate::domains::tools::ToolRegistry;

pub use client::{NewsClient, UNAVAILABLE};
pub use headlines::{AllNewsParams, AllNewsTool, TopNewsParams, TopNewsTool};
pub use similar::{ArticleByUuidTool, ArticleParams, SimilarNewsParams, SimilarNewsTool};
pub use sources::{NewsSourcesParams, NewsSourcesTool};

/// Register the news tools.
pub fn register(registry: &mut ToolRegistry, config: &Config) {
    let client = Arc::new(NewsClient::from_config(config));
    registry.register(TopNewsTool::new(client.clone()));
    registry.register(AllNewsTool::new(client.clone()));
    registry.register(SimilarNewsTool::new(client.clone()));
    registry.register(ArticleByUuidTool::new(client.clone()));
    registry.register(NewsSourcesTool::new(client));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::ToolDefinition;
    use crate::test_support::{MockResponse, MockUpstream, result_text};
    use serde_json::{Value, json};
    use std::time::Duration;

    fn client_for(upstream: &MockUpstream, api_key: Option<&str>) -> Arc<NewsClient> {
        Arc::new(NewsClient::new(
            upstream.url("/v1/news"),
            api_key.map(str::to_string),
        ))
    }

    #[tokio::test]
    async fn test_blank_filters_request_bare_path() {
        let upstream = MockUpstream::json(json!({"data": []})).await;
        let tool = TopNewsTool::new(client_for(&upstream, None));

        let params = TopNewsParams {
            locale: Some("".into()),
            search: Some("   ".into()),
            ..Default::default()
        };
        tool.execute(params).await;

        let request = upstream.last_request().unwrap();
        assert_eq!(request.uri, "/v1/news/top");
        assert_eq!(request.query(), None);
        assert_eq!(request.header("accept"), Some("application/json"));
    }

    #[tokio::test]
    async fn test_filters_are_normalised_and_token_appended() {
        let upstream = MockUpstream::json(json!({"data": []})).await;
        let tool = AllNewsTool::new(client_for(&upstream, Some("TokEN")));

        let params = AllNewsParams {
            search: Some("  Hello World  ".into()),
            domains: Some("A.com,b.com".into()),
            ..Default::default()
        };
        tool.execute(params).await;

        let request = upstream.last_request().unwrap();
        assert_eq!(request.path(), "/v1/news/all");
        assert_eq!(
            request.query(),
            Some("search=hello+world&domains=a.com%2Cb.com&api_token=TokEN")
        );
    }

    #[tokio::test]
    async fn test_response_is_formatted() {
        let upstream = MockUpstream::json(json!({
            "meta": {"found": 1},
            "data": [{"title": "Rust 2024", "source": null}]
        }))
        .await;
        let tool = NewsSourcesTool::new(client_for(&upstream, None));

        let result = tool.execute(NewsSourcesParams::default()).await;
        assert_eq!(
            result_text(&result),
            "Meta: Found: 1 \nData: Title: Rust 2024 \nSource: Missing \n"
        );
    }

    #[tokio::test]
    async fn test_error_status_yields_failure_text() {
        let upstream = MockUpstream::failing(500).await;
        let tool = TopNewsTool::new(client_for(&upstream, None));

        let result = tool.execute(TopNewsParams::default()).await;
        assert_eq!(result_text(&result), UNAVAILABLE);
        assert_eq!(result.is_error, Some(false));
    }

    #[tokio::test]
    async fn test_body_without_data_yields_failure_text() {
        for body in [json!({}), json!([]), Value::Null] {
            let upstream = MockUpstream::json(body.clone()).await;
            let tool = TopNewsTool::new(client_for(&upstream, None));

            let result = tool.execute(TopNewsParams::default()).await;
            assert_eq!(result_text(&result), UNAVAILABLE, "body {body}");
        }
    }

    #[tokio::test]
    async fn test_timeout_yields_failure_text() {
        let upstream = MockUpstream::start(|_| {
            MockResponse::json(json!({})).delayed(Duration::from_secs(2))
        })
        .await;
        let client = NewsClient::new(upstream.url("/v1/news"), None)
            .with_timeout(Duration::from_millis(100));
        let tool = TopNewsTool::new(Arc::new(client));

        let result = tool.execute(TopNewsParams::default()).await;
        assert_eq!(result_text(&result), UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_uuid_goes_in_path() {
        let upstream = MockUpstream::json(json!({"uuid": "abc"})).await;
        let client = client_for(&upstream, None);

        SimilarNewsTool::new(client.clone())
            .execute(SimilarNewsParams {
                uuid: " 0b1c-AF ".into(),
                language: Some("EN".into()),
                ..Default::default()
            })
            .await;
        let request = upstream.last_request().unwrap();
        assert_eq!(request.uri, "/v1/news/similar/0b1c-AF?language=en");

        ArticleByUuidTool::new(client)
            .execute(ArticleParams { uuid: "0b1c-AF".into() })
            .await;
        assert_eq!(upstream.last_request().unwrap().uri, "/v1/news/uuid/0b1c-AF");
    }
}
