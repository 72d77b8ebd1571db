//! Hyperskill search and topic endpoints.

use std::collections::HashMap;
use std::sync::Arc;

use reqwest::Method;
use reqwest::header::COOKIE;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::core::fetch::{FetchError, HttpClient};
use crate::core::params::{QueryParams, join_path};

use super::session::SessionStore;

#[derive(Debug, Clone)]
pub struct HyperskillClient {
    base_url: String,
    http: HttpClient,
    session: Arc<SessionStore>,
}

impl HyperskillClient {
    pub fn new(base_url: impl Into<String>, session: Arc<SessionStore>) -> Self {
        Self {
            base_url: base_url.into(),
            http: HttpClient::default().accept_json(),
            session,
        }
    }

    pub fn topic_url(&self, id: &Value) -> String {
        let id = id_text(id);
        format!("{}/learn/topic/{}", self.base_url.trim_end_matches('/'), id)
    }

    async fn get(&self, path: &[&str], params: QueryParams) -> Result<Value, FetchError> {
        let url = params.url_for(&join_path(&self.base_url, path)?)?;
        let profile_url = join_path(&self.base_url, &["api", "profiles", "current"])?;

        let mut headers = Vec::new();
        if let Some(id) = self.session.session_id(&self.http, &profile_url).await {
            headers.push((COOKIE, format!("sessionid={id}")));
        }
        self.http.request_json(Method::GET, &url, None, &headers).await
    }

    /// `target_id` of the first search hit for `keyword`.
    pub async fn search(&self, keyword: &str) -> Option<String> {
        let params = QueryParams::new()
            .text("query", keyword)
            .raw("include_groups", "false")
            .raw("include_projects", "false")
            .raw("include_users", "false");

        let data = match self.get(&["api", "search-results"], params).await {
            Ok(data) => data,
            Err(e) => {
                warn!(error = %e, keyword, "Hyperskill search failed");
                return None;
            }
        };
        debug!(keyword, "Search response received");

        let hit = data
            .get("search-results")
            .or_else(|| data.get("search_results"))
            .and_then(Value::as_array)
            .and_then(|results| results.first())
            .and_then(|first| first.get("target_id"))
            .filter(|id| !id.is_null())
            .map(id_text);

        if hit.is_none() {
            info!("No search results found for keyword: {}", keyword);
        }
        hit
    }

    /// Topic details for a batch of ids.
    pub async fn topics(&self, ids: &[String]) -> Result<Vec<Value>, FetchError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let params = QueryParams::new().raw("ids", &ids.join(","));
        let data = self.get(&["api", "topics"], params).await?;
        data.get("topics")
            .and_then(Value::as_array)
            .cloned()
            .ok_or_else(|| FetchError::DecodeFailed("response has no 'topics' list".into()))
    }

    /// Titles for parent topic ids. Missing entries stay unresolved.
    pub async fn parent_titles(&self, ids: &[String]) -> HashMap<String, String> {
        match self.topics(ids).await {
            Ok(topics) => topics
                .iter()
                .filter_map(|t| {
                    let title = t.get("title")?.as_str()?;
                    Some((id_text(t.get("id")?), title.to_string()))
                })
                .collect(),
            Err(e) => {
                warn!(error = %e, "Unable to resolve parent topics");
                HashMap::new()
            }
        }
    }

    /// Search each topic, fetch details and resolve their hierarchy.
    pub async fn find_topics(&self, topics: &[String], language: &str) -> Vec<Value> {
        let mut ids = Vec::new();
        for topic in topics {
            if let Some(id) = self.search(&format!("{topic} {language}")).await {
                ids.push(id);
            }
        }
        if ids.is_empty() {
            return Vec::new();
        }

        let details = match self.topics(&ids).await {
            Ok(details) => details,
            Err(e) => {
                warn!(error = %e, "Unable to fetch topic details");
                return ids.into_iter().map(|id| json!({"id": id})).collect();
            }
        };

        let mut parent_ids: Vec<String> = Vec::new();
        for topic in &details {
            for parent in hierarchy(topic) {
                let parent = id_text(parent);
                if !parent_ids.contains(&parent) {
                    parent_ids.push(parent);
                }
            }
        }
        let parents = self.parent_titles(&parent_ids).await;

        details
            .iter()
            .map(|topic| {
                let id = topic.get("id").cloned().unwrap_or(Value::Null);
                let title = topic.get("title").and_then(Value::as_str).unwrap_or_default();
                let url = self.topic_url(&id);
                let trail = hierarchy(topic)
                    .map(|parent| {
                        let key = id_text(parent);
                        parents
                            .get(&key)
                            .cloned()
                            .unwrap_or_else(|| format!("Unknown ({key})"))
                    })
                    .collect::<Vec<_>>()
                    .join(" / ");
                json!({
                    "id": id,
                    "title": title,
                    "url": url,
                    "link": format!("[{title}]({url})"),
                    "hierarchy": trail,
                })
            })
            .collect()
    }
}

fn hierarchy(topic: &Value) -> impl Iterator<Item = &Value> {
    topic
        .get("hierarchy")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
}

/// Ids arrive as numbers or strings; compare them as text.
fn id_text(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
