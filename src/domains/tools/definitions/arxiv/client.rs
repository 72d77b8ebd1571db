//! arXiv Atom API client.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::core::fetch::{FetchError, HttpClient};
use crate::core::params::QueryParams;

/// Summaries longer than this are cut in search listings.
pub const SUMMARY_PREVIEW_CHARS: usize = 300;

macro_rules! pattern {
    ($name:ident, $re:expr) => {
        static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($re).expect("valid atom pattern"));
    };
}

pattern!(ENTRY, r"(?s)<entry>(.*?)</entry>");
pattern!(ID, r"(?s)<id>(.*?)</id>");
pattern!(TITLE, r"(?s)<title[^>]*>(.*?)</title>");
pattern!(SUMMARY, r"(?s)<summary[^>]*>(.*?)</summary>");
pattern!(PUBLISHED, r"(?s)<published>(.*?)</published>");
pattern!(AUTHOR, r"(?s)<author>\s*<name>(.*?)</name>");
pattern!(CATEGORY, r#"<category\b[^>]*\bterm="([^"]*)""#);
pattern!(LINK, r"<link\b[^>]*>");
pattern!(HREF, r#"\bhref="([^"]*)""#);

/// One entry of an Atom feed.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Paper {
    pub id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub summary: String,
    pub published: String,
    pub pdf_url: Option<String>,
    pub categories: Vec<String>,
}

impl Paper {
    /// Copy with the summary cut to [`SUMMARY_PREVIEW_CHARS`].
    pub fn preview(&self) -> Self {
        let mut paper = self.clone();
        if paper.summary.chars().count() > SUMMARY_PREVIEW_CHARS {
            paper.summary = paper.summary.chars().take(SUMMARY_PREVIEW_CHARS).collect();
            paper.summary.push_str("...");
        }
        paper
    }
}

#[derive(Debug, Clone)]
pub struct ArxivClient {
    base_url: String,
    http: HttpClient,
}

impl ArxivClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: HttpClient::default(),
        }
    }

    async fn query(&self, params: QueryParams) -> Result<Vec<Paper>, FetchError> {
        let url = params.url_for(&self.base_url)?;
        let feed = self.http.get_text(&url).await?;
        let papers = parse_feed(&feed);
        debug!(count = papers.len(), "Parsed arXiv feed");
        Ok(papers)
    }

    /// Relevance-sorted search. The query is passed through verbatim so
    /// field prefixes and boolean operators keep working.
    pub async fn search(&self, query: &str, max_results: u32) -> Result<Vec<Paper>, FetchError> {
        self.query(
            QueryParams::new()
                .raw("search_query", query)
                .raw("start", "0")
                .number("max_results", Some(max_results))
                .raw("sortBy", "relevance")
                .raw("sortOrder", "descending"),
        )
        .await
    }

    /// Metadata for a single identifier.
    pub async fn paper(&self, id: &str) -> Result<Paper, FetchError> {
        self.query(QueryParams::new().raw("id_list", id))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| FetchError::DecodeFailed(format!("no paper found for id {id}")))
    }

    /// Save the paper's PDF at `path`.
    pub async fn download(&self, paper: &Paper, path: &Path) -> Result<u64, FetchError> {
        let url = paper
            .pdf_url
            .clone()
            .unwrap_or_else(|| paper.id.replace("/abs/", "/pdf/"));
        self.http.download(&url, path).await
    }
}

/// Entries of an Atom feed. Error entries reported by the API are skipped.
pub fn parse_feed(feed: &str) -> Vec<Paper> {
    ENTRY
        .captures_iter(feed)
        .filter_map(|caps| parse_entry(&caps[1]))
        .collect()
}

fn parse_entry(entry: &str) -> Option<Paper> {
    let id = first(&ID, entry)?;
    if id.contains("/api/errors") {
        return None;
    }

    let published = first(&PUBLISHED, entry).unwrap_or_default();
    let published = chrono::DateTime::parse_from_rfc3339(&published)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| published.chars().take(10).collect());

    let pdf_url = LINK
        .find_iter(entry)
        .map(|m| m.as_str())
        .find(|tag| tag.contains(r#"title="pdf""#))
        .and_then(|tag| HREF.captures(tag))
        .map(|caps| unescape(&caps[1]));

    Some(Paper {
        id,
        title: first(&TITLE, entry)
            .map(|t| collapse_whitespace(&t))
            .unwrap_or_default(),
        authors: AUTHOR
            .captures_iter(entry)
            .map(|caps| unescape(caps[1].trim()))
            .collect(),
        summary: first(&SUMMARY, entry).unwrap_or_default(),
        published,
        pdf_url,
        categories: CATEGORY
            .captures_iter(entry)
            .map(|caps| unescape(&caps[1]))
            .collect(),
    })
}

fn first(re: &Regex, text: &str) -> Option<String> {
    re.captures(text).map(|caps| unescape(caps[1].trim()))
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
