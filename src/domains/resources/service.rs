//! Resource service implementation.
//!
//! The ResourceService manages resource discovery and access. Fixed
//! resources are looked up by URI; anything else is matched against the
//! registered templates.
//!
//! Resources are defined in `definitions/` and registered via `registry.rs`.

use std::io::ErrorKind;
use std::path::PathBuf;

use rmcp::model::{ReadResourceResult, Resource, ResourceContents, ResourceTemplate};
use serde_json::json;
use tracing::{info, instrument, warn};

use super::definitions::{PaperInfoTemplate, ResourceTemplateDefinition};
use super::error::ResourceError;
use super::registry::{get_all_resource_templates, get_all_resources};
use crate::core::config::{Config, Suite};
use crate::domains::tools::definitions::arxiv::{ArxivClient, clean_id, list_pdfs};

/// Service for managing and accessing resources.
pub struct ResourceService {
    /// Folder listed by `arxiv://papers`.
    papers_dir: PathBuf,

    /// Client used to resolve `arxiv://paper/{paper_id}`.
    client: ArxivClient,

    /// Registered resources, in listing order.
    resources: Vec<ResourceEntry>,

    /// Resource templates for parameterized resources.
    templates: Vec<ResourceTemplate>,
}

/// An entry in the resource registry.
#[derive(Debug, Clone)]
pub struct ResourceEntry {
    /// The resource metadata.
    pub resource: Resource,

    /// The content provider for this resource.
    pub content: ResourceContent,
}

/// Different types of resource content.
#[derive(Debug, Clone)]
pub enum ResourceContent {
    /// Static text content.
    Text(String),

    /// Content computed on every read.
    Dynamic(DynamicResourceType),
}

/// Types of dynamic resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DynamicResourceType {
    /// JSON listing of the PDFs in the papers folder.
    PaperListing,
}

impl ResourceService {
    /// Create the service. Resources are only published when the arXiv
    /// suite is enabled.
    pub fn new(config: &Config) -> Self {
        info!("Initializing ResourceService");

        let mut service = Self {
            papers_dir: config.tools.papers_dir.clone(),
            client: ArxivClient::new(config.upstreams.arxiv.clone()),
            resources: Vec::new(),
            templates: Vec::new(),
        };

        if config.tools.is_enabled(Suite::Arxiv) {
            for entry in get_all_resources() {
                service.register_resource(entry);
            }
            service.templates = get_all_resource_templates();
        } else {
            info!("arXiv suite disabled, no resources published");
        }

        service
    }

    /// Register a resource. A URI already present is replaced.
    pub fn register_resource(&mut self, entry: ResourceEntry) {
        info!("Registering resource: {}", entry.resource.raw.uri);
        self.resources
            .retain(|existing| existing.resource.raw.uri != entry.resource.raw.uri);
        self.resources.push(entry);
    }

    /// List all available resources.
    pub async fn list_resources(&self) -> Vec<Resource> {
        self.resources
            .iter()
            .map(|entry| entry.resource.clone())
            .collect()
    }

    /// List all available resource templates.
    pub async fn list_resource_templates(&self) -> Vec<ResourceTemplate> {
        self.templates.clone()
    }

    /// Read a resource by URI.
    #[instrument(skip(self), name = "read_resource")]
    pub async fn read_resource(&self, uri: &str) -> Result<ReadResourceResult, ResourceError> {
        let content = match self.resources.iter().find(|e| e.resource.raw.uri == uri) {
            Some(entry) => match &entry.content {
                ResourceContent::Text(text) => ResourceContents::text(text, uri),
                ResourceContent::Dynamic(dynamic_type) => {
                    self.resolve_dynamic_content(uri, *dynamic_type)?
                }
            },
            None => self.resolve_template(uri).await?,
        };

        Ok(ReadResourceResult {
            contents: vec![content],
        })
    }

    fn resolve_dynamic_content(
        &self,
        uri: &str,
        dynamic_type: DynamicResourceType,
    ) -> Result<ResourceContents, ResourceError> {
        match dynamic_type {
            DynamicResourceType::PaperListing => {
                let papers = match list_pdfs(&self.papers_dir) {
                    Ok(papers) => papers,
                    Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
                    Err(e) => return Err(e.into()),
                };
                let body = serde_json::to_string_pretty(&json!({ "papers": papers }))?;
                Ok(ResourceContents::text(body, uri))
            }
        }
    }

    async fn resolve_template(&self, uri: &str) -> Result<ResourceContents, ResourceError> {
        if self.templates.is_empty() {
            return Err(ResourceError::not_found(uri));
        }
        let paper_id = PaperInfoTemplate::capture(uri)
            .map(clean_id)
            .ok_or_else(|| ResourceError::not_found(uri))?;
        if paper_id.is_empty() {
            return Err(ResourceError::invalid_uri(uri));
        }

        let body = match self.client.paper(paper_id).await {
            Ok(paper) => serde_json::to_string_pretty(&paper)?,
            Err(e) => {
                warn!(paper_id, error = %e, "Paper metadata lookup failed");
                json!({ "error": e.to_string() }).to_string()
            }
        };
        Ok(ResourceContents::text(body, uri))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::definitions::arxiv::SAMPLE_FEED;
    use crate::test_support::{MockResponse, MockUpstream};
    use serde_json::Value;
    use tempfile::TempDir;

    fn config(papers_dir: &std::path::Path, arxiv: &str) -> Config {
        let mut config = Config::default();
        config.tools.papers_dir = papers_dir.to_path_buf();
        config.upstreams.arxiv = arxiv.to_string();
        config
    }

    fn text_of(result: &ReadResourceResult) -> String {
        match &result.contents[0] {
            ResourceContents::TextResourceContents { text, .. } => text.clone(),
            other => panic!("expected text contents, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_resource_service_creation() {
        let dir = TempDir::new().unwrap();
        let service = ResourceService::new(&config(dir.path(), "http://127.0.0.1:1/api/query"));

        let resources = service.list_resources().await;
        assert_eq!(resources.len(), 2);
        assert_eq!(service.list_resource_templates().await.len(), 1);
    }

    #[tokio::test]
    async fn test_disabled_suite_publishes_nothing() {
        let dir = TempDir::new().unwrap();
        let mut config = config(dir.path(), "http://127.0.0.1:1/api/query");
        config.tools.suites = vec![Suite::News];
        let service = ResourceService::new(&config);

        assert!(service.list_resources().await.is_empty());
        assert!(service.list_resource_templates().await.is_empty());
        assert!(matches!(
            service.read_resource("arxiv://paper/1706.03762").await,
            Err(ResourceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_read_schema() {
        let dir = TempDir::new().unwrap();
        let service = ResourceService::new(&config(dir.path(), "http://127.0.0.1:1/api/query"));

        let result = service.read_resource("arxiv://schema").await.unwrap();
        assert!(text_of(&result).contains("arxiv_download_paper"));
    }

    #[tokio::test]
    async fn test_read_paper_listing() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("b.pdf"), b"%PDF").unwrap();
        std::fs::write(dir.path().join("a.PDF"), b"%PDF").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        let service = ResourceService::new(&config(dir.path(), "http://127.0.0.1:1/api/query"));

        let result = service.read_resource("arxiv://papers").await.unwrap();
        let listing: Value = serde_json::from_str(&text_of(&result)).unwrap();
        let names: Vec<_> = listing["papers"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["filename"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.PDF", "b.pdf"]);
    }

    #[tokio::test]
    async fn test_missing_papers_dir_lists_nothing() {
        let dir = TempDir::new().unwrap();
        let service = ResourceService::new(&config(
            &dir.path().join("absent"),
            "http://127.0.0.1:1/api/query",
        ));

        let result = service.read_resource("arxiv://papers").await.unwrap();
        assert_eq!(text_of(&result), "{\n  \"papers\": []\n}");
    }

    #[tokio::test]
    async fn test_read_paper_metadata() {
        let dir = TempDir::new().unwrap();
        let upstream = MockUpstream::start(|_| MockResponse::text(SAMPLE_FEED)).await;
        let service = ResourceService::new(&config(dir.path(), &upstream.url("/api/query")));

        let result = service
            .read_resource("arxiv://paper/https://arxiv.org/abs/1706.03762")
            .await
            .unwrap();
        let paper: Value = serde_json::from_str(&text_of(&result)).unwrap();
        assert_eq!(paper["title"], "Attention Is All You Need");
        assert_eq!(paper["published"], "2017-06-12");
        assert_eq!(paper["categories"], serde_json::json!(["cs.CL", "cs.LG"]));

        let request = upstream.last_request().unwrap();
        assert_eq!(request.query(), Some("id_list=1706.03762"));
    }

    #[tokio::test]
    async fn test_paper_lookup_failure_is_error_json() {
        let dir = TempDir::new().unwrap();
        let upstream = MockUpstream::failing(503).await;
        let service = ResourceService::new(&config(dir.path(), &upstream.url("/api/query")));

        let result = service.read_resource("arxiv://paper/0000.00000").await.unwrap();
        let body: Value = serde_json::from_str(&text_of(&result)).unwrap();
        assert!(body["error"].as_str().unwrap().contains("503"));
    }

    #[tokio::test]
    async fn test_read_nonexistent_resource() {
        let dir = TempDir::new().unwrap();
        let service = ResourceService::new(&config(dir.path(), "http://127.0.0.1:1/api/query"));

        assert!(matches!(
            service.read_resource("mcp://server/nonexistent").await,
            Err(ResourceError::NotFound(_))
        ));
        assert!(matches!(
            service.read_resource("arxiv://paper/").await,
            Err(ResourceError::InvalidUri(_))
        ));
    }
}
