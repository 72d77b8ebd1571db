//! arXiv search, download and filename housekeeping.

mod client;
mod files;
mod tools;

use std::sync::Arc;

use crate::core::config::Config;
use crate::domains::tools::ToolRegistry;

pub use client::{ArxivClient, Paper, SUMMARY_PREVIEW_CHARS, parse_feed};
pub use files::{
    PdfEntry, clean_id, extract_arxiv_id, is_arxiv_paper, list_pdfs, sanitize_filename,
};
pub use tools::{
    ArxivContext, DetectDirectoryTool, DownloadPaperTool, IsPaperTool, RenamePapersTool,
    SearchPapersTool,
};

#[cfg(test)]
pub(crate) use client::tests::FEED as SAMPLE_FEED;

pub fn register(registry: &mut ToolRegistry, config: &Config) {
    let ctx = Arc::new(ArxivContext {
        client: ArxivClient::new(config.upstreams.arxiv.clone()),
        papers_dir: config.tools.papers_dir.clone(),
    });
    registry.register(IsPaperTool);
    registry.register(DetectDirectoryTool);
    registry.register(SearchPapersTool::new(ctx.clone()));
    registry.register(DownloadPaperTool::new(ctx.clone()));
    registry.register(RenamePapersTool::new(ctx));
}

#[cfg(test)]
mod tests {
    use super::tools::{DetectDirectoryParams, DownloadParams, IsPaperParams, RenameParams, SearchParams};
    use super::*;
    use crate::domains::tools::ToolDefinition;
    use crate::test_support::{MockResponse, MockUpstream, result_json};
    use std::path::Path;
    use tempfile::TempDir;

    /// Serves the sample feed with PDF links pointing back at a local host.
    async fn arxiv_upstream() -> (MockUpstream, MockUpstream) {
        let pdf_host = MockUpstream::start(|_| MockResponse::text("%PDF-1.4")).await;
        let feed = client::tests::FEED.replace("http://arxiv.org/pdf", &pdf_host.url("/pdf"));
        let api = MockUpstream::start(move |_| MockResponse::text(&feed)).await;
        (api, pdf_host)
    }

    fn context(upstream: &MockUpstream, papers_dir: &Path) -> Arc<ArxivContext> {
        Arc::new(ArxivContext {
            client: ArxivClient::new(upstream.url("/api/query")),
            papers_dir: papers_dir.to_path_buf(),
        })
    }

    #[tokio::test]
    async fn test_is_paper() {
        let dir = TempDir::new().unwrap();
        let pdf = dir.path().join("2301.12345v1.pdf");
        let txt = dir.path().join("2301.12345v1.txt");
        std::fs::write(&pdf, b"x").unwrap();
        std::fs::write(&txt, b"x").unwrap();

        let check = |path: &Path| IsPaperParams {
            file_path: path.display().to_string(),
        };
        let found = result_json(&IsPaperTool.execute(check(&pdf)).await);
        assert_eq!(found, serde_json::json!({"is_arxiv_paper": true, "arxiv_id": "2301.12345v1"}));

        let not_pdf = result_json(&IsPaperTool.execute(check(&txt)).await);
        assert_eq!(not_pdf["reason"], "Not a PDF file");

        let missing = result_json(&IsPaperTool.execute(check(&dir.path().join("nope.pdf"))).await);
        assert_eq!(missing["reason"], "File not found");
    }

    #[tokio::test]
    async fn test_detect_directory() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("1706.03762.pdf"), b"x").unwrap();
        std::fs::write(dir.path().join("receipt.pdf"), b"x").unwrap();

        let report = result_json(
            &DetectDirectoryTool
                .execute(DetectDirectoryParams {
                    directory_path: dir.path().display().to_string(),
                })
                .await,
        );
        assert_eq!(report["contains_arxiv_papers"], true);
        assert_eq!(report["arxiv_paper_count"], 1);
        assert_eq!(report["total_pdf_count"], 2);
        assert_eq!(report["recommended_tool"], "arxiv_rename_papers");
        assert_eq!(report["arxiv_papers"][0]["arxiv_id"], "1706.03762");

        let invalid = result_json(
            &DetectDirectoryTool
                .execute(DetectDirectoryParams {
                    directory_path: dir.path().join("missing").display().to_string(),
                })
                .await,
        );
        assert_eq!(invalid["reason"], "Not a valid directory");
    }

    #[tokio::test]
    async fn test_search_papers() {
        let (upstream, _pdf_host) = arxiv_upstream().await;
        let dir = TempDir::new().unwrap();
        let tool = SearchPapersTool::new(context(&upstream, dir.path()));

        let result = result_json(
            &tool
                .execute(SearchParams {
                    query: "ti:Attention AND cat:cs.CL".into(),
                    max_results: 3,
                })
                .await,
        );
        assert_eq!(result["results"][0]["title"], "Attention Is All You Need");
        assert_eq!(
            upstream.last_request().unwrap().query(),
            Some("search_query=ti%3AAttention+AND+cat%3Acs.CL&start=0&max_results=3&sortBy=relevance&sortOrder=descending")
        );

        let blank = result_json(&tool.execute(SearchParams { query: " ".into(), max_results: 1 }).await);
        assert_eq!(blank["error"], "Query parameter is required");
    }

    #[tokio::test]
    async fn test_download_paper_uses_title() {
        let (upstream, pdf_host) = arxiv_upstream().await;
        let papers = TempDir::new().unwrap();
        let tool = DownloadPaperTool::new(context(&upstream, &papers.path().join("new")));

        let result = result_json(
            &tool
                .execute(DownloadParams {
                    arxiv_id: "https://arxiv.org/abs/1706.03762".into(),
                    rename: true,
                })
                .await,
        );
        assert_eq!(result["success"], true, "{result}");
        assert_eq!(result["filename"], "arxiv_1706.03762_Attention_Is_All_You_Need.pdf");
        assert!(papers.path().join("new").join("arxiv_1706.03762_Attention_Is_All_You_Need.pdf").exists());
        assert_eq!(upstream.requests()[0].query(), Some("id_list=1706.03762"));
        assert_eq!(pdf_host.last_request().unwrap().path(), "/pdf/1706.03762v7");
    }

    #[tokio::test]
    async fn test_rename_requires_target() {
        let (upstream, _pdf_host) = arxiv_upstream().await;
        let dir = TempDir::new().unwrap();
        let tool = RenamePapersTool::new(context(&upstream, dir.path()));

        let result = result_json(&tool.execute(RenameParams::default()).await);
        assert_eq!(
            result["error"],
            "Either (arxiv_id and file_path) or papers_dir must be specified"
        );
        assert!(upstream.requests().is_empty());
    }

    #[tokio::test]
    async fn test_rename_default_directory_copies() {
        let (upstream, _pdf_host) = arxiv_upstream().await;
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("1706.03762.pdf"), b"paper").unwrap();
        std::fs::write(dir.path().join("holiday.pdf"), b"x").unwrap();
        let tool = RenamePapersTool::new(context(&upstream, dir.path()));

        let result = result_json(
            &tool
                .execute(RenameParams {
                    papers_dir: Some("default".into()),
                    ..Default::default()
                })
                .await,
        );
        assert_eq!(result["renamed"], 1);
        assert_eq!(result["failed"], 0);
        assert!(dir.path().join("1706.03762.pdf").exists());
        assert!(dir.path().join("arxiv_1706.03762_Attention_Is_All_You_Need.pdf").exists());
    }
}
