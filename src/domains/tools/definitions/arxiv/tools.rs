use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, instrument, warn};

use crate::core::config::expand_home;
use crate::domains::tools::ToolDefinition;

use super::super::common::{json_result, non_blank};
use super::client::ArxivClient;
use super::files::{
    clean_id, extract_arxiv_id, is_arxiv_paper, is_pdf_path, list_pdfs, plain_filename,
    titled_filename,
};

/// Shared by every arXiv tool.
#[derive(Debug, Clone)]
pub struct ArxivContext {
    pub client: ArxivClient,
    pub papers_dir: PathBuf,
}

fn error_json(message: impl std::fmt::Display) -> CallToolResult {
    json_result(&json!({"error": message.to_string()}))
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct IsPaperParams {
    #[schemars(description = "Path to the file to check")]
    pub file_path: String,
}

/// `arxiv_is_paper`
pub struct IsPaperTool;

#[async_trait]
impl ToolDefinition for IsPaperTool {
    const NAME: &'static str = "arxiv_is_paper";
    const DESCRIPTION: &'static str = "Check if a specific file is an arXiv paper";
    type Params = IsPaperParams;

    async fn execute(&self, params: IsPaperParams) -> CallToolResult {
        let path = expand_home(&params.file_path);
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return json_result(&json!({"is_arxiv_paper": false, "reason": "File not found"}));
        }
        if !is_pdf_path(&path) {
            return json_result(&json!({"is_arxiv_paper": false, "reason": "Not a PDF file"}));
        }

        let filename = file_name(&path);
        if is_arxiv_paper(&filename) {
            json_result(&json!({"is_arxiv_paper": true, "arxiv_id": extract_arxiv_id(&filename)}))
        } else {
            json_result(&json!({
                "is_arxiv_paper": false,
                "reason": "No arXiv identifier detected in filename"
            }))
        }
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DetectDirectoryParams {
    #[schemars(description = "Directory to check for arXiv papers")]
    pub directory_path: String,
}

/// `arxiv_detect_directory`
pub struct DetectDirectoryTool;

#[async_trait]
impl ToolDefinition for DetectDirectoryTool {
    const NAME: &'static str = "arxiv_detect_directory";
    const DESCRIPTION: &'static str = "Detect arXiv papers in a directory";
    type Params = DetectDirectoryParams;

    async fn execute(&self, params: DetectDirectoryParams) -> CallToolResult {
        let dir = expand_home(&params.directory_path);
        let pdfs = match list_pdfs(&dir) {
            Ok(pdfs) => pdfs,
            Err(_) => {
                return json_result(&json!({
                    "contains_arxiv_papers": false,
                    "reason": "Not a valid directory"
                }));
            }
        };

        let papers: Vec<Value> = pdfs
            .iter()
            .filter(|pdf| is_arxiv_paper(&pdf.filename))
            .map(|pdf| {
                json!({
                    "filename": pdf.filename,
                    "path": pdf.path,
                    "arxiv_id": extract_arxiv_id(&pdf.filename),
                })
            })
            .collect();

        json_result(&json!({
            "contains_arxiv_papers": !papers.is_empty(),
            "arxiv_paper_count": papers.len(),
            "total_pdf_count": pdfs.len(),
            "recommended_tool": (!papers.is_empty()).then_some("arxiv_rename_papers"),
            "arxiv_papers": papers,
        }))
    }
}

fn default_max_results() -> u32 {
    10
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchParams {
    #[schemars(description = "The search query for scientific papers")]
    pub query: String,
    #[schemars(description = "Maximum number of papers to return (default: 10)")]
    #[serde(default = "default_max_results")]
    pub max_results: u32,
}

/// `arxiv_search_papers`
pub struct SearchPapersTool {
    ctx: Arc<ArxivContext>,
}

impl SearchPapersTool {
    pub fn new(ctx: Arc<ArxivContext>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl ToolDefinition for SearchPapersTool {
    const NAME: &'static str = "arxiv_search_papers";
    const DESCRIPTION: &'static str = "Search for scientific papers on arXiv.org";
    type Params = SearchParams;

    #[instrument(skip_all, name = "arxiv_search_papers", fields(query = %params.query))]
    async fn execute(&self, params: SearchParams) -> CallToolResult {
        if params.query.trim().is_empty() {
            return error_json("Query parameter is required");
        }
        match self.ctx.client.search(&params.query, params.max_results).await {
            Ok(papers) => {
                let results: Vec<_> = papers.iter().map(|p| p.preview()).collect();
                json_result(&json!({"results": results}))
            }
            Err(e) => {
                warn!(error = %e, "arXiv search failed");
                error_json(e)
            }
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DownloadParams {
    #[schemars(description = "The arXiv ID of the paper (e.g., 2101.12345)")]
    pub arxiv_id: String,
    #[schemars(description = "Whether to rename the paper based on its title (default: true)")]
    #[serde(default = "default_true")]
    pub rename: bool,
}

/// `arxiv_download_paper`
pub struct DownloadPaperTool {
    ctx: Arc<ArxivContext>,
}

impl DownloadPaperTool {
    pub fn new(ctx: Arc<ArxivContext>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl ToolDefinition for DownloadPaperTool {
    const NAME: &'static str = "arxiv_download_paper";
    const DESCRIPTION: &'static str = "Download a scientific paper from arXiv.org by its ID";
    type Params = DownloadParams;

    #[instrument(skip_all, name = "arxiv_download_paper", fields(id = %params.arxiv_id))]
    async fn execute(&self, params: DownloadParams) -> CallToolResult {
        let id = clean_id(&params.arxiv_id);
        if id.is_empty() {
            return error_json("arXiv ID is required");
        }

        let paper = match self.ctx.client.paper(id).await {
            Ok(paper) => paper,
            Err(e) => return error_json(e),
        };

        let filename = if params.rename {
            titled_filename(id, &paper.title)
        } else {
            plain_filename(id)
        };
        if let Err(e) = tokio::fs::create_dir_all(&self.ctx.papers_dir).await {
            return error_json(e);
        }
        let path = self.ctx.papers_dir.join(&filename);

        match self.ctx.client.download(&paper, &path).await {
            Ok(bytes) => {
                info!(path = %path.display(), bytes, "Paper downloaded");
                json_result(&json!({
                    "success": true,
                    "message": "Paper downloaded successfully",
                    "filename": filename,
                    "path": path.display().to_string(),
                    "title": paper.title,
                    "authors": paper.authors,
                    "categories": paper.categories,
                }))
            }
            Err(e) => error_json(e),
        }
    }
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct RenameParams {
    #[schemars(description = "Directory containing arXiv papers to rename, or \"default\"")]
    pub papers_dir: Option<String>,
    #[schemars(description = "Specific arXiv ID to rename (requires file_path)")]
    pub arxiv_id: Option<String>,
    #[schemars(description = "Path to the specific paper file to rename")]
    pub file_path: Option<String>,
}

/// `arxiv_rename_papers`
pub struct RenamePapersTool {
    ctx: Arc<ArxivContext>,
}

impl RenamePapersTool {
    pub fn new(ctx: Arc<ArxivContext>) -> Self {
        Self { ctx }
    }

    async fn rename_one(&self, id: &str, file: &Path) -> CallToolResult {
        info!("Renaming single file: {} with ID {}", file.display(), id);
        let id = clean_id(id);
        let paper = match self.ctx.client.paper(id).await {
            Ok(paper) => paper,
            Err(e) => return error_json(e),
        };

        let new_filename = titled_filename(id, &paper.title);
        let new_path = file.parent().unwrap_or(Path::new("")).join(&new_filename);
        if let Err(e) = tokio::fs::copy(file, &new_path).await {
            warn!(error = %e, "Error renaming single file");
            return error_json(e);
        }

        json_result(&json!({
            "success": true,
            "message": "Paper renamed successfully",
            "original_path": file.display().to_string(),
            "new_path": new_path.display().to_string(),
            "new_filename": new_filename,
        }))
    }

    async fn rename_dir(&self, dir: &Path) -> CallToolResult {
        let pdfs = match list_pdfs(dir) {
            Ok(pdfs) => pdfs,
            Err(_) => {
                return json_result(&json!({
                    "success": false,
                    "message": format!("Directory not found: {}", dir.display()),
                }));
            }
        };

        let mut renamed = Vec::new();
        let mut failed = 0usize;
        for pdf in pdfs.iter().filter(|pdf| is_arxiv_paper(&pdf.filename)) {
            let Some(id) = extract_arxiv_id(&pdf.filename) else {
                failed += 1;
                continue;
            };
            let paper = match self.ctx.client.paper(&id).await {
                Ok(paper) => paper,
                Err(e) => {
                    warn!(error = %e, file = %pdf.filename, "Lookup failed");
                    failed += 1;
                    continue;
                }
            };
            let new_filename = titled_filename(&id, &paper.title);
            match tokio::fs::copy(&pdf.path, dir.join(&new_filename)).await {
                Ok(_) => renamed.push(new_filename),
                Err(e) => {
                    warn!(error = %e, file = %pdf.filename, "Copy failed");
                    failed += 1;
                }
            }
        }

        json_result(&json!({
            "success": !renamed.is_empty(),
            "message": format!("Renamed {} papers, failed {}", renamed.len(), failed),
            "renamed": renamed.len(),
            "failed": failed,
            "renamed_papers": renamed,
        }))
    }
}

#[async_trait]
impl ToolDefinition for RenamePapersTool {
    const NAME: &'static str = "arxiv_rename_papers";
    const DESCRIPTION: &'static str = "Rename arXiv papers based on their titles. Originals are kept; the titled copy is written next to them.";
    type Params = RenameParams;

    async fn execute(&self, params: RenameParams) -> CallToolResult {
        if let (Some(id), Some(file)) = (non_blank(&params.arxiv_id), non_blank(&params.file_path)) {
            return self.rename_one(id, &expand_home(file)).await;
        }

        match non_blank(&params.papers_dir) {
            Some("default") => self.rename_dir(&self.ctx.papers_dir).await,
            Some(dir) => self.rename_dir(&expand_home(dir)).await,
            None => error_json("Either (arxiv_id and file_path) or papers_dir must be specified"),
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
