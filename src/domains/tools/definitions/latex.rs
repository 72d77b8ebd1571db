//! LaTeX to PDF conversion in a TeX Live container.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;
use tokio::process::Command;
use tracing::{debug, info, instrument};

use crate::core::config::{Config, expand_home};
use crate::domains::tools::{ToolDefinition, ToolRegistry};

use super::common::{error_result, non_blank, text_result};

pub const SUPPORTED_FORMATS: [&str; 8] =
    ["markdown", "html", "pdf", "docx", "rst", "latex", "epub", "txt"];

/// Runs the TeX engine over `file` inside `dir`.
#[async_trait]
pub trait TexCompiler: Send + Sync {
    async fn compile(&self, dir: &Path, file: &str) -> Result<(), String>;
}

/// `docker run --rm -v {dir}:/workdir {image} xelatex ...`
#[derive(Debug, Clone)]
pub struct DockerCompiler {
    pub image: String,
}

#[async_trait]
impl TexCompiler for DockerCompiler {
    async fn compile(&self, dir: &Path, file: &str) -> Result<(), String> {
        let volume = format!("{}:/workdir", dir.display());
        let target = format!("/workdir/{file}");
        debug!(image = %self.image, %volume, "Starting xelatex container");

        let output = Command::new("docker")
            .args(["run", "--rm", "-v", &volume, &self.image])
            .args(["xelatex", "-interaction=batchmode", &target])
            .current_dir(dir)
            .output()
            .await
            .map_err(|e| format!("failed to start docker: {e}"))?;

        if !output.status.success() {
            debug!(status = %output.status, "xelatex exited with failure");
        }
        Ok(())
    }
}

fn default_input_format() -> String {
    "latex".to_string()
}

fn default_output_format() -> String {
    "pdf".to_string()
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ConvertParams {
    #[schemars(description = "The content to be converted (required if input_file not provided)")]
    pub contents: Option<String>,
    #[schemars(
        description = "Complete path to input file including filename and extension (e.g., '/path/to/input.tex')"
    )]
    pub input_file: Option<String>,
    #[schemars(description = "Source format of the content (defaults to latex)")]
    #[serde(default = "default_input_format")]
    pub input_format: String,
    #[schemars(description = "Desired output format (defaults to pdf)")]
    #[serde(default = "default_output_format")]
    pub output_format: String,
    #[schemars(
        description = "Complete path where to save the output including filename and extension"
    )]
    pub output_file: Option<String>,
}

/// `convert-contents`
pub struct ConvertContentsTool {
    compiler: Arc<dyn TexCompiler>,
}

impl ConvertContentsTool {
    pub fn new(compiler: Arc<dyn TexCompiler>) -> Self {
        Self { compiler }
    }

    /// Source `.tex` path: the input file, or `contents` written next to the
    /// requested output.
    async fn source(&self, params: &ConvertParams) -> Result<PathBuf, String> {
        if let Some(input) = non_blank(&params.input_file) {
            let path = expand_home(input);
            if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
                return Err(format!("Input file not found: {input}"));
            }
            return Ok(path);
        }

        let contents = params.contents.as_deref().unwrap_or_default();
        let output = non_blank(&params.output_file)
            .ok_or("output_file is required when converting contents")?;
        let tex = expand_home(output).with_extension("tex");
        if let Some(parent) = tex.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| e.to_string())?;
        }
        tokio::fs::write(&tex, contents)
            .await
            .map_err(|e| e.to_string())?;
        Ok(tex)
    }

    async fn convert(&self, params: &ConvertParams) -> Result<PathBuf, String> {
        let tex = self.source(params).await?;
        let tex = tokio::fs::canonicalize(&tex).await.map_err(|e| e.to_string())?;
        let dir = tex.parent().ok_or("input file has no parent directory")?;
        let file = tex
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .ok_or("input path has no file name")?;

        self.compiler.compile(dir, &file).await?;

        let pdf = tex.with_extension("pdf");
        if tokio::fs::try_exists(&pdf).await.unwrap_or(false) {
            Ok(pdf)
        } else {
            Err("conversion produced no PDF".to_string())
        }
    }
}

#[async_trait]
impl ToolDefinition for ConvertContentsTool {
    const NAME: &'static str = "convert-contents";
    const DESCRIPTION: &'static str = "Converts files from latex to pdf. Transforms input content from any supported format into the specified output format.";
    type Params = ConvertParams;

    #[instrument(skip_all, name = "convert-contents")]
    async fn execute(&self, params: ConvertParams) -> CallToolResult {
        if non_blank(&params.contents).is_none() && non_blank(&params.input_file).is_none() {
            return error_result("Either 'contents' or 'input_file' must be provided");
        }
        let input_format = params.input_format.to_lowercase();
        let output_format = params.output_format.to_lowercase();
        for format in [&input_format, &output_format] {
            if !SUPPORTED_FORMATS.contains(&format.as_str()) {
                return error_result(&format!(
                    "Unsupported format: '{format}'. Supported formats are: {}",
                    SUPPORTED_FORMATS.join(", ")
                ));
            }
        }

        match self.convert(&params).await {
            Ok(pdf) => {
                info!(pdf = %pdf.display(), "Conversion finished");
                text_result(format!(
                    "File successfully converted and saved to: {}",
                    pdf.display()
                ))
            }
            Err(e) => {
                let what = if non_blank(&params.input_file).is_some() { "file" } else { "contents" };
                error_result(&format!(
                    "Error converting {what} from {input_format} to {output_format}: {e}"
                ))
            }
        }
    }
}

pub fn register(registry: &mut ToolRegistry, config: &Config) {
    let compiler = DockerCompiler {
        image: config.tools.latex_image.clone(),
    };
    registry.register(ConvertContentsTool::new(Arc::new(compiler)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::result_text;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Writes an empty PDF next to the source, like a successful run.
    #[derive(Default)]
    struct FakeCompiler {
        calls: Mutex<Vec<(PathBuf, String)>>,
        produce: bool,
    }

    #[async_trait]
    impl TexCompiler for FakeCompiler {
        async fn compile(&self, dir: &Path, file: &str) -> Result<(), String> {
            self.calls.lock().unwrap().push((dir.to_path_buf(), file.to_string()));
            if self.produce {
                let pdf = dir.join(file).with_extension("pdf");
                std::fs::write(pdf, b"%PDF").map_err(|e| e.to_string())?;
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_contents_written_as_tex() {
        let dir = TempDir::new().unwrap();
        let compiler = Arc::new(FakeCompiler { produce: true, ..Default::default() });
        let tool = ConvertContentsTool::new(compiler.clone());

        let result = tool
            .execute(ConvertParams {
                contents: Some("\\documentclass{article}".into()),
                output_file: Some(dir.path().join("out/report.pdf").display().to_string()),
                input_format: "latex".into(),
                output_format: "PDF".into(),
                ..Default::default()
            })
            .await;

        assert_eq!(result.is_error, Some(false));
        let tex = dir.path().join("out/report.tex");
        assert_eq!(std::fs::read_to_string(&tex).unwrap(), "\\documentclass{article}");
        assert!(result_text(&result).ends_with("report.pdf"));
        assert_eq!(compiler.calls.lock().unwrap()[0].1, "report.tex");
    }

    #[tokio::test]
    async fn test_requires_input() {
        let tool = ConvertContentsTool::new(Arc::new(FakeCompiler::default()));
        let result = tool
            .execute(ConvertParams {
                input_format: "latex".into(),
                output_format: "pdf".into(),
                ..Default::default()
            })
            .await;
        assert_eq!(result.is_error, Some(true));
        assert_eq!(
            result_text(&result),
            "Either 'contents' or 'input_file' must be provided"
        );
    }

    #[tokio::test]
    async fn test_unsupported_format() {
        let tool = ConvertContentsTool::new(Arc::new(FakeCompiler::default()));
        let result = tool
            .execute(ConvertParams {
                contents: Some("x".into()),
                input_format: "latex".into(),
                output_format: "odt".into(),
                ..Default::default()
            })
            .await;
        assert_eq!(result.is_error, Some(true));
        assert!(result_text(&result).starts_with("Unsupported format: 'odt'"));
    }

    #[tokio::test]
    async fn test_missing_input_file_and_failed_run() {
        let dir = TempDir::new().unwrap();
        let tool = ConvertContentsTool::new(Arc::new(FakeCompiler::default()));

        let missing = tool
            .execute(ConvertParams {
                input_file: Some(dir.path().join("none.tex").display().to_string()),
                input_format: "latex".into(),
                output_format: "pdf".into(),
                ..Default::default()
            })
            .await;
        assert!(result_text(&missing).contains("Input file not found"));

        let tex = dir.path().join("paper.tex");
        std::fs::write(&tex, "x").unwrap();
        let failed = tool
            .execute(ConvertParams {
                input_file: Some(tex.display().to_string()),
                input_format: "latex".into(),
                output_format: "pdf".into(),
                ..Default::default()
            })
            .await;
        assert_eq!(
            result_text(&failed),
            "Error converting file from latex to pdf: conversion produced no PDF"
        );
    }
}
