//! Filename conventions for arXiv papers on disk.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};
use serde::Serialize;

/// Longest title fragment kept in a generated filename.
pub const MAX_TITLE_CHARS: usize = 250;

static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[\\/*?:"<>|]"#).expect("valid filename pattern"));

static NEW_STYLE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{4}\.\d{4,5}v?\d*)").expect("valid id pattern"));

static OLD_STYLE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z-]+/\d{7}v?\d*)").expect("valid id pattern"));

static PAPER_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"arXiv_\d+\.\d+v?\d*",
        r"\d{4}\.\d{4,5}v?\d*",
        r"arxiv.*\d{4}\.\d{4,5}",
        r"\d{4}\.\d{4,5}\.pdf",
        r"[a-z-]+/\d{7}v?\d*",
        r"paper_\d{4}\.\d{4,5}v?\d*",
        r".*\d{4}\.\d{4,5}.*\.pdf",
    ]
    .iter()
    .map(|pattern| {
        RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .expect("valid paper pattern")
    })
    .collect()
});

/// Strip characters most filesystems reject, turn spaces into underscores
/// and cap the length.
pub fn sanitize_filename(title: &str) -> String {
    UNSAFE_CHARS
        .replace_all(title, "")
        .replace(' ', "_")
        .chars()
        .take(MAX_TITLE_CHARS)
        .collect()
}

/// First arXiv identifier found in `filename`, new style before old style.
pub fn extract_arxiv_id(filename: &str) -> Option<String> {
    NEW_STYLE_ID
        .captures(filename)
        .or_else(|| OLD_STYLE_ID.captures(filename))
        .map(|caps| caps[1].to_string())
}

pub fn is_arxiv_paper(filename: &str) -> bool {
    PAPER_PATTERNS.iter().any(|re| re.is_match(filename))
}

/// Drop an `arxiv.org/abs/` style prefix from a pasted identifier.
pub fn clean_id(id: &str) -> &str {
    let id = id.trim();
    if id.contains('/') && id.contains("arxiv.org") {
        id.rsplit('/').next().unwrap_or(id)
    } else {
        id
    }
}

/// `arxiv_{id}_{title}.pdf`
pub fn titled_filename(id: &str, title: &str) -> String {
    format!("arxiv_{}_{}.pdf", id.replace('/', "_"), sanitize_filename(title))
}

/// `arXiv_{id}.pdf`
pub fn plain_filename(id: &str) -> String {
    format!("arXiv_{}.pdf", id.replace('/', "_"))
}

fn is_pdf(name: &str) -> bool {
    name.to_lowercase().ends_with(".pdf")
}

pub fn is_pdf_path(path: &Path) -> bool {
    path.to_str().is_some_and(is_pdf)
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PdfEntry {
    pub filename: String,
    pub path: String,
}

/// PDF files directly inside `dir`, sorted by name.
pub fn list_pdfs(dir: &Path) -> std::io::Result<Vec<PdfEntry>> {
    let mut pdfs = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let filename = entry.file_name().to_string_lossy().into_owned();
        if is_pdf(&filename) {
            let path: PathBuf = dir.join(&filename);
            pdfs.push(PdfEntry {
                filename,
                path: path.display().to_string(),
            });
        }
    }
    pdfs.sort_by(|a, b| a.filename.cmp(&b.filename));
    Ok(pdfs)
}
