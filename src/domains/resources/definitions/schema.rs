//! Overview of the arXiv tools.

use super::ResourceDefinition;
use crate::domains::resources::service::ResourceContent;

pub struct ArxivSchemaResource;

const SCHEMA: &str = "\
The arXiv helper provides tools to manage arXiv papers:

1. DETECTING PAPERS:
   - arxiv_detect_directory: Check a directory for arXiv papers
   - arxiv_is_paper: Check if a specific file is an arXiv paper

2. ORGANIZING PAPERS:
   - arxiv_rename_papers: Rename arXiv papers based on their titles
   - arxiv://papers: List all downloaded papers

3. FINDING & DOWNLOADING PAPERS:
   - arxiv_search_papers: Search for papers on arXiv.org
   - arxiv_download_paper: Download a paper by its arXiv ID
";

impl ResourceDefinition for ArxivSchemaResource {
    const URI: &'static str = "arxiv://schema";
    const NAME: &'static str = "arXiv Helper Schema";
    const DESCRIPTION: &'static str = "Overview of the arXiv helper tools";
    const MIME_TYPE: &'static str = "text/plain";

    fn content() -> ResourceContent {
        ResourceContent::Text(SCHEMA.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_names_every_tool() {
        let ResourceContent::Text(text) = ArxivSchemaResource::content() else {
            panic!("schema is static text");
        };
        for tool in [
            "arxiv_detect_directory",
            "arxiv_is_paper",
            "arxiv_rename_papers",
            "arxiv_search_papers",
            "arxiv_download_paper",
        ] {
            assert!(text.contains(tool), "missing {tool}");
        }
    }
}
