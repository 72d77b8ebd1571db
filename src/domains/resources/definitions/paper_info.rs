//! Metadata of a single arXiv paper.

use super::ResourceTemplateDefinition;

pub struct PaperInfoTemplate;

impl ResourceTemplateDefinition for PaperInfoTemplate {
    const URI_TEMPLATE: &'static str = "arxiv://paper/{paper_id}";
    const NAME: &'static str = "arXiv Paper";
    const TITLE: &'static str = "arXiv Paper Metadata";
    const DESCRIPTION: &'static str =
        "Title, authors, summary, publication date, PDF link and categories of a paper";
    const MIME_TYPE: &'static str = "application/json";
}
