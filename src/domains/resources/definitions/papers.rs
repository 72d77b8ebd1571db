//! Listing of downloaded papers.

use super::ResourceDefinition;
use crate::domains::resources::service::{DynamicResourceType, ResourceContent};

pub struct PapersResource;

impl ResourceDefinition for PapersResource {
    const URI: &'static str = "arxiv://papers";
    const NAME: &'static str = "Downloaded Papers";
    const DESCRIPTION: &'static str = "All PDF files in the papers folder";
    const MIME_TYPE: &'static str = "application/json";

    fn content() -> ResourceContent {
        ResourceContent::Dynamic(DynamicResourceType::PaperListing)
    }
}
