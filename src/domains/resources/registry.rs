//! Resource Registry - central registration of all resources.
//!
//! When adding a new resource:
//! 1. Create the resource file in `definitions/`
//! 2. Export it in `definitions/mod.rs`
//! 3. Register it here

use rmcp::model::{AnnotateAble, RawResource, RawResourceTemplate, ResourceTemplate};

use super::definitions::{
    ArxivSchemaResource, PaperInfoTemplate, PapersResource, ResourceDefinition,
    ResourceTemplateDefinition,
};
use super::service::ResourceEntry;

fn build_resource<R: ResourceDefinition>() -> ResourceEntry {
    let mut raw = RawResource::new(R::URI, R::NAME);
    raw.description = Some(R::DESCRIPTION.to_string());
    raw.mime_type = Some(R::MIME_TYPE.to_string());

    ResourceEntry {
        resource: raw.no_annotation(),
        content: R::content(),
    }
}

fn build_template<T: ResourceTemplateDefinition>() -> ResourceTemplate {
    RawResourceTemplate {
        uri_template: T::URI_TEMPLATE.to_string(),
        name: T::NAME.to_string(),
        title: Some(T::TITLE.to_string()),
        description: Some(T::DESCRIPTION.to_string()),
        mime_type: Some(T::MIME_TYPE.to_string()),
    }
    .no_annotation()
}

/// Get all registered resources as ResourceEntries, in listing order.
pub fn get_all_resources() -> Vec<ResourceEntry> {
    vec![
        build_resource::<ArxivSchemaResource>(),
        build_resource::<PapersResource>(),
    ]
}

/// Get all registered resource templates.
pub fn get_all_resource_templates() -> Vec<ResourceTemplate> {
    vec![build_template::<PaperInfoTemplate>()]
}

/// Get the list of all resource URIs.
pub fn resource_uris() -> Vec<&'static str> {
    vec![ArxivSchemaResource::URI, PapersResource::URI]
}
