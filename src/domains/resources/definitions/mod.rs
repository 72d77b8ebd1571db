//! Resource definitions module.
//!
//! Each resource is defined in its own file with:
//! - URI and metadata
//! - Content provider
//!
//! ## Adding a New Resource
//!
//! 1. Create a new file (e.g., `my_resource.rs`)
//! 2. Implement `ResourceDefinition` (fixed URI) or
//!    `ResourceTemplateDefinition` (parameterised URI)
//! 3. Export it here
//! 4. Register in `registry.rs`

mod paper_info;
mod papers;
mod schema;

pub use paper_info::PaperInfoTemplate;
pub use papers::PapersResource;
pub use schema::ArxivSchemaResource;

use super::service::ResourceContent;

/// Trait for resources with a fixed URI.
pub trait ResourceDefinition {
    /// The unique URI of the resource.
    const URI: &'static str;

    /// The display name of the resource.
    const NAME: &'static str;

    /// A description of the resource.
    const DESCRIPTION: &'static str;

    /// The MIME type of the resource content.
    const MIME_TYPE: &'static str;

    /// Get the content for this resource.
    fn content() -> ResourceContent;
}

/// Trait for resources addressed by an RFC 6570 URI template with a single
/// trailing variable, such as `arxiv://paper/{paper_id}`.
pub trait ResourceTemplateDefinition {
    const URI_TEMPLATE: &'static str;
    const NAME: &'static str;
    const TITLE: &'static str;
    const DESCRIPTION: &'static str;
    const MIME_TYPE: &'static str;

    /// The literal part of the template before the variable.
    fn prefix() -> &'static str {
        Self::URI_TEMPLATE
            .split_once('{')
            .map(|(prefix, _)| prefix)
            .unwrap_or(Self::URI_TEMPLATE)
    }

    /// The variable's value when `uri` matches the template.
    fn capture(uri: &str) -> Option<&str> {
        uri.strip_prefix(Self::prefix())
    }
}
