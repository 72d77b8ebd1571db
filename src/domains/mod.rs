//! Domains module containing business logic organized by bounded contexts.
//!
//! - `tools`: the tool suites and their registry
//! - `resources`: readable arXiv resources
//! - `prompts`: arXiv prompt templates

pub mod prompts;
pub mod resources;
pub mod tools;
