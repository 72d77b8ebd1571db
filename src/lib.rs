//! API Toolbox MCP Server Library
//!
//! A Model Context Protocol (MCP) server that exposes thin wrappers over
//! public REST APIs as tools, plus a few local-state tools (inventory CSV,
//! memory store, LaTeX rendering) and arXiv resources and prompts.
//!
//! # Architecture
//!
//! - **core**: configuration, errors, the outbound HTTP helper
//!   ([`core::HttpClient`]), query encoding, response formatting, the
//!   server and its transports
//! - **domains**: business logic organized by bounded contexts
//!   - **tools**: one module per tool suite, registered by [`core::Suite`]
//!   - **resources**: arXiv resources and the paper template
//!   - **prompts**: arXiv prompt templates
//!
//! # Example
//!
//! ```rust,no_run
//! use api_toolbox_mcp_server::core::{Config, McpServer, Suite, TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut config = Config::from_env();
//!     config.tools.suites = vec![Suite::Geo, Suite::Arxiv];
//!     let server = McpServer::new(config.clone());
//!     TransportService::new(config.transport).run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

#[cfg(test)]
mod test_support;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
