//! Core module containing shared infrastructure components.
//!
//! This module provides the foundational building blocks for the MCP server:
//! configuration, error handling, the outbound HTTP helper, parameter
//! encoding, response formatting, the server itself and the transports.

pub mod config;
pub mod error;
pub mod fetch;
pub mod format;
pub mod params;
pub mod server;
pub mod transport;

pub use config::{Config, Suite};
pub use error::{Error, Result};
pub use fetch::{FetchError, HttpClient};
pub use format::format_value;
pub use params::QueryParams;
pub use server::McpServer;
pub use transport::{TransportConfig, TransportService};
