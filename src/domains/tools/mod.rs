//! Tools domain module.
//!
//! Tools are the callable surface of the server. Each upstream API is
//! wrapped by a *suite* of tools under `definitions/`.
//!
//! ## Architecture
//!
//! - `definitions/` - Tool suites (one directory or file per upstream)
//! - `handlers.rs` - `ToolDefinition` (typed) and `ToolHandler` (dyn) traits
//! - `registry.rs` - Central tool registry and JSON-RPC dispatch
//! - `router.rs` - rmcp `ToolRouter` builder for STDIO/TCP transport
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Implement `ToolDefinition` for a unit or client-holding struct
//! 2. Register it in its suite's `register()` function
//!
//! Both the registry and the router pick it up from there.

pub mod definitions;
mod error;
mod handlers;
mod registry;
pub mod router;

pub use error::ToolError;
pub use handlers::{ToolDefinition, ToolHandler};
pub use registry::ToolRegistry;
pub use router::build_tool_router;
