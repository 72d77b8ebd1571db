//! Tool-specific error types.

use rmcp::ErrorData as McpError;
use thiserror::Error;

/// Errors that can occur during tool dispatch.
///
/// Upstream failures are not errors at this level: tools turn them into
/// their own failure text.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The requested tool was not found.
    #[error("Tool not found: {0}")]
    NotFound(String),

    /// Invalid arguments were provided to the tool.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The tool execution failed.
    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ToolError {
    /// Create a new "not found" error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Create a new "invalid arguments" error.
    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }

    /// Create a new "execution failed" error.
    pub fn execution_failed(msg: impl Into<String>) -> Self {
        Self::ExecutionFailed(msg.into())
    }

    /// Create a new "internal" error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Convert into the protocol error reported to the client.
    pub fn into_mcp_error(self) -> McpError {
        match self {
            Self::NotFound(_) | Self::InvalidArguments(_) => {
                McpError::invalid_params(self.to_string(), None)
            }
            Self::ExecutionFailed(_) | Self::Internal(_) => {
                McpError::internal_error(self.to_string(), None)
            }
        }
    }

    /// JSON-RPC error code for this error.
    pub fn code(&self) -> i32 {
        match self {
            Self::NotFound(_) | Self::InvalidArguments(_) => -32602,
            Self::ExecutionFailed(_) | Self::Internal(_) => -32603,
        }
    }
}
