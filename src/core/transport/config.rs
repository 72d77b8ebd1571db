//! Transport configuration types.

use serde::{Deserialize, Serialize};

/// Transport configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransportConfig {
    /// Standard input/output transport (default for MCP).
    #[cfg(feature = "stdio")]
    Stdio,

    /// TCP socket transport with JSON-RPC messages.
    #[cfg(feature = "tcp")]
    Tcp(TcpConfig),

    /// HTTP transport with JSON-RPC over POST.
    #[cfg(feature = "http")]
    Http(HttpConfig),

    /// Server-sent events push stream with a POST inbox per session.
    #[cfg(feature = "sse")]
    Sse(SseConfig),
}

/// TCP transport configuration.
#[cfg(feature = "tcp")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TcpConfig {
    /// Port number to listen on.
    pub port: u16,

    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: String,
}

/// HTTP transport configuration.
#[cfg(feature = "http")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Port number to listen on.
    pub port: u16,

    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Path for JSON-RPC endpoint.
    #[serde(default = "default_rpc_path")]
    pub rpc_path: String,

    /// Enable CORS for browser clients.
    #[serde(default = "default_cors")]
    pub enable_cors: bool,
}

/// SSE transport configuration.
#[cfg(feature = "sse")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SseConfig {
    /// Port number to listen on.
    pub port: u16,

    /// Host address to bind to.
    #[serde(default = "default_sse_host")]
    pub host: String,

    /// Enable CORS so the homepage can be served from elsewhere.
    #[serde(default = "default_cors")]
    pub enable_cors: bool,
}

#[cfg(any(feature = "tcp", feature = "http"))]
fn default_host() -> String {
    "127.0.0.1".to_string()
}

#[cfg(feature = "sse")]
fn default_sse_host() -> String {
    "0.0.0.0".to_string()
}

#[cfg(feature = "http")]
fn default_rpc_path() -> String {
    "/mcp".to_string()
}

#[cfg(feature = "http")]
fn default_cors() -> bool {
    true
}

impl Default for TransportConfig {
    fn default() -> Self {
        #[cfg(feature = "stdio")]
        {
            return Self::Stdio;
        }

        #[cfg(all(not(feature = "stdio"), feature = "sse"))]
        {
            return Self::Sse(SseConfig::default());
        }

        #[cfg(all(not(feature = "stdio"), not(feature = "sse"), feature = "tcp"))]
        {
            return Self::Tcp(TcpConfig::default());
        }

        #[cfg(all(
            not(feature = "stdio"),
            not(feature = "sse"),
            not(feature = "tcp"),
            feature = "http"
        ))]
        {
            return Self::Http(HttpConfig::default());
        }

        #[cfg(not(any(feature = "stdio", feature = "tcp", feature = "http")))]
        {
            compile_error!("At least one transport feature must be enabled: stdio, tcp, http or sse");
        }
    }
}

#[cfg(feature = "tcp")]
impl Default for TcpConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: default_host(),
        }
    }
}

#[cfg(feature = "http")]
impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: default_host(),
            rpc_path: default_rpc_path(),
            enable_cors: default_cors(),
        }
    }
}

#[cfg(feature = "sse")]
impl Default for SseConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: default_sse_host(),
            enable_cors: default_cors(),
        }
    }
}

#[cfg(any(feature = "tcp", feature = "http"))]
fn env_port(var: &str, default: u16) -> u16 {
    std::env::var(var)
        .ok()
        .and_then(|p| p.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(feature = "http")]
fn env_flag(var: &str, default: bool) -> bool {
    std::env::var(var)
        .map(|v| {
            let v = v.trim().to_lowercase();
            v != "false" && v != "0"
        })
        .unwrap_or(default)
}

impl TransportConfig {
    /// Create a STDIO transport config.
    #[cfg(feature = "stdio")]
    pub fn stdio() -> Self {
        Self::Stdio
    }

    /// Create a TCP transport config.
    #[cfg(feature = "tcp")]
    pub fn tcp(port: u16, host: impl Into<String>) -> Self {
        Self::Tcp(TcpConfig {
            port,
            host: host.into(),
        })
    }

    /// Create an HTTP transport config.
    #[cfg(feature = "http")]
    pub fn http(port: u16, host: impl Into<String>) -> Self {
        Self::Http(HttpConfig {
            port,
            host: host.into(),
            ..Default::default()
        })
    }

    /// Create an SSE transport config.
    #[cfg(feature = "sse")]
    pub fn sse(port: u16, host: impl Into<String>) -> Self {
        Self::Sse(SseConfig {
            port,
            host: host.into(),
            ..Default::default()
        })
    }

    /// Transport names compiled into this binary.
    pub fn available() -> Vec<&'static str> {
        let mut names = Vec::new();
        if cfg!(feature = "stdio") {
            names.push("stdio");
        }
        if cfg!(feature = "tcp") {
            names.push("tcp");
        }
        if cfg!(feature = "http") {
            names.push("http");
        }
        if cfg!(feature = "sse") {
            names.push("sse");
        }
        names
    }

    /// Build the config for a transport by name, reading its host, port
    /// and options from the environment. `None` when the name is unknown
    /// or the transport is not compiled in.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            #[cfg(feature = "stdio")]
            "stdio" => Some(Self::Stdio),
            #[cfg(feature = "tcp")]
            "tcp" => {
                let port = env_port("MCP_TCP_PORT", 3000);
                let host = std::env::var("MCP_TCP_HOST").unwrap_or_else(|_| default_host());
                Some(Self::Tcp(TcpConfig { port, host }))
            }
            #[cfg(feature = "http")]
            "http" => {
                let port = env_port("MCP_HTTP_PORT", 8080);
                let host = std::env::var("MCP_HTTP_HOST").unwrap_or_else(|_| default_host());
                let rpc_path =
                    std::env::var("MCP_HTTP_PATH").unwrap_or_else(|_| default_rpc_path());
                let enable_cors = env_flag("MCP_HTTP_CORS", true);
                Some(Self::Http(HttpConfig {
                    port,
                    host,
                    rpc_path,
                    enable_cors,
                }))
            }
            #[cfg(feature = "sse")]
            "sse" => {
                let port = env_port("MCP_SSE_PORT", 8080);
                let host = std::env::var("MCP_SSE_HOST").unwrap_or_else(|_| default_sse_host());
                let enable_cors = env_flag("MCP_SSE_CORS", true);
                Some(Self::Sse(SseConfig {
                    port,
                    host,
                    enable_cors,
                }))
            }
            _ => None,
        }
    }

    /// Load transport config from environment variables.
    ///
    /// An unset or unknown `MCP_TRANSPORT` falls back to the default.
    pub fn from_env() -> Self {
        std::env::var("MCP_TRANSPORT")
            .ok()
            .and_then(|name| Self::from_name(&name))
            .unwrap_or_default()
    }

    /// Replace the bind host, where the transport has one.
    pub fn set_host(&mut self, new_host: String) {
        match self {
            #[cfg(feature = "stdio")]
            Self::Stdio => {}
            #[cfg(feature = "tcp")]
            Self::Tcp(cfg) => cfg.host = new_host,
            #[cfg(feature = "http")]
            Self::Http(cfg) => cfg.host = new_host,
            #[cfg(feature = "sse")]
            Self::Sse(cfg) => cfg.host = new_host,
        }
    }

    /// Replace the bind port, where the transport has one.
    pub fn set_port(&mut self, new_port: u16) {
        match self {
            #[cfg(feature = "stdio")]
            Self::Stdio => {}
            #[cfg(feature = "tcp")]
            Self::Tcp(cfg) => cfg.port = new_port,
            #[cfg(feature = "http")]
            Self::Http(cfg) => cfg.port = new_port,
            #[cfg(feature = "sse")]
            Self::Sse(cfg) => cfg.port = new_port,
        }
    }

    /// Get a description of this transport for logging.
    pub fn description(&self) -> String {
        match self {
            #[cfg(feature = "stdio")]
            Self::Stdio => "STDIO (standard MCP mode)".to_string(),
            #[cfg(feature = "tcp")]
            Self::Tcp(cfg) => format!("TCP on {}:{}", cfg.host, cfg.port),
            #[cfg(feature = "http")]
            Self::Http(cfg) => format!("HTTP on {}:{}{}", cfg.host, cfg.port, cfg.rpc_path),
            #[cfg(feature = "sse")]
            Self::Sse(cfg) => format!("SSE on {}:{}/sse", cfg.host, cfg.port),
        }
    }

    /// Check if this transport is the standard STDIO mode.
    pub fn is_stdio(&self) -> bool {
        #[cfg(feature = "stdio")]
        {
            matches!(self, Self::Stdio)
        }
        #[cfg(not(feature = "stdio"))]
        {
            false
        }
    }
}
