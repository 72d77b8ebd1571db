//! TCP transport.
//!
//! Every accepted connection gets its own rmcp session speaking
//! line-delimited JSON-RPC. Sessions share the server's tool registry.

use std::net::SocketAddr;
use std::time::Duration;

use rmcp::ServiceExt;
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, warn};

use super::{TransportError, TransportResult, config::TcpConfig};
use crate::core::McpServer;

/// Pause after a failed `accept` before trying again.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// TCP transport handler.
pub struct TcpTransport {
    config: TcpConfig,
}

impl TcpTransport {
    /// Create a new TCP transport with the given config.
    pub fn new(config: TcpConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Bind and serve connections until the process stops.
    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        let addr = self.address();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        info!("Ready - listening on {} (MCP over TCP)", addr);
        serve(listener, server).await
    }
}

/// Accept connections on `listener`, one spawned session each.
pub async fn serve(listener: TcpListener, server: McpServer) -> TransportResult<()> {
    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(connection) => connection,
            Err(e) => {
                warn!(error = %e, "Failed to accept connection");
                tokio::time::sleep(ACCEPT_BACKOFF).await;
                continue;
            }
        };

        if let Err(e) = stream.set_nodelay(true) {
            debug!(%peer, error = %e, "TCP_NODELAY not set");
        }
        tokio::spawn(session(server.clone(), stream, peer));
    }
}

async fn session(server: McpServer, stream: TcpStream, peer: SocketAddr) {
    let running = match server.serve(stream).await {
        Ok(running) => running,
        Err(e) => {
            warn!(%peer, error = %e, "MCP handshake failed");
            return;
        }
    };
    info!(%peer, "Client connected");

    match running.waiting().await {
        Ok(reason) => info!(%peer, ?reason, "Client disconnected"),
        Err(e) => warn!(%peer, error = %e, "Session task failed"),
    }
}
