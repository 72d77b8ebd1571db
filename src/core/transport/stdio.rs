//! STDIO transport.
//!
//! The client spawns the server as a child process and exchanges
//! line-delimited JSON-RPC over its stdin/stdout. Logs go to stderr.

use rmcp::ServiceExt;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::info;

use super::{TransportError, TransportResult};
use crate::core::McpServer;

/// STDIO transport handler.
pub struct StdioTransport;

impl StdioTransport {
    /// Serve a single session on the process's stdin/stdout.
    pub async fn run(server: McpServer) -> TransportResult<()> {
        info!("Ready - MCP over stdin/stdout");
        let (stdin, stdout) = rmcp::transport::stdio();
        serve_io(server, stdin, stdout).await
    }
}

/// Serve one MCP session over a reader/writer pair until the client
/// closes its end.
pub async fn serve_io<R, W>(server: McpServer, reader: R, writer: W) -> TransportResult<()>
where
    R: AsyncRead + Send + Unpin + 'static,
    W: AsyncWrite + Send + Unpin + 'static,
{
    let running = server
        .serve((reader, writer))
        .await
        .map_err(|e| TransportError::init(e.to_string()))?;

    let reason = running
        .waiting()
        .await
        .map_err(|e| TransportError::ServiceError(e.to_string()))?;

    info!(?reason, "STDIO session finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{Config, Suite};
    use crate::test_support::{mcp_client_script, next_message};
    use std::time::Duration;
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

    #[tokio::test]
    async fn test_session_over_pipe_pair() {
        let mut config = Config::default();
        config.tools.suites = vec![Suite::Ufmr];

        let (client, server_end) = tokio::io::duplex(64 * 1024);
        let (server_read, server_write) = tokio::io::split(server_end);
        let session = tokio::spawn(serve_io(McpServer::new(config), server_read, server_write));

        let (client_read, mut client_write) = tokio::io::split(client);
        client_write
            .write_all(mcp_client_script().as_bytes())
            .await
            .unwrap();

        let mut lines = BufReader::new(client_read).lines();

        let initialized = next_message(&mut lines).await;
        assert_eq!(initialized["id"], 1);
        assert_eq!(initialized["result"]["serverInfo"]["name"], "api-toolbox");

        let tools = next_message(&mut lines).await;
        assert_eq!(tools["id"], 2);
        assert_eq!(tools["result"]["tools"][0]["name"], "about_tb");

        drop(client_write);
        drop(lines);
        let finished = tokio::time::timeout(Duration::from_secs(5), session)
            .await
            .unwrap()
            .unwrap();
        assert!(finished.is_ok());
    }
}
