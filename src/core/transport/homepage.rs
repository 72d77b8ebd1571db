//! Static landing page served by the SSE transport.

use axum::response::Html;

const PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>MCP Server</title>
  <style>
    body { font-family: system-ui, sans-serif; max-width: 800px; margin: 0 auto; padding: 20px; }
    h1 { margin-bottom: 10px; }
    button { background: #f8f8f8; border: 1px solid #ccc; border-radius: 4px; padding: 8px 16px; margin: 10px 4px 10px 0; cursor: pointer; }
    button:hover { background: #e8e8e8; }
    #status { border: 1px solid #ccc; border-radius: 4px; padding: 10px; min-height: 20px; margin-top: 10px; color: #555; }
  </style>
</head>
<body>
  <h1>MCP Server</h1>
  <p>Server is running correctly!</p>
  <button id="connect">Connect to SSE</button>
  <div id="status">Connection status will appear here...</div>
  <script>
    const status = document.getElementById('status');
    document.getElementById('connect').addEventListener('click', () => {
      let source;
      try {
        source = new EventSource('/sse');
      } catch (e) {
        status.textContent = 'Error: ' + e.message;
        return;
      }
      status.textContent = 'Connecting...';
      source.onopen = () => { status.textContent = 'Connected to SSE'; };
      source.onerror = () => { status.textContent = 'Error connecting to SSE'; source.close(); };
      source.addEventListener('endpoint', (event) => { status.textContent = 'Endpoint: ' + event.data; });
      source.onmessage = (event) => { status.textContent = 'Received: ' + event.data; };

      const disconnect = document.createElement('button');
      disconnect.textContent = 'Disconnect';
      disconnect.addEventListener('click', () => {
        source.close();
        status.textContent = 'Disconnected';
        disconnect.remove();
      });
      document.body.appendChild(disconnect);
    });
  </script>
</body>
</html>
"#;

/// `GET /`
pub async fn homepage() -> Html<&'static str> {
    Html(PAGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_homepage_offers_sse_connection() {
        let Html(page) = homepage().await;
        assert!(page.contains("<title>MCP Server</title>"));
        assert!(page.contains("Server is running correctly!"));
        assert!(page.contains("Connect to SSE"));
        assert!(page.contains("new EventSource('/sse')"));
        assert!(page.contains("Disconnect"));
    }
}
