//! In-process upstream server used by the fetch and tool-suite tests.
//!
//! Every request is recorded and answered by a closure, so a test can
//! assert on both what a tool sent and how it reacts to what it got back.
//! The MCP client helpers at the bottom drive the line-delimited transports.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};
use tokio::io::{AsyncBufRead, Lines};

/// A request as seen by the mock upstream.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub uri: String,
    pub headers: HeaderMap,
    pub body: String,
}

impl RecordedRequest {
    pub fn path(&self) -> &str {
        self.uri.split('?').next().unwrap_or(&self.uri)
    }

    pub fn query(&self) -> Option<&str> {
        self.uri.split_once('?').map(|(_, query)| query)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn json_body(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or(Value::Null)
    }
}

/// What the mock answers with.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: StatusCode,
    pub body: String,
    pub content_type: &'static str,
    pub delay: Option<Duration>,
    pub set_cookie: Option<String>,
}

impl MockResponse {
    pub fn json(value: Value) -> Self {
        Self {
            status: StatusCode::OK,
            body: value.to_string(),
            content_type: "application/json",
            delay: None,
            set_cookie: None,
        }
    }

    pub fn text(body: &str) -> Self {
        Self {
            status: StatusCode::OK,
            body: body.to_string(),
            content_type: "text/plain",
            delay: None,
            set_cookie: None,
        }
    }

    pub fn status(code: u16) -> Self {
        Self {
            status: StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            body: format!("{{\"detail\":\"status {code}\"}}"),
            content_type: "application/json",
            delay: None,
            set_cookie: None,
        }
    }

    pub fn with_status(mut self, code: u16) -> Self {
        self.status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_cookie(mut self, cookie: &str) -> Self {
        self.set_cookie = Some(cookie.to_string());
        self
    }
}

type Responder = Arc<dyn Fn(&RecordedRequest) -> MockResponse + Send + Sync>;

#[derive(Clone)]
struct MockState {
    responder: Responder,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// A running mock upstream bound to an ephemeral local port.
pub struct MockUpstream {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockUpstream {
    pub async fn start<F>(responder: F) -> Self
    where
        F: Fn(&RecordedRequest) -> MockResponse + Send + Sync + 'static,
    {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            responder: Arc::new(responder),
            requests: requests.clone(),
        };
        let app = Router::new().fallback(handle).with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock upstream");
        let addr = listener.local_addr().expect("mock upstream address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self {
            base_url: format!("http://{addr}"),
            requests,
        }
    }

    /// Answer every request with the same JSON body.
    pub async fn json(value: Value) -> Self {
        Self::start(move |_| MockResponse::json(value.clone())).await
    }

    /// Answer every request with the same status code.
    pub async fn failing(code: u16) -> Self {
        Self::start(move |_| MockResponse::status(code)).await
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("mock request log").clone()
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests().pop()
    }
}

async fn handle(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request = RecordedRequest {
        method,
        uri: uri.to_string(),
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    };
    let reply = (state.responder)(&request);
    state
        .requests
        .lock()
        .expect("mock request log")
        .push(request);

    if let Some(delay) = reply.delay {
        tokio::time::sleep(delay).await;
    }

    let mut response = (
        reply.status,
        [(header::CONTENT_TYPE, reply.content_type)],
        reply.body,
    )
        .into_response();
    if let Some(value) = reply
        .set_cookie
        .and_then(|cookie| HeaderValue::from_str(&cookie).ok())
    {
        response.headers_mut().append(header::SET_COOKIE, value);
    }
    response
}

/// Text of the first content block of a tool result.
pub fn result_text(result: &rmcp::model::CallToolResult) -> String {
    match result.content.first().map(|c| &c.raw) {
        Some(rmcp::model::RawContent::Text(text)) => text.text.clone(),
        _ => panic!("expected text content, got {:?}", result.content),
    }
}

/// First content block parsed as JSON.
pub fn result_json(result: &rmcp::model::CallToolResult) -> Value {
    let text = result_text(result);
    serde_json::from_str(&text).unwrap_or_else(|e| panic!("not JSON ({e}): {text}"))
}

/// What a client writes to open an MCP session and list the tools: the
/// `initialize` request (id 1), the `initialized` notification and a
/// `tools/list` request (id 2), one message per line.
pub fn mcp_client_script() -> String {
    [
        json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "initialize",
            "params": {
                "protocolVersion": "2024-11-05",
                "capabilities": {},
                "clientInfo": {"name": "test-client", "version": "0.1.0"}
            }
        }),
        json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
        json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}),
    ]
    .iter()
    .map(|message| format!("{message}\n"))
    .collect()
}

/// Next line-delimited message from the server, failing after 5 s.
pub async fn next_message<R: AsyncBufRead + Unpin>(lines: &mut Lines<R>) -> Value {
    let line = tokio::time::timeout(Duration::from_secs(5), lines.next_line())
        .await
        .expect("server answered in time")
        .expect("readable stream")
        .expect("stream still open");
    serde_json::from_str(&line).unwrap_or_else(|e| panic!("not JSON ({e}): {line}"))
}
