//! SSE transport implementation.
//!
//! `GET /sse` opens a push stream whose first event (`endpoint`) tells the
//! client where to post its messages: `/messages/?session_id=<id>`. Each
//! posted JSON-RPC message is acknowledged with `202 Accepted` and its
//! response is pushed on the session's stream as a `message` event.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::{
        IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
    routing::{get, post},
};
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio_stream::{Stream, StreamExt, wrappers::ReceiverStream};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::homepage::homepage;
use super::http::{cors_layer, health_check};
use super::jsonrpc::{JsonRpcRequest, JsonRpcResponse, dispatch};
use super::{TransportError, TransportResult, config::SseConfig};
use crate::core::McpServer;

/// Path of the push stream.
pub const SSE_PATH: &str = "/sse";

/// Path messages are posted to.
pub const MESSAGES_PATH: &str = "/messages/";

/// Responses buffered per session before the sender waits.
const SESSION_BUFFER: usize = 32;

type SessionMap = HashMap<Uuid, mpsc::Sender<JsonRpcResponse>>;

/// Open sessions, keyed by id. Each owns the sending half of its stream.
#[derive(Clone, Default)]
struct Sessions(Arc<Mutex<SessionMap>>);

impl Sessions {
    fn lock(&self) -> MutexGuard<'_, SessionMap> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn open(&self) -> (Uuid, mpsc::Receiver<JsonRpcResponse>, SessionGuard) {
        let id = Uuid::new_v4();
        let (tx, rx) = mpsc::channel(SESSION_BUFFER);
        self.lock().insert(id, tx);
        let guard = SessionGuard {
            id,
            sessions: self.clone(),
        };
        (id, rx, guard)
    }

    fn sender(&self, id: &Uuid) -> Option<mpsc::Sender<JsonRpcResponse>> {
        self.lock().get(id).cloned()
    }

    fn len(&self) -> usize {
        self.lock().len()
    }
}

/// Removes its session when the stream holding it is dropped.
struct SessionGuard {
    id: Uuid,
    sessions: Sessions,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.sessions.lock().remove(&self.id);
        info!(session = %self.id, "SSE session closed");
    }
}

#[derive(Clone)]
struct SseState {
    server: McpServer,
    sessions: Sessions,
}

#[derive(Debug, Deserialize)]
struct MessageQuery {
    session_id: Option<String>,
}

/// SSE transport handler.
pub struct SseTransport {
    config: SseConfig,
}

impl SseTransport {
    /// Create a new SSE transport with the given config.
    pub fn new(config: SseConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Build the axum router for this transport.
    pub fn router(&self, server: McpServer) -> Router {
        let state = SseState {
            server,
            sessions: Sessions::default(),
        };

        let app = Router::new()
            .route("/", get(homepage))
            .route("/health", get(health_check))
            .route(SSE_PATH, get(open_stream))
            .route(MESSAGES_PATH, post(post_message))
            .route("/messages", post(post_message))
            .with_state(state);

        if self.config.enable_cors {
            app.layer(cors_layer())
        } else {
            app
        }
    }

    /// Run the SSE transport.
    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        let addr = self.address();
        let app = self.router(server);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        info!("Ready - listening on {} (MCP over SSE)", addr);
        info!("  → Stream:   GET {}", SSE_PATH);
        info!("  → Messages: POST {}?session_id=<id>", MESSAGES_PATH);
        info!("  → Homepage: GET /");

        axum::serve(listener, app)
            .await
            .map_err(|e| TransportError::http(e.to_string()))?;

        Ok(())
    }
}

async fn open_stream(
    State(state): State<SseState>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let (id, rx, guard) = state.sessions.open();
    info!(session = %id, open = state.sessions.len(), "SSE session opened");

    let endpoint = Event::default()
        .event("endpoint")
        .data(format!("{MESSAGES_PATH}?session_id={}", id.simple()));

    // The guard moves into the closure, so the session lives exactly as long
    // as the stream.
    let messages = ReceiverStream::new(rx).map(move |response| {
        let _session = &guard;
        Event::default().event("message").json_data(response)
    });

    let stream = tokio_stream::once(Ok::<_, axum::Error>(endpoint)).chain(messages);
    Sse::new(stream).keep_alive(KeepAlive::default())
}

async fn post_message(
    State(state): State<SseState>,
    Query(query): Query<MessageQuery>,
    body: String,
) -> Response {
    let Some(raw_id) = query.session_id else {
        return (StatusCode::BAD_REQUEST, "session_id is required").into_response();
    };
    let Ok(id) = Uuid::parse_str(&raw_id) else {
        return (StatusCode::BAD_REQUEST, "Invalid session ID").into_response();
    };
    let Some(tx) = state.sessions.sender(&id) else {
        warn!(session = %id, "Message for unknown session");
        return (StatusCode::NOT_FOUND, "Could not find session").into_response();
    };
    let request: JsonRpcRequest = match serde_json::from_str(&body) {
        Ok(request) => request,
        Err(e) => {
            debug!(session = %id, error = %e, "Rejected malformed message");
            return (StatusCode::BAD_REQUEST, "Could not parse message").into_response();
        }
    };

    debug!(session = %id, method = %request.method, "Accepted message");
    let server = state.server.clone();
    tokio::spawn(async move {
        if let Some(response) = dispatch(&server, request).await {
            if tx.send(response).await.is_err() {
                debug!(session = %id, "Session closed before the response was pushed");
            }
        }
    });

    (StatusCode::ACCEPTED, "Accepted").into_response()
}
