//! HTTP shell: MCP over server-sent events.
//!
//! A client opens `GET /sse` and receives an `endpoint` event naming the URL
//! it must POST its JSON-RPC messages to. Responses come back on the event
//! stream as `message` events. Every SSE connection is its own session, keyed
//! by a random UUID; the session disappears when the stream is dropped.

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{Query, State},
    http::{Request, StatusCode},
    middleware::{self, Next},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    routing::{get, post},
    Json, Router,
};
use futures::stream::{self, Stream, StreamExt};
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::errors::Result;

use super::server::{McpServer, SERVER_NAME};
use super::transport::JsonRpcResponse;

type SessionSender = mpsc::UnboundedSender<JsonRpcResponse>;

/// Open SSE sessions.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<String, SessionSender>>,
}

impl SessionRegistry {
    /// Registers a new session and returns its id with the receiving end of
    /// its outbound queue.
    pub fn open(&self) -> (String, mpsc::UnboundedReceiver<JsonRpcResponse>) {
        let id = Uuid::new_v4().to_string();
        let (tx, rx) = mpsc::unbounded_channel();
        if let Ok(mut sessions) = self.sessions.lock() {
            sessions.insert(id.clone(), tx);
        }
        (id, rx)
    }

    pub fn sender(&self, id: &str) -> Option<SessionSender> {
        self.sessions.lock().ok()?.get(id).cloned()
    }

    pub fn close(&self, id: &str) {
        if let Ok(mut sessions) = self.sessions.lock() {
            sessions.remove(id);
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Removes its session from the registry when the event stream goes away.
struct SessionGuard {
    id: String,
    registry: Arc<SessionRegistry>,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.registry.close(&self.id);
        info!(session = %self.id, "SSE session closed");
    }
}

#[derive(Clone)]
pub struct HttpState {
    server: Arc<McpServer>,
    sessions: Arc<SessionRegistry>,
}

impl HttpState {
    pub fn new(server: Arc<McpServer>) -> Self {
        Self {
            server,
            sessions: Arc::new(SessionRegistry::default()),
        }
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }
}

#[derive(Debug, Deserialize)]
struct MessageQuery {
    #[serde(rename = "sessionId")]
    session_id: Option<String>,
}

pub fn router(state: HttpState) -> Router {
    Router::new()
        .route("/", get(info_handler))
        .route("/health", get(health_handler))
        .route("/sse", get(sse_handler))
        .route("/message", post(message_handler))
        .layer(middleware::from_fn(log_requests))
        .with_state(state)
}

/// Binds `host:port` from `config` and serves until Ctrl+C or a listener failure.
pub async fn serve(server: Arc<McpServer>, config: &Config) -> Result<()> {
    let listener = TcpListener::bind((config.http_host.as_str(), config.http_port)).await?;
    info!(
        "MCP server listening on http://{}:{}",
        config.http_host, config.http_port
    );
    info!("  SSE endpoint:     GET  /sse");
    info!("  Message endpoint: POST /message?sessionId=<id>");
    info!("  Health check:     GET  /health");

    axum::serve(listener, router(HttpState::new(server)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, shutting down"),
        Err(e) => warn!("failed to listen for Ctrl+C: {}", e),
    }
}

async fn sse_handler(
    State(state): State<HttpState>,
) -> Sse<impl Stream<Item = std::result::Result<Event, Infallible>>> {
    let (id, rx) = state.sessions.open();
    info!(session = %id, "SSE session opened");

    let endpoint = Event::default()
        .event("endpoint")
        .data(format!("/message?sessionId={}", id));

    let guard = SessionGuard {
        id,
        registry: state.sessions.clone(),
    };

    let messages = stream::unfold((rx, guard), |(mut rx, guard)| async move {
        let response = rx.recv().await?;
        let event = match serde_json::to_string(&response) {
            Ok(data) => Event::default().event("message").data(data),
            Err(e) => {
                warn!(session = %guard.id, "failed to serialize response: {}", e);
                Event::default().comment("serialization failure")
            }
        };
        Some((event, (rx, guard)))
    });

    let events = stream::once(async move { endpoint })
        .chain(messages)
        .map(Ok::<_, Infallible>);

    Sse::new(events).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}

async fn message_handler(
    State(state): State<HttpState>,
    Query(query): Query<MessageQuery>,
    body: String,
) -> Response {
    let Some(session_id) = query.session_id.filter(|s| !s.is_empty()) else {
        return (StatusCode::BAD_REQUEST, "Missing sessionId query parameter").into_response();
    };

    let Some(sender) = state.sessions.sender(&session_id) else {
        return (StatusCode::NOT_FOUND, "Unknown session").into_response();
    };

    // The reply travels on the event stream, so acknowledge before dispatching.
    let server = state.server.clone();
    tokio::spawn(async move {
        if let Some(response) = server.handle_message(&body).await {
            if sender.send(response).is_err() {
                debug!(session = %session_id, "session closed before response was delivered");
            }
        }
    });

    (StatusCode::ACCEPTED, "Accepted").into_response()
}

async fn health_handler(State(state): State<HttpState>) -> Json<serde_json::Value> {
    let client = state.server.client();
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "transport": "http",
        "ekilex": {
            "baseUrl": client.base_url(),
            "configured": client.is_configured(),
        },
        "sessions": state.sessions.len(),
        "stats": state.server.server_stats_json(),
    }))
}

async fn info_handler() -> Json<serde_json::Value> {
    Json(json!({
        "name": SERVER_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "description": "MCP server for the Ekilex Estonian dictionary API",
        "endpoints": {
            "sse": "/sse",
            "message": "/message?sessionId=<id>",
            "health": "/health",
        },
    }))
}

async fn log_requests(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    info!(">>> {} {}", method, path);
    let response = next.run(request).await;
    info!(
        "<<< {} {} {} ({}ms)",
        method,
        path,
        response.status().as_u16(),
        start.elapsed().as_millis()
    );

    response
}
