mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::body::{Body, BodyDataStream};
use axum::http::{Request, StatusCode};
use common::*;
use ekilex_mcp::mcp::http::{router, HttpState};
use ekilex_mcp::mcp::McpServer;
use futures::StreamExt;
use serde_json::{json, Value};
use tower::ServiceExt;

fn state() -> HttpState {
    let client = client_with(Arc::new(MockTransport::with_data(json!([]))));
    HttpState::new(Arc::new(McpServer::new(Arc::new(client))))
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Reads SSE frames until one complete event has arrived.
async fn next_event(stream: &mut BodyDataStream) -> String {
    let mut buf = String::new();
    while !buf.contains("\n\n") {
        let chunk = tokio::time::timeout(Duration::from_secs(5), stream.next())
            .await
            .expect("timed out waiting for an SSE event")
            .expect("stream ended")
            .unwrap();
        buf.push_str(std::str::from_utf8(&chunk).unwrap());
    }
    buf
}

fn event_field<'a>(event: &'a str, name: &str) -> Option<&'a str> {
    event
        .lines()
        .find_map(|line| line.strip_prefix(name)?.strip_prefix(':'))
        .map(str::trim)
}

fn post_message(path: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health_reports_configuration() {
    let app = router(state());
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["transport"], "http");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["ekilex"]["baseUrl"], TEST_BASE_URL);
    assert_eq!(body["ekilex"]["configured"], true);
    assert_eq!(body["stats"]["total_requests"], 0);

    let timestamp = body["timestamp"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
}

#[tokio::test]
async fn test_root_describes_endpoints() {
    let app = router(state());
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["name"], "ekilex-mcp");
    assert_eq!(body["endpoints"]["sse"], "/sse");
}

#[tokio::test]
async fn test_message_requires_session_id() {
    let app = router(state());
    let response = app
        .oneshot(post_message("/message", r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_message_for_unknown_session_is_404() {
    let app = router(state());
    let response = app
        .oneshot(post_message(
            "/message?sessionId=does-not-exist",
            r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_sse_session_lifecycle() {
    let state = state();
    let app = router(state.clone());

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/sse").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(state.sessions().len(), 1);

    let mut events = response.into_body().into_data_stream();
    let endpoint = next_event(&mut events).await;
    assert_eq!(event_field(&endpoint, "event"), Some("endpoint"));

    let path = event_field(&endpoint, "data").unwrap().to_string();
    assert!(path.starts_with("/message?sessionId="));

    let response = app
        .clone()
        .oneshot(post_message(
            &path,
            r#"{"jsonrpc":"2.0","id":42,"method":"ping"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let message = next_event(&mut events).await;
    assert_eq!(event_field(&message, "event"), Some("message"));
    let data = event_field(&message, "data").unwrap();
    let reply: Value = serde_json::from_str(data).unwrap();
    assert_eq!(reply["id"], 42);
    assert_eq!(reply["result"], json!({}));

    // Notifications are accepted without producing an event.
    let response = app
        .clone()
        .oneshot(post_message(
            &path,
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    drop(events);
    assert!(state.sessions().is_empty());

    let response = app
        .oneshot(post_message(
            &path,
            r#"{"jsonrpc":"2.0","id":43,"method":"ping"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_sessions_are_independent() {
    let state = state();
    let app = router(state.clone());

    let first = app
        .clone()
        .oneshot(Request::builder().uri("/sse").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let second = app
        .oneshot(Request::builder().uri("/sse").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(state.sessions().len(), 2);

    let mut first_events = first.into_body().into_data_stream();
    let mut second_events = second.into_body().into_data_stream();
    let a = next_event(&mut first_events).await;
    let b = next_event(&mut second_events).await;
    assert_ne!(a, b);

    drop(first_events);
    assert_eq!(state.sessions().len(), 1);
}

#[tokio::test]
async fn test_message_is_acknowledged_before_the_tool_finishes() {
    let client = client_with_timeout(Arc::new(PendingTransport), 2_000);
    let state = HttpState::new(Arc::new(McpServer::new(Arc::new(client))));
    let app = router(state);

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/sse").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let mut events = response.into_body().into_data_stream();
    let endpoint = next_event(&mut events).await;
    let path = event_field(&endpoint, "data").unwrap().to_string();

    let call = r#"{"jsonrpc":"2.0","id":7,"method":"tools/call","params":{"name":"search_word","arguments":{"query":"tere"}}}"#;
    let response = tokio::time::timeout(Duration::from_secs(1), app.oneshot(post_message(&path, call)))
        .await
        .expect("POST /message waited for the tool call")
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let message = next_event(&mut events).await;
    let reply: Value = serde_json::from_str(event_field(&message, "data").unwrap()).unwrap();
    assert_eq!(reply["id"], 7);
    assert!(reply["result"]["content"][0]["text"]
        .as_str()
        .unwrap()
        .starts_with("Error [TIMEOUT]"));
}
