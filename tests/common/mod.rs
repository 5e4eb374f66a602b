#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use ekilex_mcp::api::{
    ClientOptions, EkilexClient, HttpRequest, HttpResponse, HttpTransport, TransportError,
};

pub const TEST_API_KEY: &str = "test-key";
pub const TEST_BASE_URL: &str = "https://ekilex.test";

type Reply = Result<HttpResponse, TransportError>;

/// Transport that records every request and answers from a table of
/// URL-substring routes, falling back to a default reply.
pub struct MockTransport {
    routes: Vec<(String, Reply)>,
    fallback: Reply,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new(fallback: Reply) -> Self {
        Self {
            routes: Vec::new(),
            fallback,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Every request gets a `200` with `{success: true, data}`.
    pub fn with_data(data: Value) -> Self {
        Self::new(Ok(envelope(data)))
    }

    pub fn route(mut self, url_fragment: &str, reply: Reply) -> Self {
        self.routes.push((url_fragment.to_string(), reply));
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_url(&self) -> String {
        self.requests()
            .last()
            .map(|r| r.url.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn get(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let reply = self
            .routes
            .iter()
            .find(|(fragment, _)| request.url.contains(fragment.as_str()))
            .map(|(_, reply)| reply.clone())
            .unwrap_or_else(|| self.fallback.clone());
        self.requests.lock().unwrap().push(request);
        reply
    }
}

/// Transport whose requests never complete.
pub struct PendingTransport;

#[async_trait]
impl HttpTransport for PendingTransport {
    async fn get(&self, _request: HttpRequest) -> Result<HttpResponse, TransportError> {
        std::future::pending().await
    }
}

pub fn envelope(data: Value) -> HttpResponse {
    HttpResponse::json(json!({ "success": true, "data": data }).to_string())
}

pub fn client_with(transport: Arc<dyn HttpTransport>) -> EkilexClient {
    client_with_timeout(transport, 30_000)
}

pub fn client_with_timeout(transport: Arc<dyn HttpTransport>, timeout_ms: u64) -> EkilexClient {
    EkilexClient::new(ClientOptions {
        api_key: TEST_API_KEY.to_string(),
        base_url: TEST_BASE_URL.to_string(),
        timeout_ms,
        transport: Some(transport),
    })
}

pub fn tere_results() -> Value {
    json!([
        { "wordId": 1, "wordValue": "tere", "lang": "est", "homonymNr": 1 },
        { "wordId": 2, "wordValue": "tere", "lang": "est", "homonymNr": 2 }
    ])
}
