//! MCP request dispatch and the newline-delimited stdio loop.
//!
//! The same [`McpServer`] instance serves every transport shell; it holds the
//! shared [`EkilexClient`] and a few runtime counters.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

use crate::api::EkilexClient;
use crate::errors::{format_error_for_mcp, Result};
use crate::tools::{get_tool_definitions, handle_tool_call};

use super::resources::{
    get_resource_definitions, get_resource_templates, read_resource, ResourceError,
};
use super::transport::{ErrorCode, JsonRpcRequest, JsonRpcResponse};

pub const PROTOCOL_VERSION: &str = "2024-11-05";
pub const SERVER_NAME: &str = "ekilex-mcp";

/// Runtime statistics for the MCP server.
pub struct ServerStats {
    started_at: Instant,
    total_requests: AtomicU64,
    tool_calls: AtomicU64,
    errors: AtomicU64,
}

impl ServerStats {
    fn new() -> Self {
        Self {
            started_at: Instant::now(),
            total_requests: AtomicU64::new(0),
            tool_calls: AtomicU64::new(0),
            errors: AtomicU64::new(0),
        }
    }
}

pub struct McpServer {
    client: Arc<EkilexClient>,
    stats: ServerStats,
    tool_call_counts: Mutex<HashMap<String, u64>>,
}

impl McpServer {
    pub fn new(client: Arc<EkilexClient>) -> Self {
        Self {
            client,
            stats: ServerStats::new(),
            tool_call_counts: Mutex::new(HashMap::new()),
        }
    }

    pub fn client(&self) -> &EkilexClient {
        &self.client
    }

    /// Serves JSON-RPC over the process's stdin and stdout until stdin closes.
    pub async fn run_stdio(&self) -> Result<()> {
        info!("MCP server listening on stdio");
        self.serve_lines(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await
    }

    /// Reads one JSON-RPC message per line from `reader` and writes one
    /// response per line to `writer`. Blank lines are skipped and
    /// notifications produce no output.
    pub async fn serve_lines<R, W>(&self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();

        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let Some(response) = self.handle_message(line).await else {
                continue;
            };

            let json_line = match serde_json::to_string(&response) {
                Ok(s) => s,
                Err(e) => {
                    error!("failed to serialize response: {}", e);
                    continue;
                }
            };
            writer.write_all(json_line.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }

        debug!("stdin closed, stopping");
        Ok(())
    }

    /// Parses and dispatches one raw JSON-RPC message.
    pub async fn handle_message(&self, raw: &str) -> Option<JsonRpcResponse> {
        match serde_json::from_str::<JsonRpcRequest>(raw) {
            Ok(request) => self.handle_request(&request).await,
            Err(e) => {
                self.stats.errors.fetch_add(1, Ordering::Relaxed);
                Some(JsonRpcResponse::error(
                    Value::Null,
                    ErrorCode::ParseError,
                    format!("failed to parse JSON-RPC request: {}", e),
                ))
            }
        }
    }

    /// Dispatches a parsed JSON-RPC request.
    ///
    /// Returns `None` for notifications.
    pub async fn handle_request(&self, request: &JsonRpcRequest) -> Option<JsonRpcResponse> {
        self.stats.total_requests.fetch_add(1, Ordering::Relaxed);

        if request.is_notification() {
            debug!(method = %request.method, "notification");
            return None;
        }

        let id = request.id.clone();
        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(id),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => JsonRpcResponse::success(id, json!({ "tools": get_tool_definitions() })),
            "tools/call" => self.handle_tools_call(id, request.params.as_ref()).await,
            "resources/list" => {
                JsonRpcResponse::success(id, json!({ "resources": get_resource_definitions() }))
            }
            "resources/templates/list" => JsonRpcResponse::success(
                id,
                json!({ "resourceTemplates": get_resource_templates() }),
            ),
            "resources/read" => self.handle_resources_read(id, request.params.as_ref()).await,
            _ => JsonRpcResponse::error(
                id,
                ErrorCode::MethodNotFound,
                format!("method not found: {}", request.method),
            ),
        };

        if response.is_error() {
            self.stats.errors.fetch_add(1, Ordering::Relaxed);
        }

        Some(response)
    }

    fn handle_initialize(&self, id: Value) -> JsonRpcResponse {
        JsonRpcResponse::success(
            id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {
                    "tools": {},
                    "resources": {}
                },
                "serverInfo": {
                    "name": SERVER_NAME,
                    "version": env!("CARGO_PKG_VERSION")
                }
            }),
        )
    }

    async fn handle_tools_call(&self, id: Value, params: Option<&Value>) -> JsonRpcResponse {
        let Some(params) = params else {
            return JsonRpcResponse::error(
                id,
                ErrorCode::InvalidParams,
                "missing params for tools/call",
            );
        };

        let Some(tool_name) = params.get("name").and_then(|v| v.as_str()) else {
            return JsonRpcResponse::error(
                id,
                ErrorCode::InvalidParams,
                "missing 'name' in tools/call params",
            );
        };

        let arguments = params.get("arguments").cloned().unwrap_or(Value::Null);

        self.stats.tool_calls.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut counts) = self.tool_call_counts.lock() {
            *counts.entry(tool_name.to_string()).or_insert(0) += 1;
        }

        match handle_tool_call(&self.client, tool_name, arguments).await {
            Ok(response) => match serde_json::to_value(&response) {
                Ok(result) => JsonRpcResponse::success(id, result),
                Err(e) => JsonRpcResponse::error(id, ErrorCode::InternalError, e.to_string()),
            },
            Err(e) => {
                warn!(tool = tool_name, "rejected tool call: {}", e);
                JsonRpcResponse::error(id, ErrorCode::InvalidParams, e.to_string())
            }
        }
    }

    async fn handle_resources_read(&self, id: Value, params: Option<&Value>) -> JsonRpcResponse {
        let Some(uri) = params.and_then(|p| p.get("uri")).and_then(|v| v.as_str()) else {
            return JsonRpcResponse::error(
                id,
                ErrorCode::InvalidParams,
                "missing 'uri' in resources/read params",
            );
        };

        match read_resource(&self.client, uri).await {
            Ok(contents) => JsonRpcResponse::success(id, json!({ "contents": [contents] })),
            Err(e @ ResourceError::NotFound(_)) => {
                JsonRpcResponse::error(id, ErrorCode::ResourceNotFound, e.to_string())
            }
            Err(ResourceError::Remote(e)) => {
                warn!(uri, "resource read failed: {}", e);
                JsonRpcResponse::error(id, ErrorCode::InternalError, format_error_for_mcp(&e))
            }
        }
    }

    /// Returns the current server runtime statistics as a JSON value.
    pub fn server_stats_json(&self) -> Value {
        let uptime = self.stats.started_at.elapsed();
        let tool_counts: Value = self
            .tool_call_counts
            .lock()
            .map(|counts| json!(*counts))
            .unwrap_or(json!({}));

        json!({
            "uptime_secs": uptime.as_secs(),
            "total_requests": self.stats.total_requests.load(Ordering::Relaxed),
            "tool_calls": self.stats.tool_calls.load(Ordering::Relaxed),
            "errors": self.stats.errors.load(Ordering::Relaxed),
            "tool_call_counts": tool_counts,
        })
    }
}
