mod common;

use std::sync::Arc;

use common::*;
use ekilex_mcp::api::HttpResponse;
use ekilex_mcp::mcp::{JsonRpcRequest, JsonRpcResponse, McpServer};
use serde_json::{json, Value};

fn server_with(transport: MockTransport) -> McpServer {
    McpServer::new(Arc::new(client_with(Arc::new(transport))))
}

fn request(id: i64, method: &str, params: Value) -> JsonRpcRequest {
    serde_json::from_value(json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
        "params": params
    }))
    .unwrap()
}

fn error_code(response: &JsonRpcResponse) -> i32 {
    response.error.as_ref().map(|e| e.code).unwrap_or(0)
}

#[tokio::test]
async fn test_initialize_advertises_tools_and_resources() {
    let server = server_with(MockTransport::with_data(json!([])));
    let response = server
        .handle_request(&request(1, "initialize", json!({})))
        .await
        .unwrap();

    let result = response.result.unwrap();
    assert_eq!(result["protocolVersion"], "2024-11-05");
    assert!(result["capabilities"]["tools"].is_object());
    assert!(result["capabilities"]["resources"].is_object());
    assert_eq!(result["serverInfo"]["name"], "ekilex-mcp");
    assert_eq!(result["serverInfo"]["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_notifications_get_no_response() {
    let server = server_with(MockTransport::with_data(json!([])));
    for raw in [
        r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
        r#"{"jsonrpc":"2.0","method":"initialized"}"#,
        r#"{"jsonrpc":"2.0","method":"notifications/cancelled","params":{"requestId":1}}"#,
    ] {
        assert!(server.handle_message(raw).await.is_none());
    }
}

#[tokio::test]
async fn test_tools_list_returns_seven_tools() {
    let server = server_with(MockTransport::with_data(json!([])));
    let response = server
        .handle_request(&request(2, "tools/list", json!({})))
        .await
        .unwrap();

    let tools = response.result.unwrap()["tools"].as_array().unwrap().clone();
    assert_eq!(tools.len(), 7);
    for tool in &tools {
        assert!(tool["inputSchema"].is_object());
    }
}

#[tokio::test]
async fn test_tools_call_returns_text_content() {
    let server = server_with(MockTransport::with_data(tere_results()));
    let response = server
        .handle_request(&request(
            3,
            "tools/call",
            json!({ "name": "search_word", "arguments": { "query": "tere" } }),
        ))
        .await
        .unwrap();

    let result = response.result.unwrap();
    assert_eq!(result["content"][0]["type"], "text");
    assert!(result["content"][0]["text"]
        .as_str()
        .unwrap()
        .contains("Found 2 word(s)"));
}

#[tokio::test]
async fn test_tools_call_rejections_are_invalid_params() {
    let server = server_with(MockTransport::with_data(json!([])));

    let unknown = server
        .handle_request(&request(4, "tools/call", json!({ "name": "nope" })))
        .await
        .unwrap();
    assert_eq!(error_code(&unknown), -32602);

    let bad_args = server
        .handle_request(&request(
            5,
            "tools/call",
            json!({ "name": "get_classifiers", "arguments": { "type": "COLOR" } }),
        ))
        .await
        .unwrap();
    assert_eq!(error_code(&bad_args), -32602);
    assert!(bad_args
        .error
        .unwrap()
        .message
        .contains("POS, MORPH, DOMAIN, REGISTER, DERIV, VALUE_STATE"));

    let missing_name = server
        .handle_request(&request(6, "tools/call", json!({})))
        .await
        .unwrap();
    assert_eq!(error_code(&missing_name), -32602);
}

#[tokio::test]
async fn test_remote_failure_stays_in_band_for_tools() {
    let server = server_with(MockTransport::new(Ok(HttpResponse::with_status(503, ""))));
    let response = server
        .handle_request(&request(
            7,
            "tools/call",
            json!({ "name": "list_datasets", "arguments": {} }),
        ))
        .await
        .unwrap();

    assert!(response.error.is_none());
    assert_eq!(
        response.result.unwrap()["content"][0]["text"],
        "Error [EKILEX_UNAVAILABLE]: Ekilex API is temporarily unavailable. Please try again later."
    );
}

#[tokio::test]
async fn test_unknown_method_and_parse_error() {
    let server = server_with(MockTransport::with_data(json!([])));

    let response = server
        .handle_request(&request(8, "prompts/list", json!({})))
        .await
        .unwrap();
    assert_eq!(error_code(&response), -32601);

    let response = server.handle_message("{not json").await.unwrap();
    assert_eq!(error_code(&response), -32700);
    assert!(response.id.is_null());
}

#[tokio::test]
async fn test_ping() {
    let server = server_with(MockTransport::with_data(json!([])));
    let response = server
        .handle_request(&request(9, "ping", Value::Null))
        .await
        .unwrap();
    assert_eq!(response.result.unwrap(), json!({}));
    assert_eq!(response.id, json!(9));
}

#[tokio::test]
async fn test_stats_track_requests_tools_and_errors() {
    let server = server_with(MockTransport::with_data(json!([])));

    server.handle_request(&request(1, "ping", json!({}))).await;
    server
        .handle_request(&request(
            2,
            "tools/call",
            json!({ "name": "list_datasets" }),
        ))
        .await;
    server
        .handle_request(&request(
            3,
            "tools/call",
            json!({ "name": "list_datasets" }),
        ))
        .await;
    server.handle_request(&request(4, "bogus", json!({}))).await;

    let stats = server.server_stats_json();
    assert_eq!(stats["total_requests"], 4);
    assert_eq!(stats["tool_calls"], 2);
    assert_eq!(stats["errors"], 1);
    assert_eq!(stats["tool_call_counts"]["list_datasets"], 2);
}

#[tokio::test]
async fn test_stdio_loop_writes_one_line_per_response() {
    let server = server_with(MockTransport::with_data(json!([])));
    let input = concat!(
        r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
        "\n",
        r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
        "\n",
        "\n",
        r#"{"jsonrpc":"2.0","id":2,"method":"ping"}"#,
        "\n",
    );

    let mut output: Vec<u8> = Vec::new();
    server
        .serve_lines(tokio::io::BufReader::new(input.as_bytes()), &mut output)
        .await
        .unwrap();

    let text = String::from_utf8(output).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);

    let first: Value = serde_json::from_str(lines[0]).unwrap();
    let second: Value = serde_json::from_str(lines[1]).unwrap();
    assert_eq!(first["id"], 1);
    assert_eq!(second["id"], 2);
    assert_eq!(second["result"], json!({}));
}
