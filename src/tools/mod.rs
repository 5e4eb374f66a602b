//! MCP tool definitions and dispatch for the Ekilex dictionary.
//!
//! Each tool maps to one `EkilexClient` call. Tool definitions include JSON
//! Schema descriptions so that MCP clients can discover available
//! capabilities. Handlers never fail: remote errors are rendered in-band as
//! text via [`format_error_for_mcp`].

use std::cmp::Ordering;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

use crate::api::EkilexClient;
use crate::errors::{format_error_for_mcp, EkilexError};

/// `get_classifiers`
pub mod classifiers;
/// `list_datasets`
pub mod datasets;
/// `get_domains`
pub mod domains;
/// `get_meaning_details`
pub mod meaning_details;
/// `search_meaning`
pub mod search_meaning;
/// `search_word`
pub mod search_word;
/// `get_word_details`
pub mod word_details;

/// Maximum character length for a tool response before truncation.
const MAX_RESPONSE_CHARS: usize = 15_000;

/// A tool definition exposed by the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique tool name.
    pub name: String,
    /// Human-readable description of what the tool does.
    pub description: String,
    /// JSON Schema describing the tool's input parameters.
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// One block of tool output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextContent {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

/// The `{ content: [...] }` payload returned from `tools/call`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResponse {
    pub content: Vec<TextContent>,
}

impl ToolResponse {
    /// A single text block, cut down to the response size limit.
    pub fn text(text: impl AsRef<str>) -> Self {
        Self {
            content: vec![TextContent {
                kind: "text".to_string(),
                text: truncate_response(text.as_ref()),
            }],
        }
    }

    /// A single text block describing `error`.
    pub fn error(error: &EkilexError) -> Self {
        Self::text(format_error_for_mcp(error))
    }

    /// Text of the first content block, or `""` when there is none.
    pub fn first_text(&self) -> &str {
        self.content.first().map(|c| c.text.as_str()).unwrap_or("")
    }
}

/// Reasons a `tools/call` request is rejected before reaching a handler.
#[derive(Error, Debug)]
pub enum ToolCallError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("invalid arguments for {tool}: {message}")]
    InvalidArguments { tool: String, message: String },
}

/// Returns the list of all tool definitions exposed by this MCP server.
pub fn get_tool_definitions() -> Vec<ToolDefinition> {
    vec![
        search_word::definition(),
        word_details::definition(),
        search_meaning::definition(),
        meaning_details::definition(),
        datasets::definition(),
        classifiers::definition(),
        domains::definition(),
    ]
}

/// Validates the arguments for `tool_name` and runs its handler.
pub async fn handle_tool_call(
    client: &EkilexClient,
    tool_name: &str,
    args: Value,
) -> Result<ToolResponse, ToolCallError> {
    debug!(tool = tool_name, "tool call");
    match tool_name {
        search_word::NAME => {
            let input: search_word::SearchWordInput = parse_args(tool_name, args)?;
            let input = input.validate().map_err(|m| invalid(tool_name, m))?;
            Ok(search_word::run(client, &input).await)
        }
        word_details::NAME => {
            let input: word_details::WordDetailsInput = parse_args(tool_name, args)?;
            input.validate().map_err(|m| invalid(tool_name, m))?;
            Ok(word_details::run(client, &input).await)
        }
        search_meaning::NAME => {
            let input: search_meaning::SearchMeaningInput = parse_args(tool_name, args)?;
            let input = input.validate().map_err(|m| invalid(tool_name, m))?;
            Ok(search_meaning::run(client, &input).await)
        }
        meaning_details::NAME => {
            let input: meaning_details::MeaningDetailsInput = parse_args(tool_name, args)?;
            input.validate().map_err(|m| invalid(tool_name, m))?;
            Ok(meaning_details::run(client, &input).await)
        }
        datasets::NAME => Ok(datasets::run(client).await),
        classifiers::NAME => {
            let input: classifiers::ClassifiersInput = parse_args(tool_name, args)?;
            let classifier_type = input.validate().map_err(|m| invalid(tool_name, m))?;
            Ok(classifiers::run(client, classifier_type).await)
        }
        domains::NAME => {
            let input: domains::DomainsInput = parse_args(tool_name, args)?;
            input.validate().map_err(|m| invalid(tool_name, m))?;
            Ok(domains::run(client, &input).await)
        }
        _ => Err(ToolCallError::UnknownTool(tool_name.to_string())),
    }
}

/// Deserializes tool arguments; a missing or `null` argument object counts as `{}`.
fn parse_args<T: DeserializeOwned>(tool: &str, args: Value) -> Result<T, ToolCallError> {
    let args = if args.is_null() { json!({}) } else { args };
    serde_json::from_value(args).map_err(|e| invalid(tool, e.to_string()))
}

fn invalid(tool: &str, message: String) -> ToolCallError {
    ToolCallError::InvalidArguments {
        tool: tool.to_string(),
        message,
    }
}

/// Truncates a string to the maximum response character limit, appending
/// a truncation notice if necessary.
fn truncate_response(s: &str) -> String {
    if s.len() <= MAX_RESPONSE_CHARS {
        s.to_string()
    } else {
        // Find a valid UTF-8 character boundary at or before MAX_RESPONSE_CHARS
        let mut end = MAX_RESPONSE_CHARS;
        while !s.is_char_boundary(end) && end > 0 {
            end -= 1;
        }
        format!("{}\n\n[... truncated at {} chars]", &s[..end], end)
    }
}

/// Formats a homonym marker, shown only for homonyms after the first.
pub(crate) fn homonym_suffix(homonym_nr: Option<i64>) -> Option<String> {
    homonym_nr
        .filter(|n| *n > 1)
        .map(|n| format!("[homonym {}]", n))
}

/// Orders display labels ignoring case, falling back to byte order for ties.
pub(crate) fn compare_labels(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
