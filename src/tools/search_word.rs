use serde::Deserialize;
use serde_json::json;

use crate::api::EkilexClient;
use crate::types::WordSearchResult;

use super::{homonym_suffix, ToolDefinition, ToolResponse};

pub const NAME: &str = "search_word";

const DEFAULT_LIMIT: u64 = 20;
const MAX_LIMIT: u64 = 100;

/// Raw `search_word` arguments.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchWordInput {
    pub query: String,
    #[serde(default)]
    pub datasets: Option<String>,
    #[serde(default)]
    pub limit: Option<u64>,
}

/// Validated `search_word` arguments with the default limit applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchWordQuery {
    pub query: String,
    pub datasets: Option<String>,
    pub limit: usize,
}

impl SearchWordInput {
    pub fn validate(self) -> Result<SearchWordQuery, String> {
        if self.query.is_empty() {
            return Err("query must not be empty".to_string());
        }
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT);
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(format!("limit must be between 1 and {}", MAX_LIMIT));
        }
        Ok(SearchWordQuery {
            query: self.query,
            datasets: self.datasets,
            limit: limit as usize,
        })
    }
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: NAME.to_string(),
        description: "Search for Estonian words in the Ekilex dictionary. Supports wildcards: * (any characters) and ? (single character). Returns matching words with basic info. Use get_word_details with the word ID to get complete information.".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "minLength": 1,
                    "description": "Word to search for (supports * and ? wildcards)"
                },
                "datasets": {
                    "type": "string",
                    "description": "Comma-separated dataset codes to search in (e.g., \"eki,psv\")"
                },
                "limit": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": MAX_LIMIT,
                    "default": DEFAULT_LIMIT,
                    "description": "Maximum results to return (default: 20)"
                }
            },
            "required": ["query"]
        }),
    }
}

pub async fn run(client: &EkilexClient, input: &SearchWordQuery) -> ToolResponse {
    match client
        .search_word(&input.query, input.datasets.as_deref())
        .await
    {
        Ok(words) => {
            let shown = &words[..words.len().min(input.limit)];
            ToolResponse::text(format_word_results(shown, &input.query))
        }
        Err(e) => ToolResponse::error(&e),
    }
}

/// Renders word search results as a bulleted list.
pub fn format_word_results(words: &[WordSearchResult], query: &str) -> String {
    if words.is_empty() {
        return format!(
            "No words found matching '{}'. Try using wildcards (* for any characters, ? for single character) or checking the spelling.",
            query
        );
    }

    let mut out = format!("Found {} word(s) matching '{}':\n\n", words.len(), query);
    for word in words {
        let mut parts = vec![
            format!("**{}**", word.word_value),
            format!("[ID: {}]", word.word_id),
            format!("({})", word.lang),
        ];
        if let Some(homonym) = homonym_suffix(word.homonym_nr) {
            parts.push(homonym);
        }
        if !word.word_type_codes.is_empty() {
            parts.push(format!("{{{}}}", word.word_type_codes.join(", ")));
        }
        out.push_str(&format!("- {}\n", parts.join(" ")));
    }
    out.push_str("\nUse get_word_details with the word ID to get full information.");
    out
}
