use serde::Deserialize;
use serde_json::json;

use crate::api::EkilexClient;
use crate::types::MeaningSearchResult;

use super::{ToolDefinition, ToolResponse};

pub const NAME: &str = "search_meaning";

const DEFAULT_LIMIT: u64 = 10;
const MAX_LIMIT: u64 = 50;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMeaningInput {
    pub query: String,
    #[serde(default)]
    pub datasets: Option<String>,
    #[serde(default)]
    pub limit: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchMeaningQuery {
    pub query: String,
    pub datasets: Option<String>,
    pub limit: usize,
}

impl SearchMeaningInput {
    pub fn validate(self) -> Result<SearchMeaningQuery, String> {
        if self.query.is_empty() {
            return Err("query must not be empty".to_string());
        }
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT);
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(format!("limit must be between 1 and {}", MAX_LIMIT));
        }
        Ok(SearchMeaningQuery {
            query: self.query,
            datasets: self.datasets,
            limit: limit as usize,
        })
    }
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: NAME.to_string(),
        description: "Search for Estonian words by semantic meaning or concept. Useful when you know what concept you're looking for but not the exact word. Returns meanings with associated words.".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "minLength": 1,
                    "description": "Meaning/concept to search for"
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
                    "description": "Maximum results to return (default: 10)"
                }
            },
            "required": ["query"]
        }),
    }
}

pub async fn run(client: &EkilexClient, input: &SearchMeaningQuery) -> ToolResponse {
    match client
        .search_meaning(&input.query, input.datasets.as_deref())
        .await
    {
        Ok(meanings) => {
            let shown = &meanings[..meanings.len().min(input.limit)];
            ToolResponse::text(format_meaning_results(shown, &input.query))
        }
        Err(e) => ToolResponse::error(&e),
    }
}

pub fn format_meaning_results(meanings: &[MeaningSearchResult], query: &str) -> String {
    if meanings.is_empty() {
        return format!(
            "No meanings found matching '{}'. Try different search terms or use search_word to search by word form instead.",
            query
        );
    }

    let mut lines = vec![
        format!("Found {} meaning(s) matching '{}':", meanings.len(), query),
        String::new(),
    ];

    for meaning in meanings {
        lines.push(format!("**Meaning ID: {}**", meaning.meaning_id));
        if let Some(definition) = meaning.definition.as_deref().filter(|d| !d.is_empty()) {
            lines.push(format!("  Definition: {}", definition));
        }
        if !meaning.word_values.is_empty() {
            lines.push(format!("  Words: {}", meaning.word_values.join(", ")));
        }
        if !meaning.domain_codes.is_empty() {
            lines.push(format!("  Domains: {}", meaning.domain_codes.join(", ")));
        }
        lines.push(String::new());
    }

    lines.push(
        "Use search_word with specific words to get full details including morphology and examples."
            .to_string(),
    );
    lines.join("\n")
}
