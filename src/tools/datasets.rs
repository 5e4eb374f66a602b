use serde_json::json;

use crate::api::EkilexClient;
use crate::types::Dataset;

use super::{compare_labels, ToolDefinition, ToolResponse};

pub const NAME: &str = "list_datasets";

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: NAME.to_string(),
        description: "List all available dictionary datasets in Ekilex. Use this to discover which dictionaries are available to search in. Use the dataset codes with search_word or get_word_details to filter results.".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {}
        }),
    }
}

pub async fn run(client: &EkilexClient) -> ToolResponse {
    match client.get_datasets().await {
        Ok(datasets) => ToolResponse::text(format_datasets(&datasets)),
        Err(e) => ToolResponse::error(&e),
    }
}

/// Renders datasets sorted by name.
pub fn format_datasets(datasets: &[Dataset]) -> String {
    if datasets.is_empty() {
        return "No datasets available.".to_string();
    }

    let mut sorted: Vec<&Dataset> = datasets.iter().collect();
    sorted.sort_by(|a, b| compare_labels(&a.name, &b.name));

    let mut out = format!("Found {} dataset(s):\n\n", datasets.len());
    for dataset in sorted {
        out.push_str(&format!("**{}** - {}\n", dataset.code, dataset.name));
        if let Some(description) = dataset.description.as_deref().filter(|d| !d.is_empty()) {
            out.push_str(&format!("  {}\n", description));
        }
        if let Some(is_public) = dataset.is_public {
            out.push_str(&format!(
                "  Public: {}\n",
                if is_public { "Yes" } else { "No" }
            ));
        }
        out.push('\n');
    }
    out.push_str(
        "Use dataset codes with search_word to filter searches (e.g., datasets: \"eki,psv\").",
    );
    out
}
