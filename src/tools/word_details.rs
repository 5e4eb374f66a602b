use serde::Deserialize;
use serde_json::json;

use crate::api::EkilexClient;
use crate::types::{Form, Lexeme, WordDetails};

use super::{ToolDefinition, ToolResponse};

pub const NAME: &str = "get_word_details";

const MAX_FORMS: usize = 10;
const MAX_USAGES: usize = 3;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordDetailsInput {
    pub word_id: u64,
    #[serde(default)]
    pub datasets: Option<String>,
}

impl WordDetailsInput {
    pub fn validate(&self) -> Result<(), String> {
        if self.word_id == 0 {
            return Err("wordId must be a positive integer".to_string());
        }
        Ok(())
    }
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: NAME.to_string(),
        description: "Get complete details for an Estonian word including definitions, morphological forms, usage examples, and translations. Use after search_word to get full information about a specific word.".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "wordId": {
                    "type": "integer",
                    "minimum": 1,
                    "description": "Word ID from search_word results"
                },
                "datasets": {
                    "type": "string",
                    "description": "Comma-separated dataset codes to filter results"
                }
            },
            "required": ["wordId"]
        }),
    }
}

pub async fn run(client: &EkilexClient, input: &WordDetailsInput) -> ToolResponse {
    match client
        .get_word_details(input.word_id, input.datasets.as_deref())
        .await
    {
        Ok(Some(details)) => ToolResponse::text(format_word_details(&details)),
        Ok(None) => ToolResponse::text(format!(
            "No word found with ID {}. Use search_word to find valid word IDs.",
            input.word_id
        )),
        Err(e) => ToolResponse::error(&e),
    }
}

/// Renders a full word entry: header, info line, forms and senses.
pub fn format_word_details(details: &WordDetails) -> String {
    let mut lines = vec![format!("# {}", details.word_value), String::new()];

    let mut info = vec![format!("Language: {}", details.lang)];
    if let Some(n) = details.homonym_nr.filter(|n| *n > 1) {
        info.push(format!("Homonym: {}", n));
    }
    if !details.word_type_codes.is_empty() {
        info.push(format!("Type: {}", details.word_type_codes.join(", ")));
    }
    lines.push(info.join(" | "));

    if !details.forms.is_empty() {
        lines.push(format_forms(&details.forms));
    }
    if !details.lexemes.is_empty() {
        lines.push(format_lexemes(&details.lexemes));
    }

    lines.join("\n")
}

fn format_forms(forms: &[Form]) -> String {
    let mut lines = vec![String::new(), "**Morphological Forms:**".to_string()];
    for form in forms.iter().take(MAX_FORMS) {
        let label = match (&form.morph_value, &form.morph_code) {
            (Some(value), _) => format!("{} ({})", form.value, value),
            (None, Some(code)) => format!("{} [{}]", form.value, code),
            (None, None) => form.value.clone(),
        };
        lines.push(format!("  - {}", label));
    }
    if forms.len() > MAX_FORMS {
        lines.push(format!("  ... and {} more forms", forms.len() - MAX_FORMS));
    }
    lines.join("\n")
}

fn format_lexemes(lexemes: &[Lexeme]) -> String {
    let mut lines = vec![String::new(), "**Meanings:**".to_string()];

    for (i, lexeme) in lexemes.iter().enumerate() {
        let meaning = lexeme.meaning.as_ref();
        match meaning.and_then(|m| m.definition.as_deref()) {
            Some(definition) if !definition.is_empty() => {
                lines.push(format!("{}. {}", i + 1, definition))
            }
            _ => lines.push(format!("{}. (no definition available)", i + 1)),
        }

        if !lexeme.pos.is_empty() {
            lines.push(format!("   POS: {}", lexeme.pos.join(", ")));
        }
        if let Some(m) = meaning {
            if !m.domain_codes.is_empty() {
                lines.push(format!("   Domain: {}", m.domain_codes.join(", ")));
            }
            if !m.register_codes.is_empty() {
                lines.push(format!("   Register: {}", m.register_codes.join(", ")));
            }
        }

        if !lexeme.usages.is_empty() {
            lines.push("   Examples:".to_string());
            for usage in lexeme.usages.iter().take(MAX_USAGES) {
                lines.push(format!("     - \"{}\"", usage.value));
                if let Some(translation) = usage.usage_translations.first() {
                    lines.push(format!("       → {}", translation));
                }
            }
            if lexeme.usages.len() > MAX_USAGES {
                lines.push(format!(
                    "     ... and {} more examples",
                    lexeme.usages.len() - MAX_USAGES
                ));
            }
        }

        if let Some(code) = lexeme.dataset_code.as_deref().filter(|c| !c.is_empty()) {
            lines.push(format!("   Source: {}", code));
        }

        lines.push(String::new());
    }

    lines.join("\n")
}
