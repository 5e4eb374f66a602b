use serde::Deserialize;
use serde_json::json;

use crate::api::EkilexClient;
use crate::types::MeaningDetails;

use super::{homonym_suffix, ToolDefinition, ToolResponse};

pub const NAME: &str = "get_meaning_details";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeaningDetailsInput {
    pub meaning_id: u64,
    #[serde(default)]
    pub datasets: Option<String>,
}

impl MeaningDetailsInput {
    pub fn validate(&self) -> Result<(), String> {
        if self.meaning_id == 0 {
            return Err("meaningId must be a positive integer".to_string());
        }
        Ok(())
    }
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: NAME.to_string(),
        description: "Get complete details for a meaning including definitions, related words, domain codes, and notes. Use after search_meaning to get full information about a specific meaning.".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "meaningId": {
                    "type": "integer",
                    "minimum": 1,
                    "description": "Meaning ID from search_meaning results"
                },
                "datasets": {
                    "type": "string",
                    "description": "Comma-separated dataset codes to filter results"
                }
            },
            "required": ["meaningId"]
        }),
    }
}

pub async fn run(client: &EkilexClient, input: &MeaningDetailsInput) -> ToolResponse {
    match client
        .get_meaning_details(input.meaning_id, input.datasets.as_deref())
        .await
    {
        Ok(Some(details)) => ToolResponse::text(format_meaning_details(&details)),
        Ok(None) => ToolResponse::text(format!(
            "No meaning found with ID {}. Use search_meaning to find valid meaning IDs.",
            input.meaning_id
        )),
        Err(e) => ToolResponse::error(&e),
    }
}

pub fn format_meaning_details(details: &MeaningDetails) -> String {
    let mut lines = vec![
        "# Meaning Details".to_string(),
        format!("ID: {}", details.meaning_id),
        String::new(),
    ];

    if !details.definitions.is_empty() {
        lines.push(String::new());
        lines.push("**Definitions:**".to_string());
        for def in &details.definitions {
            match def.lang.as_deref() {
                Some(lang) => lines.push(format!("  - {} ({})", def.value, lang)),
                None => lines.push(format!("  - {}", def.value)),
            }
        }
    }

    if !details.words.is_empty() {
        lines.push(String::new());
        lines.push("**Related Words:**".to_string());
        for word in &details.words {
            let mut parts = vec![
                format!("**{}**", word.word_value),
                format!("[ID: {}]", word.word_id),
                format!("({})", word.lang),
            ];
            if let Some(homonym) = homonym_suffix(word.homonym_nr) {
                parts.push(homonym);
            }
            lines.push(format!("  - {}", parts.join(" ")));
        }
    }

    if !details.domain_codes.is_empty() {
        lines.push(String::new());
        lines.push(format!("**Domains:** {}", details.domain_codes.join(", ")));
    }

    if !details.register_codes.is_empty() {
        lines.push(String::new());
        lines.push(format!("**Registers:** {}", details.register_codes.join(", ")));
    }

    if !details.notes.is_empty() {
        lines.push(String::new());
        lines.push("**Notes:**".to_string());
        for note in &details.notes {
            lines.push(format!("  - {}", note));
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MeaningDefinition, MeaningWord};

    #[test]
    fn test_full_meaning_rendering() {
        let details = MeaningDetails {
            meaning_id: 42,
            definitions: vec![
                MeaningDefinition {
                    value: "tervitussõna".to_string(),
                    lang: Some("est".to_string()),
                },
                MeaningDefinition {
                    value: "a greeting".to_string(),
                    lang: None,
                },
            ],
            words: vec![MeaningWord {
                word_id: 7,
                word_value: "tere".to_string(),
                lang: "est".to_string(),
                homonym_nr: Some(3),
            }],
            domain_codes: vec!["ling".to_string()],
            register_codes: vec!["kõnek".to_string()],
            notes: vec!["informal".to_string()],
        };

        let text = format_meaning_details(&details);
        assert!(text.starts_with("# Meaning Details\nID: 42\n"));
        assert!(text.contains("  - tervitussõna (est)"));
        assert!(text.contains("  - a greeting\n"));
        assert!(text.contains("  - **tere** [ID: 7] (est) [homonym 3]"));
        assert!(text.contains("**Domains:** ling"));
        assert!(text.contains("**Registers:** kõnek"));
        assert!(text.contains("**Notes:**\n  - informal"));
    }

    #[test]
    fn test_sparse_meaning_omits_sections() {
        let details = MeaningDetails {
            meaning_id: 1,
            definitions: vec![],
            words: vec![],
            domain_codes: vec![],
            register_codes: vec![],
            notes: vec![],
        };
        let text = format_meaning_details(&details);
        assert!(!text.contains("**Definitions:**"));
        assert!(!text.contains("**Notes:**"));
    }
}
