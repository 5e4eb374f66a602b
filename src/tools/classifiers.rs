use serde::Deserialize;
use serde_json::json;

use crate::api::EkilexClient;
use crate::types::{Classifier, ClassifierType};

use super::{compare_labels, ToolDefinition, ToolResponse};

pub const NAME: &str = "get_classifiers";

#[derive(Debug, Clone, Deserialize)]
pub struct ClassifiersInput {
    #[serde(rename = "type")]
    pub classifier_type: String,
}

impl ClassifiersInput {
    pub fn validate(&self) -> Result<ClassifierType, String> {
        ClassifierType::from_str(&self.classifier_type).ok_or_else(|| {
            format!(
                "type must be one of {}, got '{}'",
                ClassifierType::valid_codes(),
                self.classifier_type
            )
        })
    }
}

pub fn definition() -> ToolDefinition {
    let codes: Vec<&str> = ClassifierType::ALL.iter().map(|t| t.as_str()).collect();
    ToolDefinition {
        name: NAME.to_string(),
        description: "Get classifier values for understanding word attributes. Types: POS (parts of speech like noun, verb), MORPH (morphological codes), DOMAIN (subject areas like medicine, law), REGISTER (formal/informal usage).".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "type": {
                    "type": "string",
                    "enum": codes,
                    "description": "Classifier type: POS (parts of speech), MORPH (morphology), DOMAIN (subject areas), REGISTER (formal/informal), DERIV (derivations), VALUE_STATE"
                }
            },
            "required": ["type"]
        }),
    }
}

pub async fn run(client: &EkilexClient, classifier_type: ClassifierType) -> ToolResponse {
    match client.get_classifiers(classifier_type).await {
        Ok(classifiers) => ToolResponse::text(format_classifiers(&classifiers, classifier_type)),
        Err(e) => ToolResponse::error(&e),
    }
}

/// Renders classifiers grouped by language, each group sorted by code.
///
/// Groups keep the order in which their language first appears. Language
/// headings are only shown when there is more than one group.
pub fn format_classifiers(classifiers: &[Classifier], classifier_type: ClassifierType) -> String {
    if classifiers.is_empty() {
        return format!(
            "No classifiers found for type '{}'.",
            classifier_type.as_str()
        );
    }

    let mut groups: Vec<(&str, Vec<&Classifier>)> = Vec::new();
    for clf in classifiers {
        let lang = clf.lang.as_deref().unwrap_or("unknown");
        match groups.iter_mut().find(|(l, _)| *l == lang) {
            Some((_, items)) => items.push(clf),
            None => groups.push((lang, vec![clf])),
        }
    }

    let mut lines = vec![
        format!("**{}**", classifier_type.description()),
        String::new(),
        format!("Found {} classifier(s):", classifiers.len()),
        String::new(),
    ];

    let show_headings = groups.len() > 1;
    for (lang, mut items) in groups {
        if show_headings {
            lines.push(format!("### {}", lang.to_uppercase()));
        }
        items.sort_by(|a, b| compare_labels(&a.code, &b.code));
        for clf in items {
            lines.push(format!("- **{}**: {}", clf.code, clf.value));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}
