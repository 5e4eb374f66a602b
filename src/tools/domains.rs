use serde::Deserialize;
use serde_json::json;

use crate::api::EkilexClient;
use crate::types::Domain;

use super::{ToolDefinition, ToolResponse};

pub const NAME: &str = "get_domains";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainsInput {
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub list_origins: bool,
}

impl DomainsInput {
    pub fn validate(&self) -> Result<(), String> {
        if matches!(self.origin.as_deref(), Some("")) {
            return Err("origin must not be empty".to_string());
        }
        Ok(())
    }
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: NAME.to_string(),
        description: "Get domain classifications for categorizing words by subject area (e.g., medicine, law, technology). Use listOrigins: true to see available domain systems, then fetch domains for a specific origin.".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "origin": {
                    "type": "string",
                    "minLength": 1,
                    "description": "Domain origin code (e.g., \"eki\", \"lenoch\"). Use listOrigins to see available origins."
                },
                "listOrigins": {
                    "type": "boolean",
                    "default": false,
                    "description": "If true, list all available domain origins instead of fetching domains"
                }
            }
        }),
    }
}

pub async fn run(client: &EkilexClient, input: &DomainsInput) -> ToolResponse {
    if input.list_origins {
        return match client.get_domain_origins().await {
            Ok(origins) => ToolResponse::text(format_origins(&origins)),
            Err(e) => ToolResponse::error(&e),
        };
    }

    let origin = match input.origin.as_deref() {
        Some(origin) if !origin.is_empty() => origin,
        _ => {
            return ToolResponse::text(
                "Please provide an origin or use listOrigins: true to see available domain origins.",
            )
        }
    };

    match client.get_domains(origin).await {
        Ok(domains) => ToolResponse::text(format_domains(&domains, origin)),
        Err(e) => ToolResponse::error(&e),
    }
}

pub fn format_domains(domains: &[Domain], origin: &str) -> String {
    if domains.is_empty() {
        return format!(
            "No domains found for origin '{}'. Use listOrigins: true to see available domain origins.",
            origin
        );
    }

    let mut lines = vec![
        format!("Found {} domain(s) for origin '{}':", domains.len(), origin),
        String::new(),
    ];
    for domain in domains {
        lines.push(format!("- **{}**: {}", domain.code, domain.value));
    }
    lines.push(String::new());
    lines.push("Use these domain codes to filter search results.".to_string());
    lines.join("\n")
}

pub fn format_origins(origins: &[String]) -> String {
    if origins.is_empty() {
        return "No domain origins available.".to_string();
    }

    let mut lines = vec![
        format!("Available domain origins ({}):", origins.len()),
        String::new(),
    ];
    for origin in origins {
        lines.push(format!("- **{}**", origin));
    }
    lines.push(String::new());
    lines.push("Use get_domains with a specific origin to see its domain codes.".to_string());
    lines.join("\n")
}
