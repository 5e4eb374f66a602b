//! Read-only `ekilex://` resources.
//!
//! Three URI shapes are recognised:
//!
//! - `ekilex://datasets`
//! - `ekilex://classifiers/{type}`
//! - `ekilex://domains/{origin}` (origin optional; without it the available
//!   origins are listed)
//!
//! Anything else is reported as [`ResourceError::NotFound`].

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::api::EkilexClient;
use crate::errors::EkilexError;
use crate::types::ClassifierType;

const SCHEME: &str = "ekilex://";

pub const DATASETS_URI: &str = "ekilex://datasets";
pub const CLASSIFIERS_TEMPLATE: &str = "ekilex://classifiers/{type}";
pub const DOMAINS_TEMPLATE: &str = "ekilex://domains/{origin}";

const JSON_MIME: &str = "application/json";
const TEXT_MIME: &str = "text/plain";

/// A concrete resource listed by `resources/list`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDefinition {
    pub uri: String,
    pub name: String,
    pub description: String,
    pub mime_type: String,
}

/// A parameterised resource listed by `resources/templates/list`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceTemplate {
    pub uri_template: String,
    pub name: String,
    pub description: String,
    pub mime_type: String,
}

/// One entry of the `contents` array returned from `resources/read`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceContents {
    pub uri: String,
    pub mime_type: String,
    pub text: String,
}

#[derive(Error, Debug)]
pub enum ResourceError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Remote(#[from] EkilexError),
}

/// A parsed resource URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceRoute {
    Datasets,
    Classifiers(String),
    Domains(Option<String>),
}

impl ResourceRoute {
    /// Matches `uri` against the known templates. Path segments are
    /// percent-decoded.
    pub fn parse(uri: &str) -> Option<ResourceRoute> {
        let rest = uri.strip_prefix(SCHEME)?;
        let (head, tail) = match rest.split_once('/') {
            Some((head, tail)) => (head, Some(tail)),
            None => (rest, None),
        };

        match (head, tail) {
            ("datasets", None) => Some(ResourceRoute::Datasets),
            ("classifiers", Some(segment)) => {
                decode_segment(segment).map(ResourceRoute::Classifiers)
            }
            ("domains", None) | ("domains", Some("")) => Some(ResourceRoute::Domains(None)),
            ("domains", Some(segment)) => {
                decode_segment(segment).map(|origin| ResourceRoute::Domains(Some(origin)))
            }
            _ => None,
        }
    }
}

fn decode_segment(segment: &str) -> Option<String> {
    if segment.is_empty() || segment.contains('/') {
        return None;
    }
    urlencoding::decode(segment).ok().map(|s| s.into_owned())
}

pub fn get_resource_definitions() -> Vec<ResourceDefinition> {
    vec![ResourceDefinition {
        uri: DATASETS_URI.to_string(),
        name: "Ekilex Datasets".to_string(),
        description: "All available dictionary datasets in Ekilex".to_string(),
        mime_type: JSON_MIME.to_string(),
    }]
}

pub fn get_resource_templates() -> Vec<ResourceTemplate> {
    vec![
        ResourceTemplate {
            uri_template: CLASSIFIERS_TEMPLATE.to_string(),
            name: "Ekilex Classifiers".to_string(),
            description: format!(
                "Classifier values by type ({})",
                ClassifierType::valid_codes()
            ),
            mime_type: JSON_MIME.to_string(),
        },
        ResourceTemplate {
            uri_template: DOMAINS_TEMPLATE.to_string(),
            name: "Ekilex Domains".to_string(),
            description: "Domain classifications by origin. Omit the origin to list available origins."
                .to_string(),
            mime_type: JSON_MIME.to_string(),
        },
    ]
}

/// Reads the resource at `uri`.
pub async fn read_resource(
    client: &EkilexClient,
    uri: &str,
) -> Result<ResourceContents, ResourceError> {
    let route = ResourceRoute::parse(uri).ok_or_else(|| ResourceError::NotFound(uri.to_string()))?;
    debug!(uri, "resource read");

    let contents = match route {
        ResourceRoute::Datasets => {
            let datasets = client.get_datasets().await?;
            json_contents(uri, &datasets)?
        }
        ResourceRoute::Classifiers(code) => match ClassifierType::from_str(&code) {
            Some(classifier_type) => {
                let classifiers = client.get_classifiers(classifier_type).await?;
                json_contents(uri, &classifiers)?
            }
            None => ResourceContents {
                uri: uri.to_string(),
                mime_type: TEXT_MIME.to_string(),
                text: format!(
                    "Invalid classifier type '{}'. Valid types: {}",
                    code,
                    ClassifierType::valid_codes()
                ),
            },
        },
        ResourceRoute::Domains(None) => {
            let origins = client.get_domain_origins().await?;
            json_contents(uri, &origins)?
        }
        ResourceRoute::Domains(Some(origin)) => {
            let domains = client.get_domains(&origin).await?;
            json_contents(uri, &domains)?
        }
    };

    Ok(contents)
}

fn json_contents<T: Serialize>(uri: &str, value: &T) -> Result<ResourceContents, EkilexError> {
    Ok(ResourceContents {
        uri: uri.to_string(),
        mime_type: JSON_MIME.to_string(),
        text: serde_json::to_string_pretty(value)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_datasets() {
        assert_eq!(
            ResourceRoute::parse("ekilex://datasets"),
            Some(ResourceRoute::Datasets)
        );
        assert_eq!(ResourceRoute::parse("ekilex://datasets/extra"), None);
    }

    #[test]
    fn test_parse_classifiers() {
        assert_eq!(
            ResourceRoute::parse("ekilex://classifiers/POS"),
            Some(ResourceRoute::Classifiers("POS".to_string()))
        );
        assert_eq!(ResourceRoute::parse("ekilex://classifiers/"), None);
        assert_eq!(ResourceRoute::parse("ekilex://classifiers"), None);
    }

    #[test]
    fn test_parse_domains_with_and_without_origin() {
        assert_eq!(
            ResourceRoute::parse("ekilex://domains/eki"),
            Some(ResourceRoute::Domains(Some("eki".to_string())))
        );
        assert_eq!(
            ResourceRoute::parse("ekilex://domains/"),
            Some(ResourceRoute::Domains(None))
        );
        assert_eq!(
            ResourceRoute::parse("ekilex://domains"),
            Some(ResourceRoute::Domains(None))
        );
    }

    #[test]
    fn test_parse_decodes_segments() {
        assert_eq!(
            ResourceRoute::parse("ekilex://domains/my%20origin"),
            Some(ResourceRoute::Domains(Some("my origin".to_string())))
        );
    }

    #[test]
    fn test_parse_rejects_foreign_uris() {
        assert_eq!(ResourceRoute::parse("file:///etc/passwd"), None);
        assert_eq!(ResourceRoute::parse("ekilex://words/1"), None);
        assert_eq!(ResourceRoute::parse("ekilex://domains/a/b"), None);
    }

    #[test]
    fn test_listings() {
        let defs = get_resource_definitions();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].uri, DATASETS_URI);

        let templates = get_resource_templates();
        let uris: Vec<&str> = templates.iter().map(|t| t.uri_template.as_str()).collect();
        assert_eq!(uris, vec![CLASSIFIERS_TEMPLATE, DOMAINS_TEMPLATE]);

        let json = serde_json::to_value(&templates[0]).unwrap();
        assert!(json.get("uriTemplate").is_some());
        assert_eq!(json["mimeType"], "application/json");
    }
}
