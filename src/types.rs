use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Decodes a list that may be absent or `null` as an empty vector.
fn nullable_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Response wrapper used by every Ekilex endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

/// One row of a word search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordSearchResult {
    pub word_id: i64,
    pub word_value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_value_prese: Option<String>,
    pub lang: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homonym_nr: Option<i64>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub word_type_codes: Vec<String>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub dataset_codes: Vec<String>,
    /// Fields the remote service sent that this crate does not model.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A morphological inflection of a word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub morph_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub morph_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_form: Option<String>,
}

/// Meaning embedded in a lexeme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meaning {
    pub meaning_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition_lang: Option<String>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub domain_codes: Vec<String>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub register_codes: Vec<String>,
}

/// Usage example sentence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Usage {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub usage_translations: Vec<String>,
}

/// A sense of a word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lexeme {
    pub lexeme_id: i64,
    pub meaning_id: i64,
    pub word_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meaning: Option<Meaning>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub usages: Vec<Usage>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub pos: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Complete entry for one word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordDetails {
    pub word_id: i64,
    pub word_value: String,
    pub lang: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homonym_nr: Option<i64>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub word_type_codes: Vec<String>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub forms: Vec<Form>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub lexemes: Vec<Lexeme>,
}

/// One row of a meaning search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeaningSearchResult {
    pub meaning_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub word_values: Vec<String>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub domain_codes: Vec<String>,
}

/// A word attached to a meaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeaningWord {
    pub word_id: i64,
    pub word_value: String,
    pub lang: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homonym_nr: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeaningDefinition {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

/// Complete entry for one meaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeaningDetails {
    pub meaning_id: i64,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub definitions: Vec<MeaningDefinition>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub words: Vec<MeaningWord>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub domain_codes: Vec<String>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub register_codes: Vec<String>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub notes: Vec<String>,
}

/// A dictionary dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub code: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A classifier value (part of speech, register, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classifier {
    pub code: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub classifier_type: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A subject domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    pub code: String,
    pub value: String,
    pub origin: String,
}

/// Classifier families known to Ekilex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassifierType {
    Pos,
    Morph,
    Domain,
    Register,
    Deriv,
    ValueState,
}

#[allow(clippy::should_implement_trait)]
impl ClassifierType {
    /// Every classifier type, in the order they are presented to callers.
    pub const ALL: [ClassifierType; 6] = [
        ClassifierType::Pos,
        ClassifierType::Morph,
        ClassifierType::Domain,
        ClassifierType::Register,
        ClassifierType::Deriv,
        ClassifierType::ValueState,
    ];

    /// Returns the code used in API paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassifierType::Pos => "POS",
            ClassifierType::Morph => "MORPH",
            ClassifierType::Domain => "DOMAIN",
            ClassifierType::Register => "REGISTER",
            ClassifierType::Deriv => "DERIV",
            ClassifierType::ValueState => "VALUE_STATE",
        }
    }

    /// Parses a type code, returning `None` for unrecognized values.
    pub fn from_str(s: &str) -> Option<ClassifierType> {
        match s {
            "POS" => Some(ClassifierType::Pos),
            "MORPH" => Some(ClassifierType::Morph),
            "DOMAIN" => Some(ClassifierType::Domain),
            "REGISTER" => Some(ClassifierType::Register),
            "DERIV" => Some(ClassifierType::Deriv),
            "VALUE_STATE" => Some(ClassifierType::ValueState),
            _ => None,
        }
    }

    /// Human-readable heading for listings of this type.
    pub fn description(&self) -> &'static str {
        match self {
            ClassifierType::Pos => {
                "Parts of Speech - grammatical categories like noun, verb, adjective"
            }
            ClassifierType::Morph => {
                "Morphological Codes - inflection patterns and grammatical forms"
            }
            ClassifierType::Domain => "Subject Domains - topic areas like medicine, law, technology",
            ClassifierType::Register => {
                "Language Registers - usage contexts like formal, colloquial, slang"
            }
            ClassifierType::Deriv => "Derivation Types - word formation patterns",
            ClassifierType::ValueState => "Value States - status indicators for lexical entries",
        }
    }

    /// Comma-separated list of all valid codes.
    pub fn valid_codes() -> String {
        Self::ALL
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
