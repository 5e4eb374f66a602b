use thiserror::Error;

/// Errors that can occur while talking to the Ekilex API or serving MCP requests.
#[derive(Error, Debug)]
pub enum EkilexError {
    #[error("{message}")]
    Api {
        message: String,
        status: Option<u16>,
    },

    #[error("Your Ekilex API key is invalid. Please check your EKILEX_API_KEY configuration.")]
    InvalidApiKey,

    #[error("Ekilex API rate limit reached. {}", rate_limit_hint(.retry_after))]
    RateLimited { retry_after: Option<u64> },

    #[error("Ekilex API is temporarily unavailable. Please try again later.")]
    ServiceUnavailable { cause: Option<String> },

    #[error("Request to Ekilex API timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Invalid configuration: {message}")]
    Config { message: String },

    #[error("{0}")]
    Transport(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

fn rate_limit_hint(retry_after: &Option<u64>) -> String {
    match retry_after {
        Some(secs) => format!("Please wait {} seconds before retrying.", secs),
        None => "Please wait before retrying.".to_string(),
    }
}

impl EkilexError {
    /// Stable machine-readable code for the errors the API client produces.
    ///
    /// Returns `None` for configuration, I/O and untyped transport failures.
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Self::Api { .. } => Some("EKILEX_API_ERROR"),
            Self::InvalidApiKey => Some("API_KEY_INVALID"),
            Self::RateLimited { .. } => Some("RATE_LIMITED"),
            Self::ServiceUnavailable { .. } => Some("EKILEX_UNAVAILABLE"),
            Self::Timeout { .. } => Some("TIMEOUT"),
            Self::Config { .. } | Self::Transport(_) | Self::Io(_) | Self::Json(_) => None,
        }
    }

    /// Builds a generic API error without an HTTP status.
    pub fn api(message: impl Into<String>) -> Self {
        Self::Api {
            message: message.into(),
            status: None,
        }
    }
}

/// Renders an error as the single line of text a tool returns in-band.
pub fn format_error_for_mcp(error: &EkilexError) -> String {
    let message = error.to_string();
    match error.code() {
        Some(code) => format!("Error [{}]: {}", code, message),
        None if message.is_empty() => "An unexpected error occurred.".to_string(),
        None => format!("Error: {}", message),
    }
}

/// Convenience alias for results using `EkilexError`.
pub type Result<T> = std::result::Result<T, EkilexError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_message_with_retry_after() {
        let err = EkilexError::RateLimited {
            retry_after: Some(60),
        };
        assert_eq!(
            err.to_string(),
            "Ekilex API rate limit reached. Please wait 60 seconds before retrying."
        );
    }

    #[test]
    fn test_rate_limit_message_without_retry_after() {
        let err = EkilexError::RateLimited { retry_after: None };
        assert_eq!(
            err.to_string(),
            "Ekilex API rate limit reached. Please wait before retrying."
        );
    }

    #[test]
    fn test_timeout_message_mentions_duration() {
        let err = EkilexError::Timeout { timeout_ms: 100 };
        assert_eq!(err.to_string(), "Request to Ekilex API timed out after 100ms");
    }

    #[test]
    fn test_format_typed_error() {
        let text = format_error_for_mcp(&EkilexError::InvalidApiKey);
        assert!(text.starts_with("Error [API_KEY_INVALID]: "));
        assert!(text.contains("EKILEX_API_KEY"));
    }

    #[test]
    fn test_format_api_error() {
        let text = format_error_for_mcp(&EkilexError::api("Bad request"));
        assert_eq!(text, "Error [EKILEX_API_ERROR]: Bad request");
    }

    #[test]
    fn test_format_untyped_error() {
        let text = format_error_for_mcp(&EkilexError::Transport("socket closed".to_string()));
        assert_eq!(text, "Error: socket closed");
    }

    #[test]
    fn test_format_empty_untyped_error() {
        let text = format_error_for_mcp(&EkilexError::Transport(String::new()));
        assert_eq!(text, "An unexpected error occurred.");
    }

    #[test]
    fn test_config_error_has_no_code() {
        let err = EkilexError::Config {
            message: "x".to_string(),
        };
        assert!(err.code().is_none());
    }
}
