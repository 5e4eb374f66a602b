use std::fmt;

use clap::{Args, ValueEnum};
use tracing::level_filters::LevelFilter;
use ureq::http::Uri;

use crate::errors::{EkilexError, Result};

/// Public Ekilex endpoint used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://ekilex.eki.ee";

/// Default request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Default port for the HTTP transport.
pub const DEFAULT_HTTP_PORT: u16 = 3000;

/// Default bind host for the HTTP transport.
pub const DEFAULT_HTTP_HOST: &str = "localhost";

/// Raw settings as supplied on the command line or through the environment.
///
/// Every value is kept as text so that all problems can be reported together
/// by [`Config::from_args`].
#[derive(Args, Debug, Clone, PartialEq)]
pub struct ConfigArgs {
    /// Ekilex API key
    #[arg(long, env = "EKILEX_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Ekilex API base URL
    #[arg(long, env = "EKILEX_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Request timeout in milliseconds
    #[arg(long, env = "EKILEX_TIMEOUT", default_value = "30000")]
    pub timeout: String,

    /// Log level (debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Transport (stdio or http)
    #[arg(long, env = "MCP_TRANSPORT", default_value = "stdio")]
    pub transport: String,

    /// HTTP port, used with the http transport
    #[arg(long, env = "MCP_HTTP_PORT", default_value = "3000")]
    pub http_port: String,

    /// HTTP host, used with the http transport
    #[arg(long, env = "MCP_HTTP_HOST", default_value = DEFAULT_HTTP_HOST)]
    pub http_host: String,
}

impl Default for ConfigArgs {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT_MS.to_string(),
            log_level: "info".to_string(),
            transport: "stdio".to_string(),
            http_port: DEFAULT_HTTP_PORT.to_string(),
            http_host: DEFAULT_HTTP_HOST.to_string(),
        }
    }
}

/// Log verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

/// How MCP frames reach the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TransportKind {
    Stdio,
    Http,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportKind::Stdio => f.write_str("stdio"),
            TransportKind::Http => f.write_str("http"),
        }
    }
}

/// Validated server configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    pub timeout_ms: u64,
    pub log_level: LogLevel,
    pub transport: TransportKind,
    pub http_port: u16,
    pub http_host: String,
}

impl Config {
    /// Validates raw settings, collecting every problem into one `Config` error.
    pub fn from_args(args: ConfigArgs) -> Result<Config> {
        let mut problems: Vec<String> = Vec::new();

        let api_key = args
            .api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        if api_key.is_none() {
            problems.push(
                "apiKey: EKILEX_API_KEY is required. Get your API key from https://ekilex.eki.ee after creating an account."
                    .to_string(),
            );
        }

        if let Err(e) = validate_base_url(&args.base_url) {
            problems.push(e);
        }

        let timeout_ms = match args.timeout.trim().parse::<u64>() {
            Ok(ms) if ms > 0 => Some(ms),
            _ => {
                problems.push(format!(
                    "timeout: expected a positive number of milliseconds, got '{}'",
                    args.timeout
                ));
                None
            }
        };

        let log_level = parse_choice::<LogLevel>("logLevel", &args.log_level)
            .map_err(|e| problems.push(e))
            .ok();

        let transport = parse_choice::<TransportKind>("transport", &args.transport)
            .map_err(|e| problems.push(e))
            .ok();

        let http_port = match args.http_port.trim().parse::<u16>() {
            Ok(port) if port >= 1 => Some(port),
            _ => {
                problems.push(format!(
                    "httpPort: expected an integer between 1 and 65535, got '{}'",
                    args.http_port
                ));
                None
            }
        };

        match (api_key, timeout_ms, log_level, transport, http_port) {
            (Some(api_key), Some(timeout_ms), Some(log_level), Some(transport), Some(http_port))
                if problems.is_empty() =>
            {
                Ok(Config {
                    api_key,
                    base_url: args.base_url.trim().to_string(),
                    timeout_ms,
                    log_level,
                    transport,
                    http_port,
                    http_host: args.http_host,
                })
            }
            _ => Err(EkilexError::Config {
                message: problems.join(", "),
            }),
        }
    }
}

/// Parses one of the enum's clap values, naming `field` and the choices on failure.
fn parse_choice<T: ValueEnum>(field: &str, raw: &str) -> std::result::Result<T, String> {
    <T as ValueEnum>::from_str(raw.trim(), false).map_err(|_| {
        let choices: Vec<String> = T::value_variants()
            .iter()
            .filter_map(|v| v.to_possible_value())
            .map(|v| v.get_name().to_string())
            .collect();
        format!(
            "{}: expected one of {}, got '{}'",
            field,
            choices.join(", "),
            raw
        )
    })
}

/// Accepts absolute http(s) URLs with a host.
fn validate_base_url(raw: &str) -> std::result::Result<(), String> {
    let invalid = || format!("baseUrl: '{}' is not a valid URL", raw);
    let uri: Uri = raw.trim().parse().map_err(|_| invalid())?;
    match (uri.scheme_str(), uri.host()) {
        (Some("http") | Some("https"), Some(host)) if !host.is_empty() => Ok(()),
        _ => Err(invalid()),
    }
}
