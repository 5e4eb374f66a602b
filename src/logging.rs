//! Tracing setup for the server binary.
//!
//! All log output goes to stderr: under the stdio transport stdout carries
//! protocol frames and must not be interleaved with log lines.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LogLevel;

/// Environment variable that may override the configured level with a full filter.
pub const LOG_FILTER_ENV: &str = "EKILEX_LOG";

/// Builds the filter used by [`init`]: the configured level as the default
/// directive, refined by `EKILEX_LOG` when present.
pub fn build_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(tracing::level_filters::LevelFilter::from(level).into())
        .with_env_var(LOG_FILTER_ENV)
        .from_env_lossy()
}

/// Installs the global subscriber. Calling it twice is harmless.
pub fn init(level: LogLevel) {
    let result = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(build_filter(level))
        .try_init();

    if let Err(e) = result {
        eprintln!("failed to initialise logging: {}", e);
    }
}
