//! Structured logging and security-focused trace utilities.
//!
//! This module configures the `tracing` ecosystem for the application and
//! provides a helper that keeps Google API keys out of log output.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use crate::config::LoggingConfig;
use crate::error::Result;
use regex::Regex;
use std::sync::OnceLock;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initializes the global tracing subscriber for the application.
///
/// Supports two output formats:
/// - `json`: Structured JSON logs for machine ingestion.
/// - `pretty` (default): Human-readable output.
///
/// Logs go to stderr so that stdout stays reserved for the OCR result.
/// Log levels are controlled via the `RUST_LOG` environment variable or
/// the provided `LoggingConfig`.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
    }

    Ok(())
}

static KEY_PARAM: OnceLock<Regex> = OnceLock::new();
static API_KEY_TOKEN: OnceLock<Regex> = OnceLock::new();

/// Sanitizes API keys from log messages.
///
/// Replaces the value of any `key=` query parameter and any bare Google API
/// key (`AIza...`) with a `\[REDACTED\]` placeholder.
pub fn sanitize(input: &str) -> String {
    let key_param = KEY_PARAM
        .get_or_init(|| Regex::new(r"([?&]key=)[^&\s]*").expect("Invalid regex pattern"));
    let api_key = API_KEY_TOKEN
        .get_or_init(|| Regex::new(r"AIza[0-9A-Za-z_\-]{10,}").expect("Invalid regex pattern"));

    let result = key_param.replace_all(input, "${1}[REDACTED]");
    api_key.replace_all(&result, "[REDACTED_API_KEY]").into_owned()
}
