//! Configuration data structures for vision-ocr.
//!
//! This module defines the schema for the application settings: the upstream
//! Cloud Vision endpoint, the browser-like headers sent with each request,
//! transport policy, and logging.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use serde::{Deserialize, Serialize};

/// The root configuration object for the application.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Upstream Cloud Vision API settings.
    #[serde(default)]
    pub vision: VisionConfig,

    /// Logging and observability settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings for the upstream Cloud Vision connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisionConfig {
    /// Google API key. Required, usually supplied through the environment.
    /// Default: empty
    #[serde(default)]
    pub api_key: String,

    /// The `images:annotate` endpoint.
    /// Default: `https://content-vision.googleapis.com/v1/images:annotate`
    #[serde(default = "default_endpoint_url")]
    pub endpoint_url: String,

    /// Value of the `Referer` header on annotate requests.
    #[serde(default = "default_content_vision_host")]
    pub referer: String,

    /// Value of the `Origin` header on annotate requests.
    #[serde(default = "default_content_vision_host")]
    pub origin: String,

    /// Value of the `X-Referer` header.
    #[serde(default = "default_explorer_host")]
    pub explorer_referer: String,

    /// Value of the `X-Origin` header.
    #[serde(default = "default_explorer_host")]
    pub explorer_origin: String,

    /// Desktop browser user agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Value of the `Language` header.
    #[serde(default = "default_language")]
    pub language: String,

    /// Total request timeout in seconds.
    /// Default: `60`
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Connection timeout in seconds.
    /// Default: `5`
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,

    /// Skip TLS certificate verification.
    /// Default: `true`
    #[serde(default = "default_true")]
    pub accept_invalid_certs: bool,

    /// Bind outgoing connections to an IPv4 local address.
    /// Default: `true`
    #[serde(default = "default_true")]
    pub force_ipv4: bool,

    /// Keep cookies across calls.
    /// Default: `true`
    #[serde(default = "default_true")]
    pub cookie_store: bool,

    /// `maxResults` used when the caller does not pass one.
    /// Default: `10`
    #[serde(default = "default_max_results")]
    pub default_max_results: u32,
}

/// Settings for application logging and output format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum log level (`trace`, `debug`, `info`, `warn`, `error`).
    /// Default: `warn`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format for logs (`pretty`, `json`).
    /// Default: `pretty`
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint_url: default_endpoint_url(),
            referer: default_content_vision_host(),
            origin: default_content_vision_host(),
            explorer_referer: default_explorer_host(),
            explorer_origin: default_explorer_host(),
            user_agent: default_user_agent(),
            language: default_language(),
            timeout_seconds: default_timeout(),
            connect_timeout_seconds: default_connect_timeout(),
            accept_invalid_certs: true,
            force_ipv4: true,
            cookie_store: true,
            default_max_results: default_max_results(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

// Helper functions for serde defaults
fn default_endpoint_url() -> String {
    "https://content-vision.googleapis.com/v1/images:annotate".to_string()
}

fn default_content_vision_host() -> String {
    "https://content-vision.googleapis.com".to_string()
}

fn default_explorer_host() -> String {
    "https://explorer.apis.google.com".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
        .to_string()
}

fn default_language() -> String {
    "en-US,en;q=0.9,id;q=0.8,fr;q=0.7".to_string()
}

fn default_true() -> bool {
    true
}

fn default_timeout() -> u64 {
    60
}

fn default_connect_timeout() -> u64 {
    5
}

fn default_max_results() -> u32 {
    10
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}
