// CLI module for vision-ocr
// Author: kelexine (https://github.com/kelexine)

use crate::error::{Result, VisionError};
use crate::vision::{create_context, ImageContext};
use clap::Parser;
use serde_json::Value;

/// vision-ocr - Run Google Cloud Vision text detection on an image
#[derive(Parser, Debug)]
#[command(name = "vision-ocr", version, about, long_about = None)]
pub struct Args {
    /// Image URL, file path, base64 text, or `-` to read image bytes from stdin
    pub input: String,

    /// Google API key (overrides the configured key)
    #[arg(long, env = "VISION_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Maximum number of text annotations to request
    #[arg(long)]
    pub max_results: Option<u32>,

    /// imageContext override as inline JSON, or `@path` to read it from a file
    #[arg(long)]
    pub context: Option<String>,

    /// Override the annotate endpoint URL
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Print the response as single-line JSON
    #[arg(long)]
    pub compact: bool,
}

/// Parse a `--context` argument into an `imageContext` object.
///
/// A full request (`{"image": ...}`) or envelope (`{"requests": [...]}`) is
/// also accepted; its first request's `imageContext` is used.
pub fn parse_context(raw: &str) -> Result<ImageContext> {
    let text = match raw.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path)?,
        None => raw.to_string(),
    };

    let value: Value = serde_json::from_str(&text)?;
    let is_request_shape = match &value {
        Value::Object(map) => map.contains_key("requests") || map.contains_key("image"),
        Value::Array(_) => true,
        _ => false,
    };

    if !is_request_shape {
        return match value {
            Value::Object(map) => Ok(map),
            _ => Err(VisionError::MalformedContext(
                "imageContext must be a JSON object".to_string(),
            )),
        };
    }

    let envelope = create_context(value)?;
    match envelope.requests.into_iter().next().and_then(|mut r| r.remove("imageContext")) {
        Some(Value::Object(map)) => Ok(map),
        Some(_) => Err(VisionError::MalformedContext(
            "imageContext must be a JSON object".to_string(),
        )),
        None => Ok(ImageContext::new()),
    }
}
