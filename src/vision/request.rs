//! Request envelope construction for `images:annotate`.
//!
//! The provider accepts the same request in several equivalent shapes. Callers
//! may pass any of them; everything is normalized to the canonical envelope
//! `{"requests": [ {...}, ... ]}` before it reaches the wire.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use crate::error::{Result, VisionError};
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Feature requested from the provider.
pub const TEXT_DETECTION: &str = "TEXT_DETECTION";

/// Default `maxResults` for text detection.
pub const DEFAULT_MAX_RESULTS: u32 = 10;

/// Provider-specific `imageContext` parameters, passed through untouched.
pub type ImageContext = Map<String, Value>;

/// The canonical request envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestEnvelope {
    pub requests: Vec<Map<String, Value>>,
}

/// A single per-image request (a sub-context).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotateImageRequest {
    pub image: ImageContent,
    pub features: Feature,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_context: Option<ImageContext>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageContent {
    /// Base64 of the raw image bytes.
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,
    pub max_results: u32,
}

/// The accepted input shapes for [`create_context`].
#[derive(Debug, Clone, PartialEq)]
pub enum ContextShape {
    /// `{"requests": [...]}`
    Envelope(Vec<Value>),
    /// `{"image": {...}, ...}`, one request without the wrapper
    Single(Map<String, Value>),
    /// `[{...}, ...]`, the requests list without the wrapper
    Batch(Vec<Value>),
}

impl TryFrom<Value> for ContextShape {
    type Error = VisionError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(mut map) => {
                if let Some(requests) = map.remove("requests") {
                    return match requests {
                        Value::Array(items) => Ok(ContextShape::Envelope(items)),
                        other => Err(VisionError::MalformedContext(format!(
                            "Context requests must be an array, {} given",
                            json_type_name(&other)
                        ))),
                    };
                }

                match map.get("image") {
                    Some(Value::Object(_)) => Ok(ContextShape::Single(map)),
                    Some(other) => Err(VisionError::MalformedContext(format!(
                        "Sub context image must be an object, {} given",
                        json_type_name(other)
                    ))),
                    None => Err(VisionError::MalformedContext(
                        "Sub context must contain an image object".to_string(),
                    )),
                }
            }
            Value::Array(items) => Ok(ContextShape::Batch(items)),
            other => Err(VisionError::MalformedContext(format!(
                "Context must be an object or an array, {} given",
                json_type_name(&other)
            ))),
        }
    }
}

impl ContextShape {
    /// Normalize into the canonical envelope.
    pub fn into_envelope(self) -> Result<RequestEnvelope> {
        let items = match self {
            ContextShape::Envelope(items) | ContextShape::Batch(items) => items,
            ContextShape::Single(map) => create_sub_context(Value::Object(map)),
        };

        if items.is_empty() {
            return Err(VisionError::MalformedContext(
                "Sub context requests must be an object, none given".to_string(),
            ));
        }

        let requests = items
            .into_iter()
            .map(|item| match item {
                Value::Object(map) => Ok(map),
                other => Err(VisionError::MalformedContext(format!(
                    "Sub context requests must be an object, {} given",
                    json_type_name(&other)
                ))),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(RequestEnvelope { requests })
    }
}

/// Normalize any accepted context shape into the canonical envelope.
pub fn create_context(raw: Value) -> Result<RequestEnvelope> {
    ContextShape::try_from(raw)?.into_envelope()
}

/// Wrap a single sub-context into a requests list. No validation.
pub fn create_sub_context<T>(context: T) -> Vec<T> {
    vec![context]
}

/// Build the serialized JSON body for a text detection request.
///
/// `context` is attached as `imageContext` only when it is non-empty.
pub fn create_body(
    image: &[u8],
    max_results: u32,
    context: Option<&ImageContext>,
) -> Result<Vec<u8>> {
    let request = AnnotateImageRequest {
        image: ImageContent {
            content: base64::engine::general_purpose::STANDARD.encode(image),
        },
        features: Feature {
            kind: TEXT_DETECTION.to_string(),
            max_results,
        },
        image_context: context.filter(|c| !c.is_empty()).cloned(),
    };

    let sub_context = serde_json::to_value(request)?;
    let envelope = create_context(Value::Array(create_sub_context(sub_context)))?;

    Ok(serde_json::to_vec(&envelope)?)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
