// Error types for vision-ocr
// Author: kelexine (https://github.com/kelexine)

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VisionError {
    #[error("Unrecognized image source: {0}")]
    Classification(String),

    #[error("{message}")]
    InvalidArgument {
        message: String,
        #[source]
        source: Option<Box<VisionError>>,
    },

    #[error("Malformed context: {0}")]
    MalformedContext(String),

    #[error("Vision API error: HTTP {status}: {message}")]
    VisionApi { status: u16, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Config parsing error: {0}")]
    ConfigParsing(#[from] config::ConfigError),
}

impl VisionError {
    /// Build an `InvalidArgument` error with no underlying cause.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        VisionError::InvalidArgument {
            message: message.into(),
            source: None,
        }
    }

    /// Re-raise any error as `InvalidArgument`, keeping the original as its source.
    pub fn into_invalid_argument(self) -> Self {
        VisionError::InvalidArgument {
            message: self.to_string(),
            source: Some(Box::new(self)),
        }
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, VisionError::InvalidArgument { .. })
    }

    /// The wrapped error of an `InvalidArgument`, if any.
    pub fn cause(&self) -> Option<&VisionError> {
        match self {
            VisionError::InvalidArgument { source, .. } => source.as_deref(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, VisionError>;
