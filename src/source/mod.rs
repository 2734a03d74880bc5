//! Image source classification.
//!
//! Callers hand `read_image` an opaque value: a link, a path on disk, raw
//! image bytes, or base64 text. This module decides which one it is.
//!
//! The decision is an ordered rule table, evaluated top to bottom with the
//! first match winning:
//!
//! 1. `Url` - an `http://` or `https://` link.
//! 2. `FilePath` - a short, slash- or drive-prefixed string (see [`is_file`]).
//! 3. `RawBinary` - non-text content.
//! 4. `Base64` - text that decodes as base64.
//!
//! A string such as `/abc` is both path-shaped and valid base64; it is a path.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use crate::error::{Result, VisionError};
use crate::utils::strings::{is_base64, is_binary, is_http_url};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Longest input (in bytes, exclusive) still considered a filesystem path.
pub const MAX_PATH_LENGTH: usize = 256;

/// A classified image reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Url(String),
    FilePath(String),
    Base64(String),
    RawBinary(Vec<u8>),
}

/// The variant tag of an [`ImageSource`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Url,
    FilePath,
    RawBinary,
    Base64,
}

impl ImageSource {
    pub fn kind(&self) -> SourceKind {
        match self {
            ImageSource::Url(_) => SourceKind::Url,
            ImageSource::FilePath(_) => SourceKind::FilePath,
            ImageSource::Base64(_) => SourceKind::Base64,
            ImageSource::RawBinary(_) => SourceKind::RawBinary,
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceKind::Url => "url",
            SourceKind::FilePath => "file path",
            SourceKind::RawBinary => "raw binary",
            SourceKind::Base64 => "base64",
        };
        f.write_str(name)
    }
}

/// One entry of the classification table.
pub struct ClassificationRule {
    pub kind: SourceKind,
    pub matches: fn(&[u8]) -> bool,
    build: fn(&[u8]) -> ImageSource,
}

/// Classification rules in priority order.
pub const CLASSIFICATION_RULES: [ClassificationRule; 4] = [
    ClassificationRule {
        kind: SourceKind::Url,
        matches: is_http_url,
        build: build_url,
    },
    ClassificationRule {
        kind: SourceKind::FilePath,
        matches: is_file,
        build: build_file_path,
    },
    ClassificationRule {
        kind: SourceKind::RawBinary,
        matches: is_binary,
        build: build_raw_binary,
    },
    ClassificationRule {
        kind: SourceKind::Base64,
        matches: is_base64,
        build: build_base64,
    },
];

fn build_url(input: &[u8]) -> ImageSource {
    ImageSource::Url(String::from_utf8_lossy(input).into_owned())
}

fn build_file_path(input: &[u8]) -> ImageSource {
    ImageSource::FilePath(String::from_utf8_lossy(input).into_owned())
}

fn build_raw_binary(input: &[u8]) -> ImageSource {
    ImageSource::RawBinary(input.to_vec())
}

fn build_base64(input: &[u8]) -> ImageSource {
    ImageSource::Base64(String::from_utf8_lossy(input).into_owned())
}

static PATH_PATTERN: OnceLock<Regex> = OnceLock::new();

fn get_path_regex() -> &'static Regex {
    PATH_PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^([A-Z]+:)?[/\\]+[A-Z0-9]+").expect("Invalid regex pattern")
    })
}

/// Heuristic "looks like a filesystem path" check.
///
/// The input must be text, must not be a URL, must be shorter than
/// [`MAX_PATH_LENGTH`] and must start with an optional drive letter followed
/// by at least one slash or backslash and an alphanumeric character.
/// Relative paths such as `image.png` do not qualify. Existence is not checked.
pub fn is_file(input: &[u8]) -> bool {
    if is_binary(input) || is_http_url(input) || input.len() >= MAX_PATH_LENGTH {
        return false;
    }

    std::str::from_utf8(input)
        .map(|s| get_path_regex().is_match(s))
        .unwrap_or(false)
}

/// Classify an input by walking [`CLASSIFICATION_RULES`] in order.
pub fn classify(input: impl AsRef<[u8]>) -> Result<ImageSource> {
    let input = input.as_ref();

    CLASSIFICATION_RULES
        .iter()
        .find(|rule| (rule.matches)(input))
        .map(|rule| (rule.build)(input))
        .ok_or_else(|| {
            let kinds: Vec<String> = CLASSIFICATION_RULES
                .iter()
                .map(|rule| rule.kind.to_string())
                .collect();
            VisionError::Classification(format!(
                "input of {} bytes matches none of: {}",
                input.len(),
                kinds.join(", ")
            ))
        })
}
