// String classification predicates
// Author: kelexine (https://github.com/kelexine)
//
// Cheap checks used to decide what kind of image reference a caller handed us.
// None of these touch the filesystem or the network.

use base64::Engine;
use regex::Regex;
use std::sync::OnceLock;

static HTTP_URL: OnceLock<Regex> = OnceLock::new();

fn get_http_url_regex() -> &'static Regex {
    HTTP_URL.get_or_init(|| Regex::new(r"(?i)^https?://\S+").expect("Invalid regex pattern"))
}

/// True when the input is UTF-8 and starts with an `http://` or `https://` scheme.
pub fn is_http_url(input: &[u8]) -> bool {
    std::str::from_utf8(input)
        .map(|s| get_http_url_regex().is_match(s))
        .unwrap_or(false)
}

/// True when the input looks like raw binary content rather than text.
///
/// Invalid UTF-8 counts as binary, as does any control character other than
/// tab, carriage return or line feed.
pub fn is_binary(input: &[u8]) -> bool {
    match std::str::from_utf8(input) {
        Err(_) => true,
        Ok(text) => text
            .chars()
            .any(|c| c.is_control() && !matches!(c, '\t' | '\r' | '\n')),
    }
}

/// Decode base64 text, ignoring embedded whitespace and accepting missing padding.
///
/// Returns `None` for empty input or anything outside the standard alphabet.
pub fn decode_base64(input: &[u8]) -> Option<Vec<u8>> {
    let compact: Vec<u8> = input
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();

    if compact.is_empty() {
        return None;
    }

    base64::engine::general_purpose::STANDARD
        .decode(&compact)
        .or_else(|_| base64::engine::general_purpose::STANDARD_NO_PAD.decode(&compact))
        .ok()
}

pub fn is_base64(input: &[u8]) -> bool {
    decode_base64(input).is_some()
}
