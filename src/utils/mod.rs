//! Utility functions and helpers for vision-ocr.
//!
//! This module provides cross-cutting concerns: structured logging with
//! API key redaction, and the string predicates used to classify inputs.
//!
//! # Submodules
//!
//! - `logging`: Tracing initialization and log sanitization.
//! - `strings`: URL, binary and base64 detection.
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod logging;
pub mod strings;
