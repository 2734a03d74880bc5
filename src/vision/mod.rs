//! Cloud Vision text detection.
//!
//! This module turns a classified image reference into an `images:annotate`
//! call: it validates the image bytes, builds the request envelope and
//! performs the HTTPS exchange.
//!
//! # Submodules
//!
//! - `models`: Image format detection from magic bytes.
//! - `request`: Request envelope construction and context normalization.
//! - `client`: The `VisionClient` and its per-source readers.
//!
//! Author: kelexine (<https://github.com/kelexine>)

mod client;
pub mod models;
pub mod request;

pub use client::{referer_for, ApiKey, ReadOptions, VisionClient};
pub use models::ImageFormat;
pub use request::{
    create_body, create_context, create_sub_context, ContextShape, ImageContext, RequestEnvelope,
};
