//! HTTP request extractors with JSON error responses.
//!
//! Drop-in replacements for the standard axum extractors whose rejections
//! are converted into [`handler::Error`] so every failure, malformed input
//! included, reaches the client as the same JSON error body.
//!
//! - [`Json`] - JSON body deserialization
//! - [`ValidateJson`] - JSON body deserialization followed by `validator` checks
//! - [`Path`] - path parameter extraction
//!
//! [`handler::Error`]: crate::handler::Error

pub mod reject;

pub use crate::extract::reject::{Json, Path, ValidateJson};
