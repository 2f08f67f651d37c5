//! Codec services turn request and response bodies into values and back.
//!
//! The dispatcher never calls a codec itself; it hands the configured
//! service to every [`Context`](crate::context::Context) so handlers can
//! use it.
use std::error;
use std::fmt;

use serde_json::Value;

pub mod json;

pub use json::JsonCodecService;

/// Implement this trait to plug a body format into the handlers.
pub trait CodecService: Send + Sync {
    /// Content-Type written alongside marshalled bodies.
    fn content_type(&self) -> &str;
    fn marshal(&self, value: &Value) -> Result<Vec<u8>, CodecError>;
    fn unmarshal(&self, bytes: &[u8]) -> Result<Value, CodecError>;
}

#[derive(Debug)]
pub struct CodecError {
    content_type: String,
    reason: String,
}

impl CodecError {
    pub fn new(content_type: &str, reason: &str) -> Self {
        Self {
            content_type: content_type.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{} codec error: {}", self.content_type, self.reason)
    }
}

impl error::Error for CodecError {}
