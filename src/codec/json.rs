//! JSON codec backed by [`serde_json`](serde_json).
use serde_json::Value;

use crate::codec::{CodecError, CodecService};

const APPLICATION_JSON: &str = "application/json";

#[derive(Debug, Default, Clone)]
pub struct JsonCodecService {
    pretty: bool,
}

impl JsonCodecService {
    pub fn new() -> Self {
        Self { pretty: false }
    }
    /// Indent marshalled output.
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl CodecService for JsonCodecService {
    fn content_type(&self) -> &str {
        APPLICATION_JSON
    }

    fn marshal(&self, value: &Value) -> Result<Vec<u8>, CodecError> {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(value)
        } else {
            serde_json::to_vec(value)
        };
        match bytes {
            Ok(bytes) => Ok(bytes),
            Err(e) => Err(CodecError::new(APPLICATION_JSON, &e.to_string())),
        }
    }

    fn unmarshal(&self, bytes: &[u8]) -> Result<Value, CodecError> {
        match serde_json::from_slice(bytes) {
            Ok(value) => Ok(value),
            Err(e) => Err(CodecError::new(APPLICATION_JSON, &e.to_string())),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_marshal() {
        let codec = JsonCodecService::new();
        let bytes = codec.marshal(&json!({"name": "John"})).unwrap();
        assert_eq!(bytes, b"{\"name\":\"John\"}".to_vec());
    }

    #[test]
    fn test_marshal_pretty() {
        let codec = JsonCodecService::pretty();
        let bytes = codec.marshal(&json!({"name": "John"})).unwrap();
        assert_eq!(bytes, b"{\n  \"name\": \"John\"\n}".to_vec());
    }

    #[test]
    fn test_unmarshal_invalid() {
        let codec = JsonCodecService::new();
        let err = codec.unmarshal(b"{not json").unwrap_err();
        assert!(err.to_string().starts_with("application/json codec error: "));
    }
}
