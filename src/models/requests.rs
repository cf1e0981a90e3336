//! Request DTOs for the cache server API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use serde::Deserialize;

use crate::cache::{Value, MAX_VALUE_SIZE};

/// Request body for the STORE operation (PUT /store)
///
/// # Fields
/// - `value`: A string, integer, float, or array of bytes
/// - `bytes`: An array of bytes, stored as is
///
/// Exactly one of the two must be present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreRequest {
    /// The value to store
    pub value: Option<Value>,
    /// Raw bytes to store
    pub bytes: Option<Vec<u8>>,
}

impl StoreRequest {
    /// Validates the request and returns the value to store.
    ///
    /// Returns an error message if both or neither field is set, or if the
    /// value is too large.
    pub fn into_value(self) -> std::result::Result<Value, String> {
        let value = match (self.value, self.bytes) {
            (Some(value), None) => value,
            (None, Some(bytes)) => Value::Bytes(bytes),
            (Some(_), Some(_)) => {
                return Err("Provide either `value` or `bytes`, not both".to_string())
            }
            (None, None) => return Err("Missing `value` or `bytes`".to_string()),
        };

        if value.len() > MAX_VALUE_SIZE {
            return Err(format!(
                "Value exceeds maximum size of {} bytes",
                MAX_VALUE_SIZE
            ));
        }
        Ok(value)
    }
}

/// How GET /retrieve/:key decodes the stored bytes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decode {
    /// Raw bytes, rendered as lossy UTF-8
    #[default]
    Raw,
    /// UTF-8 text
    Text,
    /// Decimal integer
    Int,
    /// Floating-point number
    Float,
}

/// Query string for GET /retrieve/:key
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RetrieveQuery {
    /// Requested decoding, `raw` when omitted
    #[serde(default, rename = "as")]
    pub decode: Decode,
}

/// Query string for GET /fetch
#[derive(Debug, Clone, Deserialize)]
pub struct FetchQuery {
    /// URL to retrieve
    pub url: String,
}

impl FetchQuery {
    /// Validates the query
    pub fn validate(&self) -> Option<String> {
        if self.url.trim().is_empty() {
            return Some("URL cannot be empty".to_string());
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> std::result::Result<Value, String> {
        serde_json::from_str::<StoreRequest>(body).unwrap().into_value()
    }

    #[test]
    fn test_store_request_deserialize_each_type() {
        assert_eq!(parse(r#"{"value": "hello"}"#), Ok(Value::Text("hello".into())));
        assert_eq!(parse(r#"{"value": 42}"#), Ok(Value::Int(42)));
        assert_eq!(parse(r#"{"value": 1.5}"#), Ok(Value::Float(1.5)));
        assert_eq!(parse(r#"{"value": [0, 255]}"#), Ok(Value::Bytes(vec![0, 255])));
    }

    #[test]
    fn test_store_request_bytes_field() {
        assert_eq!(parse(r#"{"bytes": [104, 105]}"#), Ok(Value::Bytes(b"hi".to_vec())));
        assert_eq!(parse(r#"{"bytes": []}"#), Ok(Value::Bytes(vec![])));
    }

    #[test]
    fn test_store_request_needs_exactly_one_field() {
        assert!(parse(r#"{"value": "a", "bytes": [1]}"#).is_err());
        assert!(parse("{}").is_err());
    }

    #[test]
    fn test_store_request_rejects_objects() {
        assert!(serde_json::from_str::<StoreRequest>(r#"{"value": {"a": 1}}"#).is_err());
        assert!(serde_json::from_str::<StoreRequest>(r#"{"bytes": [256]}"#).is_err());
    }

    #[test]
    fn test_validate_value_size() {
        let req = StoreRequest {
            value: Some(Value::Text("x".repeat(MAX_VALUE_SIZE + 1))),
            ..Default::default()
        };
        assert!(req.into_value().is_err());

        let req = StoreRequest {
            bytes: Some(vec![0; MAX_VALUE_SIZE + 1]),
            ..Default::default()
        };
        assert!(req.into_value().is_err());

        let req = StoreRequest {
            value: Some(Value::Text("ok".into())),
            ..Default::default()
        };
        assert!(req.into_value().is_ok());
    }

    #[test]
    fn test_retrieve_query_default_and_named() {
        let query: RetrieveQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.decode, Decode::Raw);

        let query: RetrieveQuery = serde_json::from_str(r#"{"as": "int"}"#).unwrap();
        assert_eq!(query.decode, Decode::Int);
    }

    #[test]
    fn test_fetch_query_validate() {
        let query = FetchQuery { url: "  ".into() };
        assert!(query.validate().is_some());

        let query = FetchQuery {
            url: "http://example.com".into(),
        };
        assert!(query.validate().is_none());
    }
}
