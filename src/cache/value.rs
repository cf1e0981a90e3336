//! Cache Value Module
//!
//! The scalar and byte values a cache entry may hold, and the decoders that
//! turn stored bytes back into typed values.

use serde::{Deserialize, Serialize};

use crate::error::{CacheError, Result};

// == Value ==
/// A value accepted by [`Cache::store`](super::Cache::store).
///
/// Serializes untagged, so the recorded argument of a text value is `"foo"`
/// and that of an integer is `42`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Signed integer
    Int(i64),
    /// Floating-point number
    Float(f64),
    /// UTF-8 text
    Text(String),
    /// Arbitrary bytes
    Bytes(Vec<u8>),
}

impl Value {
    // == Byte Form ==
    /// Returns the bytes written to the backend.
    ///
    /// Numbers are written as their decimal text, so an integer stored as
    /// `42` reads back as the bytes `"42"`.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Value::Int(n) => n.to_string().into_bytes(),
            Value::Float(x) => float_text(*x).into_bytes(),
            Value::Text(s) => s.as_bytes().to_vec(),
            Value::Bytes(b) => b.clone(),
        }
    }

    // == Size ==
    /// Length of the byte form.
    pub fn len(&self) -> usize {
        match self {
            Value::Text(s) => s.len(),
            Value::Bytes(b) => b.len(),
            other => other.to_bytes().len(),
        }
    }

    /// Returns true if the byte form is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Shortest round-trip text of `x`, keeping a decimal point and writing
/// exponents with a sign and at least two digits (`1e+20`, `1.5e-05`).
fn float_text(x: f64) -> String {
    if x.is_nan() {
        return "nan".to_string();
    }
    let text = format!("{:?}", x);
    match text.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exp),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => text,
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Bytes(value)
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Value::Bytes(value.to_vec())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

// == Decoders ==
/// Decodes stored bytes as UTF-8 text.
pub fn decode_text(raw: Vec<u8>) -> Result<String> {
    String::from_utf8(raw).map_err(|e| CacheError::Decode(format!("not valid UTF-8: {}", e)))
}

/// Parses stored bytes as a decimal integer.
pub fn decode_int(raw: Vec<u8>) -> Result<i64> {
    let text = decode_text(raw)?;
    text.trim()
        .parse()
        .map_err(|_| CacheError::Decode(format!("invalid integer: {:?}", text)))
}

/// Parses stored bytes as a floating-point number.
pub fn decode_float(raw: Vec<u8>) -> Result<f64> {
    let text = decode_text(raw)?;
    text.trim()
        .parse()
        .map_err(|_| CacheError::Decode(format!("invalid float: {:?}", text)))
}
