//! Built-in encoders.

use serde_json::Value;

use crate::error::EncodeError;

/// Serializes a response payload into body bytes.
pub trait Encoder: Send + Sync + 'static {
    fn encode(&self, data: &Value) -> Result<Vec<u8>, EncodeError>;
}

impl<F> Encoder for F
where
    F: Fn(&Value) -> Result<Vec<u8>, EncodeError> + Send + Sync + 'static,
{
    fn encode(&self, data: &Value) -> Result<Vec<u8>, EncodeError> {
        self(data)
    }
}

pub const APPLICATION_JSON: &str = "application/json";
pub const TEXT_PLAIN: &str = "text/plain";

/// Compact JSON, keys in insertion order.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEncoder;

impl Encoder for JsonEncoder {
    fn encode(&self, data: &Value) -> Result<Vec<u8>, EncodeError> {
        Ok(serde_json::to_vec(data)?)
    }
}

/// Passes a string payload through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextEncoder;

impl Encoder for PlainTextEncoder {
    fn encode(&self, data: &Value) -> Result<Vec<u8>, EncodeError> {
        match data {
            Value::String(text) => Ok(text.as_bytes().to_vec()),
            _ => Err(EncodeError::UnsupportedData {
                mime_type: TEXT_PLAIN.to_string(),
                expected: "a string",
            }),
        }
    }
}
