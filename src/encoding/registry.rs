//! MIME type → encoder table with a default fallback.
//!
//! # Design Decisions
//! - Only the first media type listed in `Accept` is considered; no q-values
//! - MIME types compare case-insensitively, parameters are not stripped
//! - The default MIME type always names a registered encoder

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::encoders::{Encoder, JsonEncoder, PlainTextEncoder, APPLICATION_JSON, TEXT_PLAIN};
use crate::error::{ConfigurationError, RoutingError};

pub type SharedEncoder = Arc<dyn Encoder>;

/// Encoder chosen for a response.
#[derive(Clone)]
pub struct SelectedEncoder {
    pub mime_type: String,
    pub encoder: SharedEncoder,
}

impl fmt::Debug for SelectedEncoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectedEncoder")
            .field("mime_type", &self.mime_type)
            .finish()
    }
}

pub struct EncoderRegistry {
    encoders: HashMap<String, SharedEncoder>,
    default_mime_type: Option<String>,
}

impl EncoderRegistry {
    /// Registry with no encoders and no default.
    pub fn empty() -> Self {
        Self {
            encoders: HashMap::new(),
            default_mime_type: None,
        }
    }

    /// Register (`Some`) or remove (`None`) the encoder for a MIME type.
    ///
    /// Removing the default's encoder also clears the default.
    pub fn register(&mut self, mime_type: &str, encoder: Option<SharedEncoder>) {
        let key = normalize(mime_type);
        match encoder {
            Some(encoder) => {
                self.encoders.insert(key, encoder);
            }
            None => {
                self.encoders.remove(&key);
                if self.default_mime_type.as_deref() == Some(key.as_str()) {
                    tracing::warn!(mime_type = %key, "Default encoder removed, no default MIME type set");
                    self.default_mime_type = None;
                }
            }
        }
    }

    pub fn set_default_mime_type(&mut self, mime_type: &str) -> Result<(), ConfigurationError> {
        let key = normalize(mime_type);
        if !self.encoders.contains_key(&key) {
            return Err(ConfigurationError::UnknownDefaultMimeType(mime_type.to_string()));
        }
        self.default_mime_type = Some(key);
        Ok(())
    }

    pub fn default_mime_type(&self) -> Option<&str> {
        self.default_mime_type.as_deref()
    }

    pub fn contains(&self, mime_type: &str) -> bool {
        self.encoders.contains_key(&normalize(mime_type))
    }

    /// Pick the encoder for an `Accept` header value.
    pub fn select(&self, accept: &str) -> Result<SelectedEncoder, RoutingError> {
        let requested = normalize(accept.split(',').next().unwrap_or_default());

        if let Some(encoder) = self.encoders.get(&requested) {
            return Ok(SelectedEncoder {
                mime_type: requested,
                encoder: encoder.clone(),
            });
        }

        self.default_mime_type
            .as_ref()
            .and_then(|mime| {
                self.encoders.get(mime).map(|encoder| SelectedEncoder {
                    mime_type: mime.clone(),
                    encoder: encoder.clone(),
                })
            })
            .ok_or(RoutingError::Unroutable(requested))
    }
}

impl Default for EncoderRegistry {
    /// JSON and plain text, JSON as default.
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(APPLICATION_JSON, Some(Arc::new(JsonEncoder)));
        registry.register(TEXT_PLAIN, Some(Arc::new(PlainTextEncoder)));
        registry.default_mime_type = Some(APPLICATION_JSON.to_string());
        registry
    }
}

impl fmt::Debug for EncoderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut mime_types: Vec<_> = self.encoders.keys().collect();
        mime_types.sort();
        f.debug_struct("EncoderRegistry")
            .field("mime_types", &mime_types)
            .field("default_mime_type", &self.default_mime_type)
            .finish()
    }
}

fn normalize(mime_type: &str) -> String {
    mime_type.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EncodeError;
    use serde_json::{json, Value};

    fn xml() -> SharedEncoder {
        Arc::new(|_: &Value| -> Result<Vec<u8>, EncodeError> { Ok(b"<xml/>".to_vec()) })
    }

    #[test]
    fn test_first_listed_type_only() {
        let registry = EncoderRegistry::default();
        let selected = registry.select("application/json,text/plain").unwrap();
        assert_eq!(selected.mime_type, "application/json");

        let selected = registry.select("text/plain, application/json").unwrap();
        assert_eq!(selected.mime_type, "text/plain");
    }

    #[test]
    fn test_second_listed_type_is_ignored() {
        let mut registry = EncoderRegistry::default();
        registry.register("application/xml", Some(xml()));
        // First entry has no encoder: the default answers, not the second entry.
        let selected = registry.select("text/html,application/xml").unwrap();
        assert_eq!(selected.mime_type, "application/json");
    }

    #[test]
    fn test_fallback_to_default() {
        let registry = EncoderRegistry::default();
        assert_eq!(registry.select("text/html").unwrap().mime_type, "application/json");
        assert_eq!(registry.select("").unwrap().mime_type, "application/json");
        assert_eq!(registry.select("*/*").unwrap().mime_type, "application/json");
    }

    #[test]
    fn test_unroutable_without_default() {
        let mut registry = EncoderRegistry::empty();
        registry.register("text/plain", Some(Arc::new(PlainTextEncoder)));
        assert_eq!(
            registry.select("text/html").unwrap_err(),
            RoutingError::Unroutable("text/html".into())
        );
        assert!(registry.select("TEXT/PLAIN").is_ok());
    }

    #[test]
    fn test_set_default_requires_encoder() {
        let mut registry = EncoderRegistry::default();
        assert_eq!(
            registry.set_default_mime_type("application/xml").unwrap_err(),
            ConfigurationError::UnknownDefaultMimeType("application/xml".into())
        );

        registry.register("application/xml", Some(xml()));
        registry.set_default_mime_type("application/xml").unwrap();
        let selected = registry.select("text/html").unwrap();
        assert_eq!(selected.mime_type, "application/xml");
        assert_eq!(selected.encoder.encode(&json!(null)).unwrap(), b"<xml/>");
    }

    #[test]
    fn test_removing_default_clears_it() {
        let mut registry = EncoderRegistry::default();
        registry.register("application/json", None);
        assert!(!registry.contains("application/json"));
        assert_eq!(registry.default_mime_type(), None);
        assert!(matches!(registry.select("text/html"), Err(RoutingError::Unroutable(_))));
        assert!(registry.select("text/plain").is_ok());
    }
}
