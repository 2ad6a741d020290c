//! Error taxonomy for the dispatch core.
//!
//! # Design Decisions
//! - `RoutingError` and `HandlerError` never leave `Dispatcher::dispatch`; they are
//!   always turned into a response (400 and 500 respectively)
//! - `ConfigurationError` is returned synchronously from registration calls
//! - `EncodeError` is raised by encoders and handled by the response composer

use thiserror::Error;

/// The request could not be routed. Always answered with 400 Bad Request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    /// Fewer than two path segments after the mount point.
    #[error("path '{0}' does not name a resource and a method")]
    PathTooShort(String),

    /// The path does not lie under the configured mount point.
    #[error("path '{0}' is outside the mount point")]
    OutsideMountPoint(String),

    /// No registered service answers to this resource slug.
    #[error("unknown resource '{0}'")]
    UnknownResource(String),

    /// The resource exists but has no operation for this method slug and verb.
    #[error("no '{verb}' operation '{method}' on resource '{resource}'")]
    UnknownMethod {
        resource: String,
        method: String,
        verb: String,
    },

    /// Neither the accepted media type nor the default MIME type has an encoder.
    #[error("no encoder for accepted media type '{0}'")]
    Unroutable(String),
}

/// Failure raised by a handler while serving a request.
///
/// The message becomes the response payload under status 500.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct HandlerError {
    message: String,
}

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<String> for HandlerError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for HandlerError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<ConfigurationError> for HandlerError {
    fn from(e: ConfigurationError) -> Self {
        Self::new(e.to_string())
    }
}

/// Invalid setup call. These are programmer errors and are reported to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// `set_default_mime_type` named a MIME type without a registered encoder.
    #[error("MIME type '{0}' does not have a registered encoder")]
    UnknownDefaultMimeType(String),

    /// `set_namespace_filter` named a namespace no declared service lives in.
    #[error("namespace '{0}' is not defined")]
    UndefinedNamespace(String),

    /// A numeric status code outside the supported table.
    #[error("unsupported response code '{0}'")]
    UnsupportedStatusCode(u16),

    /// A verb that is empty or contains non-alphabetic characters.
    #[error("invalid HTTP verb '{0}'")]
    InvalidVerb(String),

    /// A type name that does not follow the service naming convention.
    #[error("'{0}' is not a service type name")]
    NotAServiceType(String),
}

/// Failure to serialize a payload.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    /// The encoder only accepts a particular shape of data.
    #[error("encoder for '{mime_type}' expects {expected}")]
    UnsupportedData {
        mime_type: String,
        expected: &'static str,
    },
}
