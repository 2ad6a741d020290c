//! Response composition.
//!
//! # Responsibilities
//! - Negotiate the output encoder from the `Accept` header
//! - Encode the handler payload or failure message
//! - Assemble status, `Content-Type`, `Content-Length` and handler headers
//! - Decide compression eligibility
//!
//! # Design Decisions
//! - Routing failures end the response with 400 and an empty body
//! - Negotiation failure overrides any handler outcome with 400
//! - Compression itself is the transport's job; only the flag is set here

use serde_json::Value;

use crate::dispatch::context::{RequestContext, ResponseAdjustments};
use crate::dispatch::status::{status_line, ResponseCode};
use crate::encoding::EncoderRegistry;
use crate::error::{ConfigurationError, RoutingError};

/// Smallest body worth compressing.
pub const DEFAULT_COMPRESSION_MIN_SIZE: usize = 860;

/// When composed responses are marked for transport compression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionPolicy {
    pub enabled: bool,
    pub min_size: usize,
}

impl CompressionPolicy {
    /// Whether a body of `len` bytes may be compressed for this `Accept-Encoding`.
    pub fn is_eligible(&self, accept_encoding: &str, len: usize) -> bool {
        self.enabled && accepts_gzip(accept_encoding) && len >= self.min_size
    }
}

impl Default for CompressionPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            min_size: DEFAULT_COMPRESSION_MIN_SIZE,
        }
    }
}

pub fn accepts_gzip(accept_encoding: &str) -> bool {
    accept_encoding.to_ascii_lowercase().contains("gzip")
}

/// Outcome of invoking a handler.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchResult {
    Success(Value),
    Failed { status: u16, message: String },
}

impl DispatchResult {
    pub fn status(&self) -> ResponseCode {
        match self {
            Self::Success(_) => ResponseCode::OK,
            Self::Failed { status, .. } => ResponseCode::Numeric(*status),
        }
    }

    fn into_payload(self) -> Value {
        match self {
            Self::Success(data) => data,
            Self::Failed { message, .. } => Value::String(message),
        }
    }
}

/// Final response handed back to the host transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchResponse {
    pub status: ResponseCode,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    /// Transport should gzip the body.
    pub compress: bool,
}

impl DispatchResponse {
    fn empty(status: ResponseCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
            compress: false,
        }
    }

    /// First header with this name, any capitalization.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn status_line(&self, protocol: &str) -> Result<String, ConfigurationError> {
        status_line(protocol, &self.status)
    }
}

/// 400 with an empty body.
pub fn reject(error: &RoutingError) -> DispatchResponse {
    tracing::debug!(error = %error, "Request rejected");
    DispatchResponse::empty(ResponseCode::BAD_REQUEST)
}

/// Negotiate, encode and assemble the response for a handler outcome.
pub fn compose(
    result: DispatchResult,
    adjustments: ResponseAdjustments,
    request: &RequestContext,
    encoders: &EncoderRegistry,
    compression: &CompressionPolicy,
) -> DispatchResponse {
    let failed = matches!(result, DispatchResult::Failed { .. });
    let extra_headers: Vec<_> = adjustments
        .headers
        .into_iter()
        .filter(|(name, _)| {
            !name.eq_ignore_ascii_case("content-type") && !name.eq_ignore_ascii_case("content-length")
        })
        .collect();

    // A handler-set error status ends the response before anything is encoded.
    if let Some(status) = adjustments.status.as_ref().filter(|s| s.is_error() && !failed) {
        let mut response = DispatchResponse::empty(status.clone());
        response.headers = extra_headers;
        return response;
    }

    let selected = match encoders.select(request.accept()) {
        Ok(selected) => selected,
        Err(e) => return reject(&e),
    };

    let status = match adjustments.status {
        Some(status) if !failed => status,
        _ => result.status(),
    };

    let body = match selected.encoder.encode(&result.into_payload()) {
        Ok(body) => body,
        Err(e) => {
            tracing::error!(mime_type = %selected.mime_type, error = %e, "Failed to encode response");
            let mut response = DispatchResponse::empty(ResponseCode::INTERNAL_SERVER_ERROR);
            response.headers = extra_headers;
            return response;
        }
    };

    let mut headers = Vec::with_capacity(extra_headers.len() + 2);
    headers.push(("Content-Type".to_string(), selected.mime_type));
    headers.push(("Content-Length".to_string(), body.len().to_string()));
    headers.extend(extra_headers);

    DispatchResponse {
        compress: compression.is_eligible(request.accept_encoding(), body.len()),
        status,
        headers,
        body,
    }
}
