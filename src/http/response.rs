//! Response conversion.
//!
//! # Responsibilities
//! - Turn a `DispatchResponse` into an axum response
//! - Mark bodies the dispatcher found eligible for gzip
//!
//! # Design Decisions
//! - `Content-Length` is left to the transport, which knows the final body size
//! - Compression runs in `CompressionLayer`, gated by `CompressEligible` so only
//!   marked responses are compressed
//! - Custom status text cannot be carried through; its leading number is used,
//!   falling back to 200

use axum::body::{Body, HttpBody};
use axum::http::{HeaderName, HeaderValue, Response, StatusCode};
use tower_http::compression::Predicate;

use crate::dispatch::DispatchResponse;

/// Response extension set when the body may be gzip-compressed.
#[derive(Debug, Clone, Copy)]
pub struct CompressionEligible;

/// Compression predicate that honors `CompressionEligible`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompressEligible;

impl Predicate for CompressEligible {
    fn should_compress<B>(&self, response: &Response<B>) -> bool
    where
        B: HttpBody,
    {
        response.extensions().get::<CompressionEligible>().is_some()
    }
}

/// Convert the dispatcher's response for the transport.
pub fn into_response(dispatched: DispatchResponse) -> Response<Body> {
    let status = dispatched
        .status
        .as_u16()
        .and_then(|code| StatusCode::from_u16(code).ok())
        .unwrap_or_else(|| {
            tracing::warn!(status = %dispatched.status, "Status not representable, sending 200");
            StatusCode::OK
        });

    let mut response = Response::new(Body::from(dispatched.body));
    *response.status_mut() = status;

    let headers = response.headers_mut();
    for (name, value) in &dispatched.headers {
        if name.eq_ignore_ascii_case("content-length") {
            continue;
        }
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                headers.append(name, value);
            }
            _ => tracing::warn!(header = %name, "Dropping invalid response header"),
        }
    }

    if dispatched.compress {
        response.extensions_mut().insert(CompressionEligible);
    }

    response
}
