//! Request conversion and request IDs.
//!
//! # Responsibilities
//! - Generate a UUID v4 request ID for every inbound request
//! - Turn an axum request into a `RequestContext` (verb, path, headers, parameters)
//!
//! # Design Decisions
//! - Repeated header values are joined with ", " under one canonical name
//! - Parameters come from the query string and from urlencoded bodies; body fields win
//! - Header values that are not valid UTF-8 are dropped

use axum::body::{to_bytes, Body};
use axum::http::request::Parts;
use axum::http::{header, HeaderValue, Request};
use thiserror::Error;
use tower_http::request_id::{MakeRequestId, RequestId};
use url::form_urlencoded;
use uuid::Uuid;

use crate::dispatch::RequestContext;

/// Standard request ID header.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Request ID generator backed by UUID v4.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Failure while reading an inbound request.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("failed to read request body: {0}")]
    Body(#[from] axum::Error),
}

/// Buffer the body and build the dispatch context.
///
/// The body size is bounded by the `RequestBodyLimitLayer` in front of the handler.
pub async fn read_request(request: Request<Body>) -> Result<RequestContext, RequestError> {
    let (parts, body) = request.into_parts();
    let body = to_bytes(body, usize::MAX).await?;
    Ok(build_context(&parts, &body))
}

/// Build a `RequestContext` from request parts and a buffered body.
pub fn build_context(parts: &Parts, body: &[u8]) -> RequestContext {
    let path = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");

    let mut context = RequestContext::new(parts.method.as_str(), path);

    for name in parts.headers.keys() {
        let values: Vec<&str> = parts
            .headers
            .get_all(name)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect();
        if !values.is_empty() {
            context = context.header(name.as_str(), values.join(", "));
        }
    }

    if let Some(query) = parts.uri.query() {
        context = context.params(form_urlencoded::parse(query.as_bytes()).into_owned());
    }

    if is_form_body(parts) && !body.is_empty() {
        context = context.params(form_urlencoded::parse(body).into_owned());
    }

    context
}

fn is_form_body(parts: &Parts) -> bool {
    parts
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| {
            v.trim()
                .to_ascii_lowercase()
                .starts_with("application/x-www-form-urlencoded")
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(request: Request<()>) -> Parts {
        request.into_parts().0
    }

    #[test]
    fn test_headers_are_canonical_and_joined() {
        let parts = parts(
            Request::builder()
                .uri("/profile/user")
                .header("accept", "text/plain")
                .header("x-custom-tag", "a")
                .header("x-custom-tag", "b")
                .body(())
                .unwrap(),
        );
        let ctx = build_context(&parts, b"");

        assert_eq!(ctx.verb(), "GET");
        assert_eq!(ctx.path(), "/profile/user");
        assert_eq!(ctx.accept(), "text/plain");
        assert_eq!(ctx.headers().get("X-Custom-Tag").map(String::as_str), Some("a, b"));
    }

    #[test]
    fn test_query_parameters() {
        let parts = parts(
            Request::builder()
                .uri("/profile/user/9?name=John%20Doe&flag")
                .body(())
                .unwrap(),
        );
        let ctx = build_context(&parts, b"");

        assert_eq!(ctx.path(), "/profile/user/9?name=John%20Doe&flag");
        assert_eq!(ctx.request_params().get("name").map(String::as_str), Some("John Doe"));
        assert_eq!(ctx.request_params().get("flag").map(String::as_str), Some(""));
    }

    #[test]
    fn test_form_body_overrides_query() {
        let parts = parts(
            Request::builder()
                .method("POST")
                .uri("/profile/user?name=query&page=2")
                .header("content-type", "application/x-www-form-urlencoded")
                .body(())
                .unwrap(),
        );
        let ctx = build_context(&parts, b"name=body+value");

        assert_eq!(ctx.verb(), "POST");
        assert_eq!(ctx.request_params().get("name").map(String::as_str), Some("body value"));
        assert_eq!(ctx.request_params().get("page").map(String::as_str), Some("2"));
    }

    #[test]
    fn test_non_form_body_ignored() {
        let parts = parts(
            Request::builder()
                .method("POST")
                .uri("/profile/user")
                .header("content-type", "application/json")
                .body(())
                .unwrap(),
        );
        let ctx = build_context(&parts, br#"{"name":"x"}"#);
        assert!(ctx.request_params().is_empty());
    }

    #[test]
    fn test_request_ids_are_unique() {
        let mut maker = UuidRequestId;
        let request = Request::builder().body(()).unwrap();
        let a = maker.make_request_id(&request).unwrap();
        let b = maker.make_request_id(&request).unwrap();
        assert_ne!(a.header_value(), b.header_value());
        assert_eq!(a.header_value().len(), 36);
    }
}
