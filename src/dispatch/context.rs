//! Per-request values flowing into and out of a handler.

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use serde::Serialize;

use crate::dispatch::status::ResponseCode;
use crate::error::ConfigurationError;

/// Already-parsed inbound request, as handed over by the host transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    verb: String,
    path: String,
    headers: BTreeMap<String, String>,
    params: BTreeMap<String, String>,
}

impl RequestContext {
    pub fn new(verb: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            verb: verb.into(),
            path: path.into(),
            headers: BTreeMap::new(),
            params: BTreeMap::new(),
        }
    }

    /// Add a header. The name is stored in canonical form; a repeated name replaces
    /// the earlier value.
    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(canonical_header_name(name), value.into());
        self
    }

    /// Add a request parameter. Later values win.
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Merge a batch of parameters; later values win.
    pub fn params<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.params
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn verb(&self) -> &str {
        &self.verb
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    pub fn request_params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    /// Header value by name, any capitalization.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&canonical_header_name(name))
            .map(String::as_str)
    }

    /// Raw `Accept` value, empty when absent.
    pub fn accept(&self) -> &str {
        self.header_value("accept").unwrap_or_default()
    }

    /// Raw `Accept-Encoding` value, empty when absent.
    pub fn accept_encoding(&self) -> &str {
        self.header_value("accept-encoding").unwrap_or_default()
    }
}

/// `x-custom_header` → `X-Custom-Header`.
pub fn canonical_header_name(name: &str) -> String {
    name.trim()
        .split(['-', '_'])
        .map(|word| {
            let lower = word.to_ascii_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

/// Headers and status a handler asked to set on its response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseAdjustments {
    pub headers: Vec<(String, String)>,
    pub status: Option<ResponseCode>,
}

/// The single value a handler is invoked with.
///
/// Serializes as `{"headers": {...}, "request": {...}, "args": [...]}` so handlers can
/// echo it back.
#[derive(Debug, Default, Serialize)]
pub struct HandlerContext {
    pub headers: BTreeMap<String, String>,
    pub request: BTreeMap<String, String>,
    pub args: Vec<String>,
    #[serde(skip)]
    response: Mutex<ResponseAdjustments>,
}

impl HandlerContext {
    pub fn new(
        headers: BTreeMap<String, String>,
        request: BTreeMap<String, String>,
        args: Vec<String>,
    ) -> Self {
        Self {
            headers,
            request,
            args,
            response: Mutex::default(),
        }
    }

    pub(crate) fn from_request(request: &RequestContext, args: Vec<String>) -> Self {
        Self::new(request.headers.clone(), request.params.clone(), args)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&canonical_header_name(name))
            .map(String::as_str)
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.request.get(name).map(String::as_str)
    }

    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }

    /// Add a header to the response. `Content-Type` and `Content-Length` are owned by
    /// the response composer and will be ignored.
    pub fn add_header(&self, name: impl Into<String>, value: impl Into<String>) {
        self.adjustments()
            .headers
            .push((name.into(), value.into()));
    }

    /// Override the response status.
    ///
    /// A numeric code of 400 or above ends the response with an empty body. Numeric
    /// codes must appear in the status table.
    pub fn set_status(&self, code: impl Into<ResponseCode>) -> Result<(), ConfigurationError> {
        let code = code.into();
        code.validate()?;
        self.adjustments().status = Some(code);
        Ok(())
    }

    pub(crate) fn into_adjustments(self) -> ResponseAdjustments {
        self.response
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn adjustments(&self) -> std::sync::MutexGuard<'_, ResponseAdjustments> {
        self.response.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_canonical_header_name() {
        assert_eq!(canonical_header_name("x-custom"), "X-Custom");
        assert_eq!(canonical_header_name("ACCEPT_ENCODING"), "Accept-Encoding");
        assert_eq!(canonical_header_name("content-TYPE"), "Content-Type");
        assert_eq!(canonical_header_name("dnt"), "Dnt");
    }

    #[test]
    fn test_request_context_headers_and_params() {
        let req = RequestContext::new("GET", "/profile/user")
            .header("accept", "application/json")
            .header("ACCEPT-ENCODING", "gzip, br")
            .param("id", "1")
            .params([("id", "2"), ("name", "x")]);

        assert_eq!(req.accept(), "application/json");
        assert_eq!(req.accept_encoding(), "gzip, br");
        assert_eq!(req.header_value("Accept"), Some("application/json"));
        assert_eq!(req.request_params().get("id").unwrap(), "2");
        assert!(req.headers().contains_key("Accept-Encoding"));
    }

    #[test]
    fn test_missing_accept_is_empty() {
        let req = RequestContext::new("GET", "/a/b");
        assert_eq!(req.accept(), "");
        assert_eq!(req.accept_encoding(), "");
    }

    #[test]
    fn test_handler_context_serializes_without_adjustments() {
        let req = RequestContext::new("GET", "/profile/user/7").header("x-token", "abc").param("q", "1");
        let ctx = HandlerContext::from_request(&req, vec!["7".into()]);
        ctx.add_header("X-Extra", "1");

        assert_eq!(
            serde_json::to_value(&ctx).unwrap(),
            json!({"headers": {"X-Token": "abc"}, "request": {"q": "1"}, "args": ["7"]})
        );
        assert_eq!(ctx.header("x-token"), Some("abc"));
        assert_eq!(ctx.arg(0), Some("7"));
        assert_eq!(ctx.arg(1), None);
    }

    #[test]
    fn test_set_status_validates_code() {
        let ctx = HandlerContext::default();
        assert_eq!(
            ctx.set_status(299u16).unwrap_err(),
            ConfigurationError::UnsupportedStatusCode(299)
        );
        ctx.set_status(201u16).unwrap();
        ctx.add_header("Location", "/profile/user/9");

        let adjustments = ctx.into_adjustments();
        assert_eq!(adjustments.status, Some(ResponseCode::Numeric(201)));
        assert_eq!(adjustments.headers, vec![("Location".into(), "/profile/user/9".into())]);
    }
}
