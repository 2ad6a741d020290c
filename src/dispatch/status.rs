//! HTTP status codes and status lines.

use std::fmt;

use crate::error::ConfigurationError;

/// Protocol token used when none is configured.
pub const DEFAULT_PROTOCOL: &str = "HTTP/1.1";

/// A response status: a code from the table, or custom text emitted verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseCode {
    Numeric(u16),
    /// e.g. `"299 Still Thinking"`.
    Custom(String),
}

impl ResponseCode {
    pub const OK: Self = Self::Numeric(200);
    pub const BAD_REQUEST: Self = Self::Numeric(400);
    pub const INTERNAL_SERVER_ERROR: Self = Self::Numeric(500);

    /// Numeric codes must appear in the status table.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        match self {
            Self::Numeric(code) if reason_phrase(*code).is_none() => {
                Err(ConfigurationError::UnsupportedStatusCode(*code))
            }
            _ => Ok(()),
        }
    }

    /// Numeric value; for custom text, the leading number if there is one.
    pub fn as_u16(&self) -> Option<u16> {
        match self {
            Self::Numeric(code) => Some(*code),
            Self::Custom(text) => text.split_whitespace().next()?.parse().ok(),
        }
    }

    /// Whether this status ends the response without a body.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Numeric(code) if *code >= 400)
    }
}

impl From<u16> for ResponseCode {
    fn from(code: u16) -> Self {
        Self::Numeric(code)
    }
}

impl From<&str> for ResponseCode {
    fn from(text: &str) -> Self {
        Self::Custom(text.to_string())
    }
}

impl From<String> for ResponseCode {
    fn from(text: String) -> Self {
        Self::Custom(text)
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(code) => match reason_phrase(*code) {
                Some(reason) => write!(f, "{code} {reason}"),
                None => write!(f, "{code}"),
            },
            Self::Custom(text) => f.write_str(text),
        }
    }
}

/// `"HTTP/1.1 404 Not Found"`. Unknown numeric codes are a configuration error.
pub fn status_line(protocol: &str, code: &ResponseCode) -> Result<String, ConfigurationError> {
    code.validate()?;
    Ok(format!("{protocol} {code}"))
}

/// Reason phrase for the supported codes (IANA registry, 100 to 511).
pub fn reason_phrase(code: u16) -> Option<&'static str> {
    let reason = match code {
        100 => "Continue",
        101 => "Switching Protocols",
        102 => "Processing",
        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        203 => "Non-Authoritative Information",
        204 => "No Content",
        205 => "Reset Content",
        206 => "Partial Content",
        207 => "Multi-Status",
        208 => "Already Reported",
        226 => "IM Used",
        300 => "Multiple Choices",
        301 => "Moved Permanently",
        302 => "Found",
        303 => "See Other",
        304 => "Not Modified",
        305 => "Use Proxy",
        307 => "Temporary Redirect",
        308 => "Permanent Redirect",
        400 => "Bad Request",
        401 => "Unauthorized",
        402 => "Payment Required",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        406 => "Not Acceptable",
        407 => "Proxy Authentication Required",
        408 => "Request Timeout",
        409 => "Conflict",
        410 => "Gone",
        411 => "Length Required",
        412 => "Precondition Failed",
        413 => "Payload Too Large",
        414 => "URI Too Long",
        415 => "Unsupported Media Type",
        416 => "Requested Range Not Satisfiable",
        417 => "Expectation Failed",
        422 => "Unprocessable Entity",
        423 => "Locked",
        424 => "Failed Dependency",
        426 => "Upgrade Required",
        428 => "Precondition Required",
        429 => "Too Many Requests",
        431 => "Request Header Fields Too Large",
        500 => "Internal Server Error",
        501 => "Not Implemented",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        505 => "HTTP Version Not Supported",
        506 => "Variant Also Negotiates",
        507 => "Insufficient Storage",
        508 => "Loop Detected",
        510 => "Not Extended",
        511 => "Network Authentication Required",
        _ => return None,
    };
    Some(reason)
}
