//! Convention-based HTTP request dispatcher.
//!
//! Service types declare operations named `<verb><Method>`; the dispatcher maps
//! `<mount>/<resource>/<method>/<args...>` plus the HTTP verb onto them, invokes
//! the handler, and encodes the result for the client's `Accept` type.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http (axum host) ──▶ dispatch::Dispatcher
//!                                            │
//!                                            ├─▶ routing (path → resource/method/verb)
//!                                            ├─▶ service (handler invocation)
//!                                            └─▶ encoding (Accept negotiation, encode)
//!     Client Response                        │
//!     ◀────────────── http (compression) ◀───┘
//!
//!     Cross-cutting: config, observability, lifecycle, error
//! ```

// Core
pub mod dispatch;
pub mod encoding;
pub mod error;
pub mod routing;
pub mod service;

// Host
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::AppConfig;
pub use dispatch::{DispatchResponse, Dispatcher, HandlerContext, RequestContext};
pub use error::{ConfigurationError, HandlerError, RoutingError};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use service::{HandlerResult, ServiceCatalog, ServiceType};
