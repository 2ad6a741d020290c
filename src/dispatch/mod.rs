//! Request dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! RequestContext (verb, path, headers, params)
//!     → dispatcher.rs  ParsePath    (routing::path)
//!                      ResolveRoute (routing::registry)
//!                      Invoke       (HandlerContext → Handler)
//!     → composer.rs    Compose      (negotiate, encode, headers, compression flag)
//!     → DispatchResponse (status, headers, body, compress)
//! ```
//!
//! # Design Decisions
//! - Every outcome is a response; routing errors are 400, handler errors 500
//! - The host transport writes the response and performs compression

pub mod composer;
pub mod context;
pub mod dispatcher;
pub mod status;

pub use composer::{CompressionPolicy, DispatchResponse, DispatchResult};
pub use context::{canonical_header_name, HandlerContext, RequestContext, ResponseAdjustments};
pub use dispatcher::{DispatchSettings, Dispatcher, RouteSummary};
pub use status::{status_line, ResponseCode};
