//! HTTP host for the dispatcher.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum setup, middleware)
//!     → request.rs (request ID, build RequestContext)
//!     → Dispatcher::dispatch (blocking pool)
//!     → response.rs (status, headers, compression mark)
//!     → CompressionLayer → client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{UuidRequestId, X_REQUEST_ID};
pub use response::{CompressEligible, CompressionEligible};
pub use server::HttpServer;
