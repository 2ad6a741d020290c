//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (dispatch counters and latency histogram)
//!
//! Consumers:
//!     → Log output (stdout, filter from config or RUST_LOG)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through the host server's trace spans
//! - Metrics are cheap when no recorder is installed (no-op)

pub mod logging;
pub mod metrics;
