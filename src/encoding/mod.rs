//! Response encoding subsystem.
//!
//! # Data Flow
//! ```text
//! Accept header
//!     → registry.rs (first listed type → exact encoder, else default, else Unroutable)
//!     → encoders.rs (payload → body bytes)
//! ```
//!
//! # Design Decisions
//! - Encoders are trait objects so applications can add their own formats
//! - Plain closures `Fn(&Value) -> Result<Vec<u8>, EncodeError>` are encoders

pub mod encoders;
pub mod registry;

pub use encoders::{Encoder, JsonEncoder, PlainTextEncoder, APPLICATION_JSON, TEXT_PLAIN};
pub use registry::{EncoderRegistry, SelectedEncoder, SharedEncoder};
