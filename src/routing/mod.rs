//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup or first dispatch):
//!     ServiceCatalog (declared types)
//!     → naming.rs (type name → resource slug, operation → verb + method slug)
//!     → registry.rs (resource → method → verb → HandlerDescriptor)
//!
//! Incoming Request (verb, path)
//!     → path.rs (strip mount point, split into RouteKey)
//!     → registry.rs (lookup)
//!     → Return: HandlerDescriptor or RoutingError
//! ```
//!
//! # Design Decisions
//! - Routes derive purely from naming conventions; there is no route config
//! - Deterministic: verb prefixes resolve in registration order
//! - Explicit RoutingError rather than silent fallback

pub mod naming;
pub mod path;
pub mod registry;

pub use naming::KnownVerbs;
pub use path::RouteKey;
pub use registry::{HandlerDescriptor, ServiceRegistry};
