//! Service handler types.
//!
//! # Data Flow
//! ```text
//! Application startup
//!     → ServiceType::new("app::ProfileService").operation("getUser", handler)
//!     → ServiceCatalog (declared types, immutable once handed over)
//!     → routing::registry scans the catalog by naming convention
//! ```
//!
//! # Design Decisions
//! - No runtime reflection: the catalog is an explicit registration list
//! - Operations carry a `Handler` instance, resolved once at registration rather than
//!   looked up by name per request

pub mod catalog;
pub mod handler;

pub use catalog::{Operation, ServiceCatalog, ServiceType};
pub use handler::{Handler, HandlerResult, SharedHandler};
