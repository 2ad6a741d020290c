//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the dispatcher from a service catalog and configuration
//! - Register configured verbs and the default MIME type
//! - Run discovery up front so the route table can be logged
//!
//! # Design Decisions
//! - Fail fast: any configuration error is fatal
//! - Listeners start last (traffic only when ready)

use thiserror::Error;

use crate::config::AppConfig;
use crate::dispatch::Dispatcher;
use crate::error::ConfigurationError;
use crate::service::ServiceCatalog;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid dispatcher configuration: {0}")]
    Configuration(#[from] ConfigurationError),
}

/// Build a ready-to-serve dispatcher.
pub fn build_dispatcher(
    catalog: ServiceCatalog,
    config: &AppConfig,
) -> Result<Dispatcher, StartupError> {
    let dispatcher = Dispatcher::with_settings(catalog, config.dispatch_settings())?;

    for verb in &config.dispatch.extra_verbs {
        dispatcher.register_verb(verb)?;
    }
    dispatcher.set_default_mime_type(&config.dispatch.default_mime_type)?;

    dispatcher.ensure_discovered();
    let routes = dispatcher.routes();
    for route in &routes {
        tracing::info!(
            verb = %route.verb,
            resource = %route.resource,
            method = %route.method,
            target = %route.target,
            "Route registered"
        );
    }
    tracing::info!(count = routes.len(), "Route table ready");

    Ok(dispatcher)
}
