//! The dispatcher: registration API and per-request state machine.
//!
//! # Responsibilities
//! - Own the service catalog, route table, encoder table and runtime settings
//! - Run auto-discovery once, on the first request that finds it enabled
//! - Drive ParsePath → ResolveRoute → Invoke → Compose for each request
//!
//! # Design Decisions
//! - Registries sit behind `RwLock`: dispatch only reads, registration writes
//! - Settings are swapped atomically (`ArcSwap`) so hot reload never blocks requests
//! - The handler is cloned out of the route table before invocation, so no lock is
//!   held while user code runs
//! - Handler errors and panics become 500 responses; nothing escapes `dispatch`

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;

use arc_swap::ArcSwap;

use crate::dispatch::composer::{compose, reject, CompressionPolicy, DispatchResponse, DispatchResult};
use crate::dispatch::context::{HandlerContext, RequestContext};
use crate::dispatch::status::DEFAULT_PROTOCOL;
use crate::encoding::{EncoderRegistry, SharedEncoder};
use crate::error::{ConfigurationError, HandlerError};
use crate::observability::metrics;
use crate::routing::registry::{validate_namespace, ServiceRegistry};
use crate::routing::RouteKey;
use crate::service::{HandlerResult, ServiceCatalog, SharedHandler};

/// Runtime settings, replaceable as a whole on config reload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchSettings {
    /// Path prefix the API is served under.
    pub mount_point: String,
    pub auto_discovery: bool,
    /// Discovery scope; only types under `namespace::` are considered.
    pub namespace: Option<String>,
    pub compression: CompressionPolicy,
    /// Protocol token for status lines.
    pub protocol: String,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            mount_point: "/".to_string(),
            auto_discovery: true,
            namespace: None,
            compression: CompressionPolicy::default(),
            protocol: DEFAULT_PROTOCOL.to_string(),
        }
    }
}

/// One row of the route table, for logging and introspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSummary {
    pub resource: String,
    pub method: String,
    pub verb: String,
    pub target: String,
}

pub struct Dispatcher {
    catalog: ServiceCatalog,
    services: RwLock<ServiceRegistry>,
    encoders: RwLock<EncoderRegistry>,
    settings: ArcSwap<DispatchSettings>,
    discovered: AtomicBool,
    discovery: Mutex<()>,
}

impl Dispatcher {
    /// Dispatcher with default settings and the built-in encoders.
    pub fn new(catalog: ServiceCatalog) -> Self {
        Self {
            catalog,
            services: RwLock::new(ServiceRegistry::new()),
            encoders: RwLock::new(EncoderRegistry::default()),
            settings: ArcSwap::from_pointee(DispatchSettings::default()),
            discovered: AtomicBool::new(false),
            discovery: Mutex::new(()),
        }
    }

    pub fn with_settings(
        catalog: ServiceCatalog,
        settings: DispatchSettings,
    ) -> Result<Self, ConfigurationError> {
        let dispatcher = Self::new(catalog);
        dispatcher.apply_settings(settings)?;
        Ok(dispatcher)
    }

    pub fn catalog(&self) -> &ServiceCatalog {
        &self.catalog
    }

    pub fn settings(&self) -> Arc<DispatchSettings> {
        self.settings.load_full()
    }

    /// Replace all runtime settings at once.
    pub fn apply_settings(&self, settings: DispatchSettings) -> Result<(), ConfigurationError> {
        if let Some(ns) = &settings.namespace {
            validate_namespace(ns, &self.catalog)?;
        }
        self.settings.store(Arc::new(settings));
        Ok(())
    }

    /// Register named candidate types from the catalog under the current namespace
    /// filter. Returns how many were registered.
    pub fn register_candidate_types<S: AsRef<str>>(&self, candidates: &[S]) -> usize {
        let settings = self.settings.load();
        let count = self.services_mut().register_candidate_types(
            candidates,
            &self.catalog,
            settings.namespace.as_deref(),
        );
        tracing::debug!(requested = candidates.len(), registered = count, "Candidate types registered");
        count
    }

    /// Register (`Some`) or remove (`None`) an encoder.
    pub fn register_encoder(&self, mime_type: &str, encoder: Option<SharedEncoder>) {
        tracing::debug!(mime_type = %mime_type, removed = encoder.is_none(), "Encoder registration");
        self.encoders_mut().register(mime_type, encoder);
    }

    pub fn set_default_mime_type(&self, mime_type: &str) -> Result<(), ConfigurationError> {
        self.encoders_mut().set_default_mime_type(mime_type)
    }

    /// Extend the verbs recognized as operation prefixes.
    pub fn register_verb(&self, verb: &str) -> Result<(), ConfigurationError> {
        self.services_mut().register_verb(verb)
    }

    pub fn set_auto_discovery(&self, enabled: bool) {
        self.update_settings(|s| s.auto_discovery = enabled);
    }

    pub fn set_compression(&self, enabled: bool) {
        self.update_settings(|s| s.compression.enabled = enabled);
    }

    /// Scope discovery to a namespace, or clear the scope with `None`.
    ///
    /// Fails unless some declared type lives under the namespace.
    pub fn set_namespace_filter(&self, namespace: Option<&str>) -> Result<(), ConfigurationError> {
        if let Some(ns) = namespace {
            validate_namespace(ns, &self.catalog)?;
        }
        self.update_settings(|s| s.namespace = namespace.map(str::to_string));
        Ok(())
    }

    /// Run auto-discovery if it is enabled and has not run yet.
    ///
    /// A call made while discovery is disabled leaves it pending, so enabling it
    /// later still populates the registry.
    pub fn ensure_discovered(&self) {
        if self.discovered.load(Ordering::Acquire) {
            return;
        }
        let _guard = self.discovery.lock().unwrap_or_else(PoisonError::into_inner);
        if self.discovered.load(Ordering::Acquire) {
            return;
        }
        let settings = self.settings.load();
        if !settings.auto_discovery {
            return;
        }
        let count = self
            .services_mut()
            .discover(&self.catalog, settings.namespace.as_deref());
        self.discovered.store(true, Ordering::Release);
        tracing::info!(
            services = count,
            namespace = ?settings.namespace,
            "Service auto-discovery complete"
        );
    }

    /// Status line for `response` under the configured protocol.
    pub fn status_line(&self, response: &DispatchResponse) -> Result<String, ConfigurationError> {
        response.status_line(&self.settings.load().protocol)
    }

    /// Current route table, sorted.
    pub fn routes(&self) -> Vec<RouteSummary> {
        self.services()
            .routes()
            .into_iter()
            .map(|d| RouteSummary {
                resource: d.resource.clone(),
                method: d.method.clone(),
                verb: d.verb.clone(),
                target: format!("{}::{}", d.type_name, d.operation),
            })
            .collect()
    }

    /// Handle one request. Never fails: every outcome is a response.
    pub fn dispatch(&self, request: &RequestContext) -> DispatchResponse {
        let start = Instant::now();
        self.ensure_discovered();
        let settings = self.settings.load_full();

        // ParsePath
        let key = match RouteKey::parse(request.path(), &settings.mount_point, request.verb()) {
            Ok(key) => key,
            Err(e) => return self.finish(reject(&e), "none", &settings.protocol, start),
        };

        // ResolveRoute
        let descriptor = match self.services().lookup(&key.resource, &key.method, &key.verb) {
            Ok(descriptor) => descriptor.clone(),
            Err(e) => return self.finish(reject(&e), "none", &settings.protocol, start),
        };

        tracing::debug!(
            resource = %descriptor.resource,
            method = %descriptor.method,
            verb = %descriptor.verb,
            target = %format!("{}::{}", descriptor.type_name, descriptor.operation),
            "Route resolved"
        );

        // Invoke
        let ctx = HandlerContext::from_request(request, key.args);
        let result = match invoke(&descriptor.handler, &ctx) {
            Ok(data) => DispatchResult::Success(data),
            Err(e) => {
                tracing::warn!(
                    resource = %descriptor.resource,
                    operation = %descriptor.operation,
                    error = %e,
                    "Handler failed"
                );
                metrics::record_handler_failure(&descriptor.resource);
                DispatchResult::Failed {
                    status: 500,
                    message: e.message().to_string(),
                }
            }
        };

        // Compose
        let response = compose(
            result,
            ctx.into_adjustments(),
            request,
            &self.encoders(),
            &settings.compression,
        );
        self.finish(response, &descriptor.resource, &settings.protocol, start)
    }

    fn finish(
        &self,
        response: DispatchResponse,
        resource: &str,
        protocol: &str,
        start: Instant,
    ) -> DispatchResponse {
        match response.status_line(protocol) {
            Ok(line) => tracing::debug!(resource = %resource, status = %line, "Request dispatched"),
            Err(e) => tracing::warn!(resource = %resource, error = %e, "Response status has no status line"),
        }
        metrics::record_dispatch(resource, response.status.as_u16().unwrap_or_default(), start);
        response
    }

    fn update_settings(&self, f: impl Fn(&mut DispatchSettings)) {
        self.settings.rcu(|current| {
            let mut next = DispatchSettings::clone(current);
            f(&mut next);
            next
        });
    }

    fn services(&self) -> RwLockReadGuard<'_, ServiceRegistry> {
        self.services.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn services_mut(&self) -> RwLockWriteGuard<'_, ServiceRegistry> {
        self.services.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn encoders(&self) -> RwLockReadGuard<'_, EncoderRegistry> {
        self.encoders.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn encoders_mut(&self) -> RwLockWriteGuard<'_, EncoderRegistry> {
        self.encoders.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("catalog", &self.catalog)
            .field("settings", &self.settings.load_full())
            .finish_non_exhaustive()
    }
}

/// Call the handler, turning a panic into a `HandlerError`.
fn invoke(handler: &SharedHandler, ctx: &HandlerContext) -> HandlerResult {
    match catch_unwind(AssertUnwindSafe(|| handler.invoke(ctx))) {
        Ok(result) => result,
        Err(panic) => {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "handler panicked".to_string());
            Err(HandlerError::new(message))
        }
    }
}
