//! Route table built from declared service types.
//!
//! # Responsibilities
//! - Scan candidate types against the naming convention
//! - Store resource slug → method slug → verb → handler
//! - Look up the handler for a parsed route key
//!
//! # Design Decisions
//! - Registration is best-effort: names not following the convention are skipped
//! - Re-registration merges; the last handler registered for a route wins
//! - Entries are never removed
//! - Resource slugs match case-insensitively, method slugs exactly

use std::collections::HashMap;
use std::fmt;

use crate::error::{ConfigurationError, RoutingError};
use crate::routing::naming::{
    is_service_type_name, namespace_is_declared, operation_to_verb_and_slug,
    resource_slug_to_type_name, type_name_to_resource_slug, KnownVerbs,
};
use crate::service::{ServiceCatalog, ServiceType, SharedHandler};

/// One registered operation.
#[derive(Clone)]
pub struct HandlerDescriptor {
    pub resource: String,
    pub method: String,
    pub verb: String,
    /// Fully-qualified name of the declaring type.
    pub type_name: String,
    pub operation: String,
    pub handler: SharedHandler,
}

impl fmt::Debug for HandlerDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerDescriptor")
            .field("resource", &self.resource)
            .field("method", &self.method)
            .field("verb", &self.verb)
            .field("type_name", &self.type_name)
            .field("operation", &self.operation)
            .finish()
    }
}

type MethodTable = HashMap<String, HashMap<String, HandlerDescriptor>>;

/// Resource slug → method slug → verb → descriptor.
#[derive(Debug, Default)]
pub struct ServiceRegistry {
    resources: HashMap<String, MethodTable>,
    verbs: KnownVerbs,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extend the verb set used when resolving operation names.
    ///
    /// Only affects types registered afterwards.
    pub fn register_verb(&mut self, verb: &str) -> Result<(), ConfigurationError> {
        self.verbs.register(verb)
    }

    pub fn verbs(&self) -> &KnownVerbs {
        &self.verbs
    }

    /// Register every named candidate found in `catalog`.
    ///
    /// A candidate is used as-is when it follows the convention (under `namespace`,
    /// if set). Otherwise it is treated as a bare resource name and expanded, so
    /// `"Profile"` finds `ProfileService`. Anything else is skipped.
    ///
    /// Returns the number of types registered.
    pub fn register_candidate_types<S: AsRef<str>>(
        &mut self,
        candidates: &[S],
        catalog: &ServiceCatalog,
        namespace: Option<&str>,
    ) -> usize {
        candidates
            .iter()
            .filter(|candidate| self.register_single(candidate.as_ref(), catalog, namespace))
            .count()
    }

    /// Register every catalog type following the convention.
    pub fn discover(&mut self, catalog: &ServiceCatalog, namespace: Option<&str>) -> usize {
        let mut count = 0;
        for service in catalog.iter() {
            if is_service_type_name(service.name(), namespace) && self.insert_service(service) {
                count += 1;
            }
        }
        count
    }

    fn register_single(
        &mut self,
        candidate: &str,
        catalog: &ServiceCatalog,
        namespace: Option<&str>,
    ) -> bool {
        let service = if is_service_type_name(candidate, namespace) {
            catalog.get(candidate)
        } else {
            catalog.get(&resource_slug_to_type_name(candidate, namespace))
        };

        match service {
            Some(service) => self.insert_service(service),
            None => {
                tracing::debug!(candidate = %candidate, "Skipping candidate: no matching service type");
                false
            }
        }
    }

    fn insert_service(&mut self, service: &ServiceType) -> bool {
        let resource = match type_name_to_resource_slug(service.name()) {
            Ok(slug) => slug,
            Err(e) => {
                tracing::debug!(error = %e, "Skipping service type");
                return false;
            }
        };

        let methods = self.resources.entry(resource.clone()).or_default();
        for operation in service.operations() {
            let Some((verb, method)) = operation_to_verb_and_slug(&operation.name, &self.verbs)
            else {
                tracing::debug!(
                    service = %service.name(),
                    operation = %operation.name,
                    "Operation has no verb prefix, not routed"
                );
                continue;
            };

            let descriptor = HandlerDescriptor {
                resource: resource.clone(),
                method: method.clone(),
                verb: verb.clone(),
                type_name: service.name().to_string(),
                operation: operation.name.clone(),
                handler: operation.handler.clone(),
            };
            if let Some(previous) = methods.entry(method).or_default().insert(verb, descriptor) {
                tracing::debug!(
                    resource = %previous.resource,
                    method = %previous.method,
                    verb = %previous.verb,
                    replaced = %format!("{}::{}", previous.type_name, previous.operation),
                    "Route overwritten by later registration"
                );
            }
        }

        tracing::debug!(service = %service.name(), resource = %resource, "Service registered");
        true
    }

    /// Find the handler for a route key.
    pub fn lookup(
        &self,
        resource: &str,
        method: &str,
        verb: &str,
    ) -> Result<&HandlerDescriptor, RoutingError> {
        let methods = self
            .resources
            .iter()
            .find(|(slug, _)| slug.eq_ignore_ascii_case(resource))
            .map(|(_, methods)| methods)
            .ok_or_else(|| RoutingError::UnknownResource(resource.to_string()))?;

        let verb = verb.to_ascii_lowercase();
        methods
            .get(method)
            .and_then(|verbs| verbs.get(&verb))
            .ok_or_else(|| RoutingError::UnknownMethod {
                resource: resource.to_string(),
                method: method.to_string(),
                verb,
            })
    }

    /// Snapshot of every route, sorted by resource, method, verb.
    pub fn routes(&self) -> Vec<&HandlerDescriptor> {
        let mut routes: Vec<_> = self
            .resources
            .values()
            .flat_map(|methods| methods.values())
            .flat_map(|verbs| verbs.values())
            .collect();
        routes.sort_by(|a, b| {
            (&a.resource, &a.method, &a.verb).cmp(&(&b.resource, &b.method, &b.verb))
        });
        routes
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

/// Check that a namespace filter refers to at least one declared type.
pub fn validate_namespace(namespace: &str, catalog: &ServiceCatalog) -> Result<(), ConfigurationError> {
    if namespace_is_declared(namespace, catalog.names()) {
        Ok(())
    } else {
        Err(ConfigurationError::UndefinedNamespace(namespace.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::HandlerContext;
    use crate::service::{HandlerResult, ServiceType};
    use serde_json::{json, Value};

    fn constant(value: Value) -> impl Fn(&HandlerContext) -> HandlerResult {
        move |_: &HandlerContext| -> HandlerResult { Ok(value.clone()) }
    }

    fn catalog() -> ServiceCatalog {
        ServiceCatalog::new()
            .with(
                ServiceType::new("ProfileService")
                    .operation("getUser", constant(json!("user")))
                    .operation("postUser", constant(json!("created")))
                    .operation("get", constant(json!("root")))
                    .operation("helper", constant(json!("never"))),
            )
            .with(ServiceType::new("app::OrderService").operation("getList", constant(json!([]))))
            .with(ServiceType::new("NotAHandler").operation("getThing", constant(json!(1))))
    }

    fn call(descriptor: &HandlerDescriptor) -> Value {
        descriptor.handler.invoke(&HandlerContext::default()).unwrap()
    }

    #[test]
    fn test_discover_registers_convention_types() {
        let mut registry = ServiceRegistry::new();
        assert_eq!(registry.discover(&catalog(), None), 2);

        let user = registry.lookup("profile", "user", "get").unwrap();
        assert_eq!(user.operation, "getUser");
        assert_eq!(call(user), json!("user"));

        assert_eq!(registry.lookup("PROFILE", "", "GET").unwrap().operation, "get");
        assert!(registry.lookup("order", "list", "get").is_ok());
        assert_eq!(
            registry.lookup("notahandler", "thing", "get").unwrap_err(),
            RoutingError::UnknownResource("notahandler".into())
        );
    }

    #[test]
    fn test_operations_without_verb_are_excluded() {
        let mut registry = ServiceRegistry::new();
        registry.discover(&catalog(), None);
        let operations: Vec<_> = registry.routes().iter().map(|d| d.operation.clone()).collect();
        assert!(!operations.contains(&"helper".to_string()));
        assert_eq!(registry.routes().len(), 4);
    }

    #[test]
    fn test_lookup_wrong_verb() {
        let mut registry = ServiceRegistry::new();
        registry.discover(&catalog(), None);
        assert_eq!(
            registry.lookup("profile", "user", "delete").unwrap_err(),
            RoutingError::UnknownMethod {
                resource: "profile".into(),
                method: "user".into(),
                verb: "delete".into(),
            }
        );
    }

    #[test]
    fn test_last_registration_wins() {
        let catalog = ServiceCatalog::new()
            .with(ServiceType::new("a::ProfileService").operation("getUser", constant(json!("first"))))
            .with(ServiceType::new("b::ProfileService").operation("getUser", constant(json!("second"))));

        let mut registry = ServiceRegistry::new();
        registry.register_candidate_types(&["a::ProfileService", "b::ProfileService"], &catalog, None);

        let routes = registry.routes();
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].type_name, "b::ProfileService");
        assert_eq!(call(routes[0]), json!("second"));
    }

    #[test]
    fn test_register_bare_name() {
        let mut registry = ServiceRegistry::new();
        let registered =
            registry.register_candidate_types(&["Profile", "Missing", "NotAHandler"], &catalog(), None);
        assert_eq!(registered, 1);
        assert!(registry.lookup("profile", "user", "post").is_ok());
    }

    #[test]
    fn test_register_under_namespace() {
        let mut registry = ServiceRegistry::new();
        let catalog = catalog();
        assert_eq!(registry.register_candidate_types(&["order"], &catalog, Some("app")), 1);
        assert_eq!(registry.register_candidate_types(&["ProfileService"], &catalog, Some("app")), 0);
        assert!(registry.lookup("order", "list", "get").is_ok());
        assert!(registry.lookup("profile", "user", "get").is_err());
    }

    #[test]
    fn test_discover_scoped_by_namespace() {
        let mut registry = ServiceRegistry::new();
        assert_eq!(registry.discover(&catalog(), Some("app")), 1);
        assert!(registry.lookup("profile", "user", "get").is_err());
    }

    #[test]
    fn test_custom_verb_applies_to_later_registrations() {
        let catalog = ServiceCatalog::new()
            .with(ServiceType::new("ItemService").operation("patchName", constant(json!("patched"))));
        let mut registry = ServiceRegistry::new();
        registry.discover(&catalog, None);
        assert!(registry.lookup("item", "name", "patch").is_err());

        registry.register_verb("patch").unwrap();
        registry.discover(&catalog, None);
        assert_eq!(call(registry.lookup("item", "name", "PATCH").unwrap()), json!("patched"));
    }

    #[test]
    fn test_validate_namespace() {
        let catalog = catalog();
        assert!(validate_namespace("app", &catalog).is_ok());
        assert_eq!(
            validate_namespace("nowhere", &catalog).unwrap_err(),
            ConfigurationError::UndefinedNamespace("nowhere".into())
        );
    }
}
