//! Declared service types.
//!
//! The catalog is the explicit registration list the application hands to the
//! dispatcher: every handler type it wants discoverable, with its public operations.

use std::fmt;
use std::sync::Arc;

use super::handler::{Handler, HandlerResult, SharedHandler};
use crate::dispatch::HandlerContext;

/// One public operation of a service type.
#[derive(Clone)]
pub struct Operation {
    pub name: String,
    pub handler: SharedHandler,
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation").field("name", &self.name).finish()
    }
}

/// A declared handler type: fully-qualified name plus operations.
#[derive(Debug, Clone)]
pub struct ServiceType {
    name: String,
    operations: Vec<Operation>,
}

impl ServiceType {
    /// Declare a type, e.g. `ServiceType::new("app::ProfileService")`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            operations: Vec::new(),
        }
    }

    /// Add a public operation backed by a function or closure.
    ///
    /// Operations are scanned in declaration order.
    pub fn operation<F>(self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&HandlerContext) -> HandlerResult + Send + Sync + 'static,
    {
        self.handler(name, f)
    }

    /// Add a public operation backed by any `Handler` implementation.
    pub fn handler(mut self, name: impl Into<String>, handler: impl Handler) -> Self {
        self.operations.push(Operation {
            name: name.into(),
            handler: Arc::new(handler),
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }
}

/// All service types known to the process.
#[derive(Debug, Clone, Default)]
pub struct ServiceCatalog {
    types: Vec<ServiceType>,
}

impl ServiceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a type. A later declaration with the same name replaces the earlier one.
    pub fn declare(&mut self, service: ServiceType) -> &mut Self {
        self.types.retain(|t| t.name != service.name);
        self.types.push(service);
        self
    }

    /// Builder-style `declare`.
    pub fn with(mut self, service: ServiceType) -> Self {
        self.declare(service);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ServiceType> {
        self.types.iter().find(|t| t.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ServiceType> {
        self.types.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.iter().map(|t| t.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
