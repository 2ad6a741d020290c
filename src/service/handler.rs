//! The handler interface invoked for a routed operation.

use std::sync::Arc;

use serde_json::Value;

use crate::dispatch::HandlerContext;
use crate::error::HandlerError;

/// Result returned by a handler invocation.
pub type HandlerResult = Result<Value, HandlerError>;

/// A unit implementing one routed operation.
///
/// Handlers are synchronous. Anything asynchronous must complete before `invoke`
/// returns.
pub trait Handler: Send + Sync + 'static {
    fn invoke(&self, ctx: &HandlerContext) -> HandlerResult;
}

impl<F> Handler for F
where
    F: Fn(&HandlerContext) -> HandlerResult + Send + Sync + 'static,
{
    fn invoke(&self, ctx: &HandlerContext) -> HandlerResult {
        self(ctx)
    }
}

/// Shared handler instance stored in the route table.
pub type SharedHandler = Arc<dyn Handler>;
