//! Request path parsing.
//!
//! # Responsibilities
//! - Strip the mount point the dispatcher is served under, rejecting paths outside it
//! - Drop a query string or fragment and one trailing slash
//! - Split into resource slug, method slug and positional arguments
//!
//! # Design Decisions
//! - The mount point matches whole segments only: `/apiprofile` is not under `/api`
//! - Segments are taken verbatim (no percent-decoding, no collapsing of `//`)
//! - An empty method slug is legal (`/profile//42` targets an operation named `get`)

use crate::error::RoutingError;

/// Route lookup key extracted from a request path and verb.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteKey {
    pub resource: String,
    pub method: String,
    pub verb: String,
    /// Segments after the method slug, in order.
    pub args: Vec<String>,
}

impl RouteKey {
    /// Parse `path` served under `mount_point` into a route key for `verb`.
    pub fn parse(path: &str, mount_point: &str, verb: &str) -> Result<Self, RoutingError> {
        let relative = strip_mount_point(trim_query(path), mount_point)
            .ok_or_else(|| RoutingError::OutsideMountPoint(path.to_string()))?;
        let relative = relative.strip_suffix('/').unwrap_or(relative);

        let mut segments = relative.split('/').map(str::to_string);
        match (segments.next(), segments.next()) {
            (Some(resource), Some(method)) => Ok(Self {
                resource,
                method,
                verb: verb.to_ascii_lowercase(),
                args: segments.collect(),
            }),
            _ => Err(RoutingError::PathTooShort(path.to_string())),
        }
    }
}

/// The part of `path` below `mount_point`, or `None` when the path is not under it.
fn strip_mount_point<'a>(path: &'a str, mount_point: &str) -> Option<&'a str> {
    let mount = mount_point.trim_end_matches('/');
    let rest = path.strip_prefix(mount)?;
    if rest.is_empty() {
        return Some(rest);
    }
    match rest.strip_prefix('/') {
        Some(rest) => Some(rest),
        // "/" mounts everything, including relative paths
        None if mount.is_empty() => Some(rest),
        None => None,
    }
}

fn trim_query(path: &str) -> &str {
    match path.find(['?', '#']) {
        Some(idx) => &path[..idx],
        None => path,
    }
}
