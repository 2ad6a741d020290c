//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges and shapes (timeouts > 0, addresses parse, verbs alphabetic)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system
//! - Checks needing the service catalog (namespace existence) happen at startup

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::AppConfig;

/// One semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Check a parsed configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if !config.dispatch.mount_point.starts_with('/') {
        errors.push(ValidationError::new(
            "dispatch.mount_point",
            "must start with '/'",
        ));
    }

    if let Some(ns) = &config.dispatch.namespace {
        if ns.is_empty() || ns.starts_with("::") || ns.ends_with("::") {
            errors.push(ValidationError::new(
                "dispatch.namespace",
                format!("'{ns}' is not a namespace path"),
            ));
        }
    }

    if !is_mime_type(&config.dispatch.default_mime_type) {
        errors.push(ValidationError::new(
            "dispatch.default_mime_type",
            format!("'{}' is not a type/subtype pair", config.dispatch.default_mime_type),
        ));
    }

    for verb in &config.dispatch.extra_verbs {
        if verb.is_empty() || !verb.chars().all(|c| c.is_ascii_alphabetic()) {
            errors.push(ValidationError::new(
                "dispatch.extra_verbs",
                format!("'{verb}' is not a valid verb"),
            ));
        }
    }

    if config.dispatch.protocol.trim().is_empty() {
        errors.push(ValidationError::new("dispatch.protocol", "must not be empty"));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }

    if config.limits.max_body_size == 0 {
        errors.push(ValidationError::new("limits.max_body_size", "must be greater than 0"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_mime_type(value: &str) -> bool {
    match value.split_once('/') {
        Some((kind, subtype)) => {
            !kind.is_empty() && !subtype.is_empty() && !value.contains(char::is_whitespace)
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = AppConfig::default();
        config.listener.bind_address = "nowhere".into();
        config.dispatch.mount_point = "api".into();
        config.dispatch.default_mime_type = "json".into();
        config.dispatch.extra_verbs = vec!["patch".into(), "get-all".into()];
        config.timeouts.request_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "listener.bind_address",
                "dispatch.mount_point",
                "dispatch.default_mime_type",
                "dispatch.extra_verbs",
                "timeouts.request_secs",
            ]
        );
        assert_eq!(errors[1].to_string(), "dispatch.mount_point: must start with '/'");
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = AppConfig::default();
        config.observability.metrics_address = "bad".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_namespace_shape() {
        let mut config = AppConfig::default();
        config.dispatch.namespace = Some("app::api".into());
        assert!(validate_config(&config).is_ok());
        config.dispatch.namespace = Some("app::".into());
        assert!(validate_config(&config).is_err());
    }
}
