//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the dispatcher and
//! its host server. All types derive Serde traits for deserialization from TOML.

use serde::{Deserialize, Serialize};

use crate::dispatch::composer::{CompressionPolicy, DEFAULT_COMPRESSION_MIN_SIZE};
use crate::dispatch::status::DEFAULT_PROTOCOL;
use crate::dispatch::DispatchSettings;
use crate::encoding::APPLICATION_JSON;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Routing and discovery settings.
    pub dispatch: DispatchConfig,

    /// Response compression.
    pub compression: CompressionConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request size limits.
    pub limits: LimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// Runtime dispatcher settings derived from this config.
    pub fn dispatch_settings(&self) -> DispatchSettings {
        DispatchSettings {
            mount_point: self.dispatch.mount_point.clone(),
            auto_discovery: self.dispatch.auto_discovery,
            namespace: self.dispatch.namespace.clone(),
            compression: CompressionPolicy {
                enabled: self.compression.enabled,
                min_size: self.compression.min_size,
            },
            protocol: self.dispatch.protocol.clone(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Routing and discovery configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct DispatchConfig {
    /// Path prefix the API is served under.
    pub mount_point: String,

    /// Register every declared service type on first request.
    pub auto_discovery: bool,

    /// Restrict discovery to types under this namespace.
    pub namespace: Option<String>,

    /// MIME type used when the client's first accepted type has no encoder.
    pub default_mime_type: String,

    /// Verbs recognized in addition to the standard ones, in priority order.
    pub extra_verbs: Vec<String>,

    /// Protocol token used in status lines.
    pub protocol: String,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            mount_point: "/".to_string(),
            auto_discovery: true,
            namespace: None,
            default_mime_type: APPLICATION_JSON.to_string(),
            extra_verbs: Vec::new(),
            protocol: DEFAULT_PROTOCOL.to_string(),
        }
    }
}

/// Response compression configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct CompressionConfig {
    /// Enable gzip for clients that accept it.
    pub enabled: bool,

    /// Smallest body in bytes worth compressing.
    pub min_size: usize,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_size: DEFAULT_COMPRESSION_MIN_SIZE,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Request size limits.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
