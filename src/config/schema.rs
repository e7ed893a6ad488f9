//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::adapter::DEFAULT_ROUTE_KEY;

/// Root configuration for the adapter service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Where the adapter is mounted and how it reads the routing parameter.
    pub mount: MountConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
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

/// Adapter mount configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MountConfig {
    /// Path prefix the adapter is served under ("" mounts at the root).
    pub prefix: String,

    /// Name of the catch-all path parameter holding the procedure path.
    pub route_key: String,

    /// Largest request body buffered for the generic handler.
    pub max_body_bytes: usize,
}

impl MountConfig {
    /// Route pattern carrying the routing parameter, e.g. `/api/{*trpc}`.
    pub fn catch_all_route(&self) -> String {
        format!("{}/{{*{}}}", self.trimmed_prefix(), self.route_key)
    }

    /// Route pattern for the prefix itself, which has no routing parameter.
    pub fn bare_route(&self) -> String {
        match self.trimmed_prefix() {
            "" => "/".to_string(),
            prefix => prefix.to_string(),
        }
    }

    fn trimmed_prefix(&self) -> &str {
        self.prefix.trim_end_matches('/')
    }
}

impl Default for MountConfig {
    fn default() -> Self {
        Self {
            prefix: "/api".to_string(),
            route_key: DEFAULT_ROUTE_KEY.to_string(),
            max_body_bytes: 1024 * 1024, // 1MB
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
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

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
