//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the client.
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::deployment::BuildConfig;

/// Root configuration for the client application.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Backend HTTP API settings.
    pub api: ApiConfig,

    /// Simulation WebSocket settings.
    pub simulation: SimulationConfig,

    /// Asset paths and deployment environment.
    pub build: BuildConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Backend HTTP API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base address every request path is joined onto.
    pub base_address: String,

    /// Total time allowed for one request/response exchange, in milliseconds.
    pub timeout_ms: u64,

    /// Headers sent on every request.
    pub default_headers: BTreeMap<String, String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        let mut default_headers = BTreeMap::new();
        default_headers.insert("Content-Type".to_string(), "application/json".to_string());
        Self {
            base_address: "http://localhost:8000/api/".to_string(),
            timeout_ms: 5000,
            default_headers,
        }
    }
}

/// Simulation channel configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// WebSocket endpoint (ws:// or wss://).
    pub url: String,

    /// Connect and reply timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            url: "ws://localhost:8000/ws/simulation/".to_string(),
            timeout_ms: 5000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines instead of human-readable ones.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.base_address, "http://localhost:8000/api/");
        assert_eq!(config.timeout_ms, 5000);
        assert_eq!(
            config.default_headers.get("Content-Type").map(String::as_str),
            Some("application/json")
        );
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [api]
            timeout_ms = 1500

            [observability]
            json_logs = true
            "#,
        )
        .unwrap();

        assert_eq!(config.api.timeout_ms, 1500);
        assert_eq!(config.api.base_address, "http://localhost:8000/api/");
        assert!(config.observability.json_logs);
        assert_eq!(config.simulation.url, "ws://localhost:8000/ws/simulation/");
    }
}
