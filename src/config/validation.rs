//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses parse with the scheme their transport expects
//! - Validate value ranges (timeouts > 0)
//! - Validate header names and values before the client is built
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use reqwest::header::{HeaderName, HeaderValue};
use url::Url;

use crate::config::schema::AppConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("api.base_address '{address}' is not an http(s) URL: {reason}")]
    InvalidBaseAddress { address: String, reason: String },

    #[error("{field} must be greater than zero")]
    ZeroTimeout { field: &'static str },

    #[error("api.default_headers contains an invalid header '{name}'")]
    InvalidHeader { name: String },

    #[error("simulation.url '{url}' is not a ws(s) URL")]
    InvalidSimulationUrl { url: String },

    #[error("build.base_path '{path}' must start and end with '/'")]
    InvalidBasePath { path: String },

    #[error("observability.log_level '{level}' is not one of trace, debug, info, warn, error")]
    InvalidLogLevel { level: String },
}

/// Check a parsed configuration for semantic errors.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match Url::parse(&config.api.base_address) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ValidationError::InvalidBaseAddress {
            address: config.api.base_address.clone(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        }),
        Err(e) => errors.push(ValidationError::InvalidBaseAddress {
            address: config.api.base_address.clone(),
            reason: e.to_string(),
        }),
    }

    if config.api.timeout_ms == 0 {
        errors.push(ValidationError::ZeroTimeout { field: "api.timeout_ms" });
    }
    if config.simulation.timeout_ms == 0 {
        errors.push(ValidationError::ZeroTimeout { field: "simulation.timeout_ms" });
    }

    for (name, value) in &config.api.default_headers {
        let valid = HeaderName::from_bytes(name.as_bytes()).is_ok()
            && HeaderValue::from_str(value).is_ok();
        if !valid {
            errors.push(ValidationError::InvalidHeader { name: name.clone() });
        }
    }

    let ws_ok = Url::parse(&config.simulation.url)
        .map(|u| matches!(u.scheme(), "ws" | "wss"))
        .unwrap_or(false);
    if !ws_ok {
        errors.push(ValidationError::InvalidSimulationUrl {
            url: config.simulation.url.clone(),
        });
    }

    if let Some(path) = &config.build.base_path {
        if !path.starts_with('/') || !path.ends_with('/') {
            errors.push(ValidationError::InvalidBasePath { path: path.clone() });
        }
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::InvalidLogLevel {
            level: config.observability.log_level.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
