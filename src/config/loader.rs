//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::deployment::UnknownDeploymentEnv;
use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Overrides the backend base address.
pub const ENV_API_BASE: &str = "STOPLIGHT_API_BASE";
/// Overrides the request timeout in milliseconds.
pub const ENV_API_TIMEOUT_MS: &str = "STOPLIGHT_API_TIMEOUT_MS";
/// Selects the deployment environment (development, production).
pub const ENV_DEPLOY_ENV: &str = "STOPLIGHT_DEPLOY_ENV";
/// Overrides the public base path outright.
pub const ENV_BASE_URL: &str = "STOPLIGHT_BASE_URL";
/// Overrides the simulation WebSocket URL.
pub const ENV_SIMULATION_URL: &str = "STOPLIGHT_SIMULATION_URL";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("{name}: {reason}")]
    Env { name: &'static str, reason: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file, then apply
/// environment overrides.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content)?;
    finish(config)
}

/// Defaults plus environment overrides, for runs without a config file.
pub fn load_default_config() -> Result<AppConfig, ConfigError> {
    finish(AppConfig::default())
}

/// Semantic checks, for configs changed after loading (command-line overrides).
pub fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    validate_config(config).map_err(ConfigError::Validation)
}

fn finish(mut config: AppConfig) -> Result<AppConfig, ConfigError> {
    apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;
    validate(&config)?;

    tracing::debug!(
        base_address = %config.api.base_address,
        timeout_ms = config.api.timeout_ms,
        deployment = %config.build.deployment,
        base_path = %config.build.base_path(),
        "Configuration loaded"
    );
    Ok(config)
}

/// Apply overrides from a variable lookup (normally the process env).
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(base) = lookup(ENV_API_BASE) {
        config.api.base_address = base;
    }
    if let Some(raw) = lookup(ENV_API_TIMEOUT_MS) {
        config.api.timeout_ms = raw.trim().parse().map_err(|e| ConfigError::Env {
            name: ENV_API_TIMEOUT_MS,
            reason: format!("'{}' is not a number of milliseconds: {}", raw, e),
        })?;
    }
    if let Some(raw) = lookup(ENV_DEPLOY_ENV) {
        config.build.deployment = raw
            .parse()
            .map_err(|e: UnknownDeploymentEnv| ConfigError::Env {
                name: ENV_DEPLOY_ENV,
                reason: e.to_string(),
            })?;
    }
    if let Some(base_path) = lookup(ENV_BASE_URL) {
        config.build.base_path = Some(base_path);
    }
    if let Some(url) = lookup(ENV_SIMULATION_URL) {
        config.simulation.url = url;
    }
    Ok(())
}
