//! Build and deployment settings.
//!
//! # Responsibilities
//! - Pick the public base path assets and pages are served under
//! - Resolve the `@` source alias used by asset references
//!
//! # Design Decisions
//! - Production is served from `/static/`, development from `/`
//! - An explicit `base_path` always wins over the environment default

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Environment the client is deployed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentEnv {
    #[default]
    Development,
    Production,
}

impl DeploymentEnv {
    /// Base path pages and assets are served under in this environment.
    pub fn default_base_path(self) -> &'static str {
        match self {
            DeploymentEnv::Development => "/",
            DeploymentEnv::Production => "/static/",
        }
    }
}

impl fmt::Display for DeploymentEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeploymentEnv::Development => write!(f, "development"),
            DeploymentEnv::Production => write!(f, "production"),
        }
    }
}

/// Unrecognized deployment environment name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown deployment environment '{0}' (expected development or production)")]
pub struct UnknownDeploymentEnv(pub String);

impl FromStr for DeploymentEnv {
    type Err = UnknownDeploymentEnv;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(DeploymentEnv::Development),
            "production" | "prod" => Ok(DeploymentEnv::Production),
            other => Err(UnknownDeploymentEnv(other.to_string())),
        }
    }
}

/// Asset path configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Deployment environment.
    pub deployment: DeploymentEnv,

    /// Explicit public base path; overrides the environment default.
    pub base_path: Option<String>,

    /// Alias prefix for the source root.
    pub alias: String,

    /// Directory the alias points at.
    pub source_root: PathBuf,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            deployment: DeploymentEnv::Development,
            base_path: None,
            alias: "@".to_string(),
            source_root: PathBuf::from("./src"),
        }
    }
}

impl BuildConfig {
    /// Effective public base path.
    pub fn base_path(&self) -> &str {
        self.base_path
            .as_deref()
            .unwrap_or_else(|| self.deployment.default_base_path())
    }

    /// Resolve an aliased reference such as `@/views/Landing` against the
    /// source root. References without the alias are returned unchanged.
    pub fn resolve_alias(&self, reference: &str) -> PathBuf {
        match reference.strip_prefix(self.alias.as_str()) {
            Some(rest) if rest.is_empty() => self.source_root.clone(),
            Some(rest) if rest.starts_with('/') => {
                self.source_root.join(rest.trim_start_matches('/'))
            }
            _ => PathBuf::from(reference),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_path_follows_environment() {
        let mut build = BuildConfig::default();
        assert_eq!(build.base_path(), "/");

        build.deployment = DeploymentEnv::Production;
        assert_eq!(build.base_path(), "/static/");

        build.base_path = Some("/app/".to_string());
        assert_eq!(build.base_path(), "/app/");
    }

    #[test]
    fn test_parse_environment() {
        assert_eq!("production".parse(), Ok(DeploymentEnv::Production));
        assert_eq!(" Dev ".parse(), Ok(DeploymentEnv::Development));
        assert!("staging".parse::<DeploymentEnv>().is_err());
    }

    #[test]
    fn test_alias_resolution() {
        let build = BuildConfig::default();
        assert_eq!(
            build.resolve_alias("@/views/Landing.rs"),
            PathBuf::from("./src").join("views/Landing.rs")
        );
        assert_eq!(build.resolve_alias("@"), PathBuf::from("./src"));
        // Only a whole-segment alias is rewritten.
        assert_eq!(build.resolve_alias("@scope/pkg"), PathBuf::from("@scope/pkg"));
        assert_eq!(build.resolve_alias("assets/logo.svg"), PathBuf::from("assets/logo.svg"));
    }
}
