//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize, apply STOPLIGHT_* env overrides)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → shared via Arc through the application context
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod deployment;
pub mod loader;
pub mod schema;
pub mod validation;

pub use deployment::{BuildConfig, DeploymentEnv};
pub use loader::{load_config, load_default_config, validate, ConfigError};
pub use schema::{ApiConfig, AppConfig, ObservabilityConfig, SimulationConfig};
