//! Routing error definitions.

use thiserror::Error;

use crate::routing::route::LoadError;

/// Errors reported to the caller of a navigation.
#[derive(Debug, Error)]
pub enum NavigationError {
    /// No route matches and no fallback is registered.
    #[error("no route matches '{path}'")]
    NoMatch { path: String },

    /// Named navigation to a name that is not in the route table.
    #[error("no route named '{name}'")]
    UnknownRouteName { name: String },

    /// The requested path could not be parsed.
    #[error("invalid navigation path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    /// A lazily loaded view failed to load.
    #[error("failed to load view for route '{route}': {source}")]
    LoadFailed {
        route: String,
        #[source]
        source: LoadError,
    },

    /// A newer navigation started before this one finished.
    #[error("navigation to '{path}' was superseded by a newer navigation")]
    Superseded { path: String },

    /// Back/forward past the end of the history.
    #[error("no history entry {delta} step(s) away")]
    NoHistory { delta: isize },
}

impl NavigationError {
    /// Short label for metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            NavigationError::NoMatch { .. } => "no_match",
            NavigationError::UnknownRouteName { .. } => "unknown_name",
            NavigationError::InvalidPath { .. } => "invalid_path",
            NavigationError::LoadFailed { .. } => "load_failed",
            NavigationError::Superseded { .. } => "superseded",
            NavigationError::NoHistory { .. } => "no_history",
        }
    }
}

/// A single problem in a route table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteDefError {
    #[error("route '{name}' has path '{path}' which does not start with '/'")]
    InvalidPath { name: String, path: String },

    #[error("route with path '{path}' has an empty name")]
    EmptyName { path: String },

    #[error("path '{path}' is used by both '{first}' and '{second}'")]
    DuplicatePath {
        path: String,
        first: String,
        second: String,
    },

    #[error("route name '{name}' is used more than once")]
    DuplicateName { name: String },
}

/// Every problem found while building a route table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid route table: {}", join(.errors))]
pub struct RouteTableError {
    pub errors: Vec<RouteDefError>,
}

fn join(errors: &[RouteDefError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
