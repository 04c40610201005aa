//! Location parsing and path matching.
//!
//! # Responsibilities
//! - Parse navigation input into path, query and fragment
//! - Normalize paths so equivalent spellings share one route key
//!
//! # Design Decisions
//! - Matching ignores case and a trailing slash
//! - Query and fragment never take part in matching
//! - Input must be an absolute path; scheme-relative input (`//host`) is rejected
//! - No regex to guarantee O(1) lookups by key

use std::collections::BTreeMap;
use std::fmt;

use url::Url;

use crate::routing::error::NavigationError;

const PARSE_BASE: &str = "http://router.invalid/";

/// A router-level address: path plus optional query and fragment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    path: String,
    query: BTreeMap<String, String>,
    hash: Option<String>,
}

impl Location {
    /// A location for an already-normalized path.
    pub fn new(path: &str) -> Self {
        Self {
            path: normalize_path(path),
            query: BTreeMap::new(),
            hash: None,
        }
    }

    /// Parse `/path?query#fragment`.
    pub fn parse(input: &str) -> Result<Self, NavigationError> {
        let invalid = |reason: &str| NavigationError::InvalidPath {
            path: input.to_string(),
            reason: reason.to_string(),
        };

        if !input.starts_with('/') {
            return Err(invalid("path must start with '/'"));
        }
        if input.starts_with("//") {
            return Err(invalid("scheme-relative paths are not allowed"));
        }

        let base = Url::parse(PARSE_BASE).map_err(|e| invalid(&e.to_string()))?;
        let url = base.join(input).map_err(|e| invalid(&e.to_string()))?;

        Ok(Self {
            path: normalize_path(url.path()),
            query: url.query_pairs().into_owned().collect(),
            hash: url.fragment().filter(|f| !f.is_empty()).map(str::to_string),
        })
    }

    /// Add a query parameter.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &BTreeMap<String, String> {
        &self.query
    }

    pub fn hash(&self) -> Option<&str> {
        self.hash.as_deref()
    }

    /// Key used for route lookup.
    pub fn route_key(&self) -> String {
        route_key(&self.path)
    }

    /// Path with query string and fragment.
    pub fn full_path(&self) -> String {
        let mut out = self.path.clone();
        if !self.query.is_empty() {
            let query = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(self.query.iter())
                .finish();
            out.push('?');
            out.push_str(&query);
        }
        if let Some(hash) = &self.hash {
            out.push('#');
            out.push_str(hash);
        }
        out
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_path())
    }
}

/// Ensure a leading slash and drop trailing slashes (except for the root).
pub fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return "/".to_string();
    }
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

/// Case-insensitive lookup key for a path.
pub fn route_key(path: &str) -> String {
    normalize_path(path).to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_path_query_hash() {
        let loc = Location::parse("/route?step=2&mode=gpx#upload").unwrap();
        assert_eq!(loc.path(), "/route");
        assert_eq!(loc.query().get("step").map(String::as_str), Some("2"));
        assert_eq!(loc.query().get("mode").map(String::as_str), Some("gpx"));
        assert_eq!(loc.hash(), Some("upload"));
        assert_eq!(loc.full_path(), "/route?mode=gpx&step=2#upload");
    }

    #[test]
    fn test_normalization() {
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("/route/"), "/route");
        assert_eq!(normalize_path("simulate"), "/simulate");
        assert_eq!(route_key("/Destination/"), "/destination");
    }

    #[test]
    fn test_dot_segments_resolved() {
        let loc = Location::parse("/route/../simulate").unwrap();
        assert_eq!(loc.path(), "/simulate");
    }

    #[test]
    fn test_rejects_non_paths() {
        assert!(matches!(
            Location::parse("route"),
            Err(NavigationError::InvalidPath { .. })
        ));
        assert!(matches!(
            Location::parse("//evil.example/route"),
            Err(NavigationError::InvalidPath { .. })
        ));
    }

    #[test]
    fn test_query_encoding_round_trip() {
        let loc = Location::new("/destination").with_query("name", "Main & 3rd");
        let parsed = Location::parse(&loc.full_path()).unwrap();
        assert_eq!(parsed, loc);
    }
}
