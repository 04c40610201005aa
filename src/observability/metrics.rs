//! Metrics collection.
//!
//! # Responsibilities
//! - Define client metrics (navigations, view loads, API calls, store size)
//! - Record through the `metrics` facade; the host installs a recorder
//!
//! # Metrics
//! - `client_navigations_total` (counter): navigations by route, outcome
//! - `client_view_loads_total` (counter): lazy view loads by route, outcome
//! - `client_api_requests_total` (counter): API calls by method, status
//! - `client_api_request_duration_seconds` (histogram): API latency
//! - `client_store_items` (gauge): items held per store field
//!
//! # Design Decisions
//! - Without an installed recorder every call is a no-op
//! - Status label is "timeout" or "error" when no response arrived

use std::time::Instant;

/// Record a finished navigation.
pub fn record_navigation(route: &str, outcome: &'static str) {
    metrics::counter!(
        "client_navigations_total",
        "route" => route.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

/// Record a lazy view load attempt.
pub fn record_view_load(route: &str, success: bool) {
    let outcome = if success { "ok" } else { "error" };
    metrics::counter!(
        "client_view_loads_total",
        "route" => route.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

/// Record a finished API call.
pub fn record_api_request(method: &str, status: &str, start: Instant) {
    metrics::counter!(
        "client_api_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!(
        "client_api_request_duration_seconds",
        "method" => method.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record the size of a store field after a write.
pub fn record_store_items(field: &'static str, len: usize) {
    metrics::gauge!("client_store_items", "field" => field).set(len as f64);
}
