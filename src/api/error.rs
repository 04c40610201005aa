//! Error definitions for backend calls.

use thiserror::Error;

/// Errors that can occur while talking to the backend API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No complete response within the configured timeout.
    #[error("request to {url} timed out after {timeout_ms} ms")]
    Timeout { url: String, timeout_ms: u64 },

    /// The backend could not be reached.
    #[error("could not connect to {url}: {reason}")]
    Connect { url: String, reason: String },

    /// The backend answered with a non-success status.
    #[error("{url} returned status {status}{}", message_suffix(.message))]
    Status {
        url: String,
        status: u16,
        /// The backend's `error` field, when the body carries one.
        message: Option<String>,
        body: String,
    },

    /// The response body did not match the expected shape.
    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// The request body could not be encoded.
    #[error("could not encode request body: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Any other transport failure.
    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    /// The base address or request path does not form a valid URL.
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// A configured default header is not a valid HTTP header.
    #[error("invalid default header '{0}'")]
    InvalidHeader(String),
}

fn message_suffix(message: &Option<String>) -> String {
    message.as_ref().map(|m| format!(": {m}")).unwrap_or_default()
}

impl ApiError {
    /// Whether the failure was the request timeout firing.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Timeout { .. })
    }

    /// HTTP status of a non-success response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for backend calls.
pub type ApiResult<T> = Result<T, ApiError>;
