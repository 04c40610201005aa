//! Backend HTTP client with a fixed base address, timeout and headers.
//!
//! # Responsibilities
//! - Join relative request paths onto the configured base address
//! - Attach default headers, `Content-Type: application/json` and a request ID
//! - Bound every exchange (send + body read) by the configured timeout
//! - Turn transport failures and non-success statuses into `ApiError`
//!
//! # Design Decisions
//! - One attempt per call; retry policy belongs to the caller
//! - Absolute URLs are rejected so every call targets the backend
//! - Cookie store is kept so the backend session survives between calls

use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::time::timeout;
use url::Url;
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::config::ApiConfig;
use crate::observability::metrics;

/// Header carrying the per-call correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Shared HTTP client for backend calls. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    timeout: Duration,
}

impl ApiClient {
    /// Build a client from configuration.
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        let base = parse_base(&config.base_address)?;
        let timeout = Duration::from_millis(config.timeout_ms);

        let mut headers = HeaderMap::new();
        for (name, value) in &config.default_headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ApiError::InvalidHeader(name.clone()))?;
            let header_value =
                HeaderValue::from_str(value).map_err(|_| ApiError::InvalidHeader(name.clone()))?;
            headers.insert(header_name, header_value);
        }
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .cookie_store(true)
            .build()
            .map_err(|e| ApiError::Transport {
                url: base.to_string(),
                reason: e.to_string(),
            })?;

        tracing::debug!(
            base_address = %base,
            timeout_ms = config.timeout_ms,
            "API client initialized"
        );

        Ok(Self { http, base, timeout })
    }

    /// The base address every path is joined onto.
    pub fn base_address(&self) -> &Url {
        &self.base
    }

    /// The per-call timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Resolve a relative path against the base address.
    pub fn url(&self, path: &str) -> ApiResult<Url> {
        if Url::parse(path).is_ok() {
            return Err(ApiError::InvalidUrl {
                url: path.to_string(),
                reason: "absolute URLs bypass the configured base address".to_string(),
            });
        }
        let joined = self
            .base
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::InvalidUrl {
                url: format!("{}{}", self.base, path),
                reason: e.to_string(),
            })?;
        // Dot segments are resolved by the join and may climb above the base.
        if !joined.as_str().starts_with(self.base.as_str()) {
            return Err(ApiError::InvalidUrl {
                url: joined.to_string(),
                reason: format!("path leaves the base address {}", self.base),
            });
        }
        Ok(joined)
    }

    /// `GET path`.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.execute(Method::GET, path, |req| req).await
    }

    /// `GET path?query`.
    pub async fn get_with_query<Q, T>(&self, path: &str, query: &Q) -> ApiResult<T>
    where
        Q: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(Method::GET, path, |req| req.query(query)).await
    }

    /// `POST path` with a JSON body.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let bytes = serde_json::to_vec(body).map_err(ApiError::Serialize)?;
        self.execute(Method::POST, path, move |req| req.body(bytes)).await
    }

    /// `PUT path` with a JSON body.
    pub async fn put<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let bytes = serde_json::to_vec(body).map_err(ApiError::Serialize)?;
        self.execute(Method::PUT, path, move |req| req.body(bytes)).await
    }

    /// `DELETE path`.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.execute(Method::DELETE, path, |req| req).await
    }

    /// Arbitrary method with an optional JSON body.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> ApiResult<T> {
        let bytes = body
            .map(serde_json::to_vec)
            .transpose()
            .map_err(ApiError::Serialize)?;
        self.execute(method, path, move |req| match bytes {
            Some(bytes) => req.body(bytes),
            None => req,
        })
        .await
    }

    async fn execute<T, F>(&self, method: Method, path: &str, build: F) -> ApiResult<T>
    where
        T: DeserializeOwned,
        F: FnOnce(RequestBuilder) -> RequestBuilder,
    {
        let url = self.url(path)?;
        let request_id = Uuid::new_v4();
        let start = Instant::now();

        let request = build(
            self.http
                .request(method.clone(), url.clone())
                .header(X_REQUEST_ID, request_id.to_string()),
        );

        tracing::debug!(
            request_id = %request_id,
            method = %method,
            url = %url,
            "Sending request"
        );

        let exchange = async {
            let response = request.send().await?;
            let status = response.status();
            let bytes = response.bytes().await?;
            Ok::<_, reqwest::Error>((status, bytes))
        };

        let (status, bytes) = match timeout(self.timeout, exchange).await {
            Ok(Ok(done)) => done,
            Ok(Err(e)) => {
                let err = self.classify(&url, e);
                let label = if err.is_timeout() { "timeout" } else { "error" };
                metrics::record_api_request(method.as_str(), label, start);
                tracing::warn!(request_id = %request_id, error = %err, "Request failed");
                return Err(err);
            }
            Err(_) => {
                metrics::record_api_request(method.as_str(), "timeout", start);
                let err = self.timeout_error(&url);
                tracing::warn!(request_id = %request_id, error = %err, "Request timed out");
                return Err(err);
            }
        };

        metrics::record_api_request(method.as_str(), status.as_str(), start);

        if !status.is_success() {
            let body = String::from_utf8_lossy(&bytes).into_owned();
            let message = error_message(&body);
            tracing::warn!(
                request_id = %request_id,
                status = status.as_u16(),
                message = ?message,
                "Backend returned error status"
            );
            return Err(ApiError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                message,
                body,
            });
        }

        tracing::debug!(
            request_id = %request_id,
            status = status.as_u16(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Response received"
        );

        decode(&url, status, &bytes)
    }

    fn timeout_error(&self, url: &Url) -> ApiError {
        ApiError::Timeout {
            url: url.to_string(),
            timeout_ms: self.timeout.as_millis() as u64,
        }
    }

    fn classify(&self, url: &Url, err: reqwest::Error) -> ApiError {
        if err.is_timeout() {
            self.timeout_error(url)
        } else if err.is_connect() {
            ApiError::Connect {
                url: url.to_string(),
                reason: err.without_url().to_string(),
            }
        } else {
            ApiError::Transport {
                url: url.to_string(),
                reason: err.without_url().to_string(),
            }
        }
    }
}

fn parse_base(address: &str) -> ApiResult<Url> {
    let mut base = Url::parse(address).map_err(|e| ApiError::InvalidUrl {
        url: address.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(base.scheme(), "http" | "https") {
        return Err(ApiError::InvalidUrl {
            url: address.to_string(),
            reason: format!("unsupported scheme '{}'", base.scheme()),
        });
    }
    // Url::join replaces the last segment unless the base ends in '/'.
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base)
}

/// Pull a human-readable message out of an error body.
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["error", "detail"]
        .iter()
        .find_map(|key| value.get(key).and_then(Value::as_str))
        .map(str::to_string)
}

fn decode<T: DeserializeOwned>(url: &Url, status: StatusCode, bytes: &[u8]) -> ApiResult<T> {
    let result = if status == StatusCode::NO_CONTENT || bytes.iter().all(u8::is_ascii_whitespace) {
        serde_json::from_value(Value::Null)
    } else {
        serde_json::from_slice(bytes)
    };
    result.map_err(|source| ApiError::Decode {
        url: url.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(&ApiConfig {
            base_address: base.to_string(),
            ..ApiConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_paths_join_onto_base() {
        let api = client("http://localhost:8000/api/");
        assert_eq!(api.url("route/").unwrap().as_str(), "http://localhost:8000/api/route/");
        assert_eq!(
            api.url("/stoplights/").unwrap().as_str(),
            "http://localhost:8000/api/stoplights/"
        );
    }

    #[test]
    fn test_base_without_trailing_slash() {
        let api = client("http://localhost:8000/api");
        assert_eq!(api.base_address().as_str(), "http://localhost:8000/api/");
        assert_eq!(api.url("route/").unwrap().as_str(), "http://localhost:8000/api/route/");
    }

    #[test]
    fn test_absolute_url_rejected() {
        let api = client("http://localhost:8000/api/");
        let err = api.url("http://elsewhere.example/route/").unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl { .. }));
    }

    #[test]
    fn test_dot_segments_cannot_leave_base() {
        let api = client("http://localhost:8000/api/");
        for path in ["../admin/", "stoplights/../../x", "/../x"] {
            let err = api.url(path).unwrap_err();
            assert!(matches!(err, ApiError::InvalidUrl { .. }), "{path} was accepted");
        }
        assert_eq!(
            api.url("stoplights/../route/").unwrap().as_str(),
            "http://localhost:8000/api/route/"
        );
    }

    #[test]
    fn test_invalid_configuration() {
        let bad_scheme = ApiClient::new(&ApiConfig {
            base_address: "ftp://localhost/api/".into(),
            ..ApiConfig::default()
        });
        assert!(matches!(bad_scheme, Err(ApiError::InvalidUrl { .. })));

        let mut config = ApiConfig::default();
        config.default_headers.insert("X Bad".into(), "1".into());
        assert!(matches!(ApiClient::new(&config), Err(ApiError::InvalidHeader(_))));
    }

    #[test]
    fn test_timeout_from_config() {
        let api = client("http://localhost:8000/api/");
        assert_eq!(api.timeout(), Duration::from_millis(5000));
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            error_message(r#"{"error": "No coordinates provided."}"#).as_deref(),
            Some("No coordinates provided.")
        );
        assert_eq!(
            error_message(r#"{"detail": "Not found."}"#).as_deref(),
            Some("Not found.")
        );
        assert_eq!(error_message("<html>oops</html>"), None);
    }

    #[test]
    fn test_decode_empty_body() {
        let url = Url::parse("http://localhost/api/").unwrap();
        let unit: Option<Value> = decode(&url, StatusCode::NO_CONTENT, b"").unwrap();
        assert_eq!(unit, None);

        let err = decode::<Vec<u8>>(&url, StatusCode::OK, b"not json").unwrap_err();
        assert!(matches!(err, ApiError::Decode { .. }));
    }
}
