//! Typed calls for the backend endpoints the form views use.
//!
//! The backend keeps the stoplight groups matched by a route submission in
//! the caller's session, so `fetch_stoplight_groups` only returns data
//! after `submit_route` was called on the same client.

use serde::{Deserialize, Serialize};

use crate::api::client::ApiClient;
use crate::api::error::ApiResult;
use crate::model::{Coordinate, StoplightGroup};

/// Route submission endpoint, relative to the API base.
pub const ROUTE_PATH: &str = "route/";
/// Session stoplight lookup endpoint, relative to the API base.
pub const STOPLIGHTS_PATH: &str = "stoplights/";

/// Body of a route submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteSubmission {
    pub coordinates: Vec<Coordinate>,
}

/// Plain acknowledgement from the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Stoplight groups stored in the session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoplightGroupsResponse {
    #[serde(default)]
    pub stoplight_groups: Vec<StoplightGroup>,
}

impl ApiClient {
    /// Submit route coordinates; the backend matches them to stoplight groups.
    pub async fn submit_route(&self, coordinates: &[Coordinate]) -> ApiResult<MessageResponse> {
        let body = RouteSubmission {
            coordinates: coordinates.to_vec(),
        };
        let response: MessageResponse = self.post(ROUTE_PATH, &body).await?;
        tracing::info!(
            points = coordinates.len(),
            message = %response.message,
            "Route submitted"
        );
        Ok(response)
    }

    /// Stoplight groups matched by the last route submission.
    pub async fn fetch_stoplight_groups(&self) -> ApiResult<Vec<StoplightGroup>> {
        let response: StoplightGroupsResponse = self.get(STOPLIGHTS_PATH).await?;
        tracing::debug!(groups = response.stoplight_groups.len(), "Stoplight groups fetched");
        Ok(response.stoplight_groups)
    }
}
