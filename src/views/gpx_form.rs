//! Route form: upload a GPX track, get back the stoplight groups on it.

use crate::app::AppContext;
use crate::gpx;
use crate::model::{Coordinate, StoplightGroup};
use crate::store::StoplightState;
use crate::views::{View, ViewError};

#[derive(Debug, Default, Clone, Copy)]
pub struct GpxFormView;

impl GpxFormView {
    /// Parse a GPX document and submit its points.
    pub async fn submit_gpx(
        &self,
        ctx: &AppContext,
        xml: &str,
    ) -> Result<Vec<StoplightGroup>, ViewError> {
        let points = gpx::parse_points(xml)?;
        self.submit_coordinates(ctx, &points).await
    }

    /// Submit route points, then store and return the matched stoplight groups.
    pub async fn submit_coordinates(
        &self,
        ctx: &AppContext,
        points: &[Coordinate],
    ) -> Result<Vec<StoplightGroup>, ViewError> {
        if points.is_empty() {
            return Err(ViewError::InvalidInput(
                "the route has no points to submit".to_string(),
            ));
        }

        ctx.api.submit_route(points).await?;
        let groups = ctx.api.fetch_stoplight_groups().await?;

        tracing::info!(points = points.len(), groups = groups.len(), "Route matched");
        ctx.store.set_stoplight_groups(groups.clone());
        Ok(groups)
    }
}

impl View for GpxFormView {
    fn name(&self) -> &'static str {
        "GpxFormView"
    }
}
