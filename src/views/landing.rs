use futures_util::future::BoxFuture;

use crate::app::AppContext;
use crate::store::StoplightState;
use crate::views::{View, ViewError};

/// Entry page. Arriving here starts a new flow, so data left behind by a
/// previous route submission is dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct LandingPageView;

impl View for LandingPageView {
    fn name(&self) -> &'static str {
        "LandingPageView"
    }

    fn enter<'a>(&'a self, ctx: &'a AppContext) -> BoxFuture<'a, Result<(), ViewError>> {
        Box::pin(async move {
            if !ctx.store.snapshot().is_empty() {
                tracing::debug!("Clearing stoplight data from previous flow");
                ctx.store.clear();
            }
            Ok(())
        })
    }
}
