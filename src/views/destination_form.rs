//! Destination form: works on the stoplight groups the route form found.

use std::sync::Arc;

use futures_util::future::BoxFuture;

use crate::app::AppContext;
use crate::model::{Stoplight, StoplightGroup};
use crate::store::StoplightState;
use crate::views::{View, ViewError};

#[derive(Debug, Default, Clone, Copy)]
pub struct DestinationFormView;

impl DestinationFormView {
    /// Stoplight groups currently shared by the route form.
    pub fn stoplight_groups(&self, ctx: &AppContext) -> Arc<Vec<StoplightGroup>> {
        ctx.store.stoplight_groups()
    }

    /// Stored stoplights that belong to one group.
    pub fn stoplights_for_group(&self, ctx: &AppContext, group_id: u64) -> Vec<Stoplight> {
        ctx.store
            .stoplights()
            .iter()
            .filter(|light| light.group == Some(group_id))
            .cloned()
            .collect()
    }
}

impl View for DestinationFormView {
    fn name(&self) -> &'static str {
        "DestinationFormView"
    }

    /// Reuse groups already in the store; only ask the backend when there are none.
    fn enter<'a>(&'a self, ctx: &'a AppContext) -> BoxFuture<'a, Result<(), ViewError>> {
        Box::pin(async move {
            if !ctx.store.stoplight_groups().is_empty() {
                tracing::debug!("Using stoplight groups from store");
                return Ok(());
            }
            let groups = ctx.api.fetch_stoplight_groups().await?;
            ctx.store.set_stoplight_groups(groups);
            Ok(())
        })
    }
}
