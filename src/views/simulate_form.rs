//! Simulation form: sends a simulation request over the backend WebSocket.

use serde_json::{json, Value};

use crate::api::{SimulationReply, SimulationSession};
use crate::app::AppContext;
use crate::store::StoplightState;
use crate::views::{View, ViewError};

#[derive(Debug, Default, Clone, Copy)]
pub struct SimulateFormView;

impl SimulateFormView {
    /// Payload sent for a form submission: the form fields plus the shared
    /// stoplight groups.
    pub fn build_payload(&self, ctx: &AppContext, form: Value) -> Value {
        let state = ctx.store.snapshot();
        json!({
            "form": form,
            "stoplight_groups": state.stoplight_groups(),
        })
    }

    /// Open a session, send one request, return the reply.
    pub async fn run(&self, ctx: &AppContext, form: Value) -> Result<SimulationReply, ViewError> {
        let payload = self.build_payload(ctx, form);
        let mut session = SimulationSession::connect(&ctx.config.simulation).await?;
        let reply = session.request(&payload).await;
        if let Err(e) = session.close().await {
            tracing::debug!(error = %e, "Simulation session did not close cleanly");
        }
        Ok(reply?)
    }
}

impl View for SimulateFormView {
    fn name(&self) -> &'static str {
        "SimulateFormView"
    }
}
