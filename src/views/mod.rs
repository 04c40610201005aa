//! Page-level views of the form application.
//!
//! # Data Flow
//! ```text
//! Router resolves a view
//!     → App calls View::enter with the AppContext
//!     → the view reads/writes the StoplightStore and/or calls the ApiClient
//! ```
//!
//! # Design Decisions
//! - Views are stateless controllers; shared data lives in the store
//! - Form-specific operations are inherent methods on each view
//! - Every failure is returned to the caller as `ViewError`

use std::fmt;

use futures_util::future::BoxFuture;
use thiserror::Error;

use crate::api::{ApiError, SimulationError};
use crate::app::AppContext;
use crate::gpx::GpxError;

pub mod destination_form;
pub mod gpx_form;
pub mod landing;
pub mod not_found;
pub mod simulate_form;

pub use destination_form::DestinationFormView;
pub use gpx_form::GpxFormView;
pub use landing::LandingPageView;
pub use not_found::NotFoundView;
pub use simulate_form::SimulateFormView;

/// A page the router can mount.
pub trait View: Send + Sync + fmt::Debug {
    /// Stable view identifier.
    fn name(&self) -> &'static str;

    /// Called by the app after the router activates this view.
    fn enter<'a>(&'a self, ctx: &'a AppContext) -> BoxFuture<'a, Result<(), ViewError>> {
        let _ = ctx;
        Box::pin(async { Ok(()) })
    }
}

/// Errors surfaced by view operations.
#[derive(Debug, Error)]
pub enum ViewError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Simulation(#[from] SimulationError),

    #[error("could not read GPX file: {0}")]
    Gpx(#[from] GpxError),

    /// Input rejected before any request was made.
    #[error("{0}")]
    InvalidInput(String),
}
