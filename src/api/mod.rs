//! Backend communication subsystem.
//!
//! # Data Flow
//! ```text
//! View
//!     → endpoints.rs (typed request/response bodies)
//!     → client.rs (base address, headers, timeout, request ID)
//!     → reqwest → backend /api/...
//!
//! SimulateForm view
//!     → simulation.rs (WebSocket session) → backend /ws/simulation/
//! ```
//!
//! # Design Decisions
//! - All configuration comes from `ApiConfig` at construction
//! - Every failure is surfaced to the calling view; nothing is retried

pub mod client;
pub mod endpoints;
pub mod error;
pub mod simulation;

pub use client::{ApiClient, X_REQUEST_ID};
pub use endpoints::{MessageResponse, RouteSubmission, StoplightGroupsResponse};
pub use error::{ApiError, ApiResult};
pub use simulation::{SimulationError, SimulationReply, SimulationSession};
