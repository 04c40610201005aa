//! Stoplight form client library.
//!
//! Client side of the stoplight route application: a route table with
//! lazily loaded views, a shared stoplight store, and the HTTP and
//! WebSocket adapters for the backend.

pub mod api;
pub mod app;
pub mod config;
pub mod gpx;
pub mod model;
pub mod observability;
pub mod routing;
pub mod store;
pub mod views;

pub use api::ApiClient;
pub use app::{App, AppContext, AppError};
pub use config::schema::AppConfig;
pub use routing::Router;
pub use store::{StoplightState, StoplightStore};
