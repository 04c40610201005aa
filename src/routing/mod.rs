//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Navigation request (path, or route name + query)
//!     → matcher.rs (parse location, normalize path)
//!     → router.rs (route lookup, state machine, history)
//!     → route.rs (eager view, or lazy loader + cache)
//!     → Return: ActiveRoute or NavigationError
//!
//! Route Compilation (at startup):
//!     RouteDef[]
//!     → Validate (unique paths, unique names, absolute paths)
//!     → Index by normalized path and by name
//!     → Freeze as immutable route table inside Router
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Deterministic: same path always resolves to the same route
//! - History-API style addressing (paths, not fragments)

pub mod error;
pub mod history;
pub mod matcher;
pub mod route;
pub mod router;

pub use error::{NavigationError, RouteDefError, RouteTableError};
pub use history::History;
pub use matcher::Location;
pub use route::{LoadError, RouteDef, ViewHandle, ViewLoader, ViewSource};
pub use router::{
    ActiveRoute, NavigationState, NavigationTarget, RouteInfo, RouteMatch, Router, RouterBuilder,
};
