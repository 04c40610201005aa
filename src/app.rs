//! Application assembly: route table, shared context, navigation entry point.
//!
//! # Responsibilities
//! - Declare the route table of the form application
//! - Own the shared context handed to every view (config, API client, store)
//! - Run a view's entry hook after the router activates it
//!
//! # Data Flow
//! ```text
//! App::navigate(target)
//!     → Router::navigate (match, lazy load, history)
//!     → View::enter(&AppContext)
//!     → Return: ActiveRoute or AppError
//! ```

use std::sync::Arc;

use thiserror::Error;

use crate::api::{ApiClient, ApiError};
use crate::config::{AppConfig, BuildConfig, ConfigError};
use crate::routing::{
    ActiveRoute, NavigationError, NavigationTarget, RouteDef, RouteTableError, Router, ViewHandle,
};
use crate::store::StoplightStore;
use crate::views::{
    DestinationFormView, GpxFormView, LandingPageView, NotFoundView, SimulateFormView, ViewError,
};

pub const LANDING_PAGE: &str = "LandingPage";
pub const GPX_FORM: &str = "GpxForm";
pub const DESTINATION_FORM: &str = "DestinationForm";
pub const SIMULATE_FORM: &str = "SimulateForm";
pub const NOT_FOUND: &str = "NotFound";

/// Top-level error of the application.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Routes(#[from] RouteTableError),

    #[error(transparent)]
    Navigation(#[from] NavigationError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("view failed: {0}")]
    View(#[from] ViewError),
}

/// State shared by every view.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub config: Arc<AppConfig>,
    pub api: ApiClient,
    pub store: StoplightStore,
}

impl AppContext {
    pub fn new(config: AppConfig) -> Result<Self, ApiError> {
        let api = ApiClient::new(&config.api)?;
        Ok(Self {
            config: Arc::new(config),
            api,
            store: StoplightStore::new(),
        })
    }
}

/// The four pages of the application, in declaration order.
pub fn route_table() -> Vec<RouteDef> {
    vec![
        RouteDef::eager("/", LANDING_PAGE, LandingPageView),
        RouteDef::lazy("/route", GPX_FORM, || async {
            Ok(Arc::new(GpxFormView) as ViewHandle)
        }),
        RouteDef::lazy("/destination", DESTINATION_FORM, || async {
            Ok(Arc::new(DestinationFormView) as ViewHandle)
        }),
        RouteDef::lazy("/simulate", SIMULATE_FORM, || async {
            Ok(Arc::new(SimulateFormView) as ViewHandle)
        }),
    ]
}

/// Router over `route_table()` with the NotFound catch-all, served under
/// the configured base path. NotFound is reached by unmatched paths only,
/// never by name.
pub fn build_router(build: &BuildConfig) -> Result<Router, RouteTableError> {
    Router::builder()
        .routes(route_table())
        .fallback(RouteDef::eager("*", NOT_FOUND, NotFoundView))
        .base(build.base_path())
        .build()
}

/// Router plus context.
#[derive(Debug)]
pub struct App {
    ctx: AppContext,
    router: Router,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self, AppError> {
        let router = build_router(&config.build)?;
        let ctx = AppContext::new(config)?;

        tracing::info!(
            base_address = %ctx.api.base_address(),
            base_path = router.base(),
            routes = router.routes().len(),
            "Application initialized"
        );

        Ok(Self { ctx, router })
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Navigate, then run the entry hook of the activated view.
    ///
    /// The route is committed before the hook runs. An `AppError::View` means
    /// the new route is current and in history, but its data did not load.
    pub async fn navigate(
        &self,
        target: impl Into<NavigationTarget>,
    ) -> Result<ActiveRoute, AppError> {
        let active = self.router.navigate(target).await?;
        self.enter(active).await
    }

    pub async fn back(&self) -> Result<ActiveRoute, AppError> {
        let active = self.router.back().await?;
        self.enter(active).await
    }

    pub async fn forward(&self) -> Result<ActiveRoute, AppError> {
        let active = self.router.forward().await?;
        self.enter(active).await
    }

    async fn enter(&self, active: ActiveRoute) -> Result<ActiveRoute, AppError> {
        if let Err(e) = active.view.enter(&self.ctx).await {
            tracing::warn!(route = %active.name, error = %e, "View entry failed");
            return Err(e.into());
        }
        Ok(active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DeploymentEnv;

    fn app() -> App {
        App::new(AppConfig::default()).unwrap()
    }

    #[test]
    fn test_route_table_loading() {
        let table = route_table();
        let lazy: Vec<_> = table.iter().map(|def| (def.path.as_str(), def.is_lazy())).collect();
        assert_eq!(
            lazy,
            vec![
                ("/", false),
                ("/route", true),
                ("/destination", true),
                ("/simulate", true),
            ]
        );
    }

    #[test]
    fn test_registered_paths_resolve() {
        let router = build_router(&BuildConfig::default()).unwrap();
        for (path, name) in [
            ("/", LANDING_PAGE),
            ("/route", GPX_FORM),
            ("/destination", DESTINATION_FORM),
            ("/simulate", SIMULATE_FORM),
        ] {
            let matched = router.resolve(path).unwrap();
            assert_eq!(matched.name, name);
            assert!(!matched.fallback);
        }
    }

    #[test]
    fn test_unknown_path_falls_back() {
        let router = build_router(&BuildConfig::default()).unwrap();
        let matched = router.resolve("/does-not-exist").unwrap();
        assert_eq!(matched.name, NOT_FOUND);
        assert!(matched.fallback);
    }

    #[test]
    fn test_fallback_listed_last() {
        let routes = build_router(&BuildConfig::default()).unwrap().routes();
        let last = routes.last().unwrap();
        assert_eq!(last.name, NOT_FOUND);
        assert_eq!(last.path, "*");
        assert!(last.fallback);
        assert!(!last.lazy);
    }

    #[test]
    fn test_production_base_path() {
        let build = BuildConfig {
            deployment: DeploymentEnv::Production,
            ..BuildConfig::default()
        };
        let router = build_router(&build).unwrap();
        assert_eq!(router.base(), "/static/");
    }

    #[tokio::test]
    async fn test_navigate_mounts_view() {
        let app = app();
        let active = app.navigate("/").await.unwrap();
        assert_eq!(active.view_name(), "LandingPageView");

        let active = app.navigate(NavigationTarget::named(SIMULATE_FORM)).await.unwrap();
        assert_eq!(active.view_name(), "SimulateFormView");

        let active = app.back().await.unwrap();
        assert_eq!(active.name, LANDING_PAGE);
        let active = app.forward().await.unwrap();
        assert_eq!(active.name, SIMULATE_FORM);
    }
}
