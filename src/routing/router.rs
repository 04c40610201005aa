//! Route lookup and navigation.
//!
//! # Responsibilities
//! - Store the validated route table
//! - Look up the route for a path, or report an explicit no-match
//! - Drive the navigation state machine and the history
//! - Load lazy views on first use and cache them
//!
//! # State Transitions
//! ```text
//! Idle | Active → Resolving(location): navigation requested
//! Resolving → Active(route): route matched and view available
//! Resolving → Idle: no match or lazy load failed (error returned)
//! ```
//!
//! # Design Decisions
//! - Route table is immutable after construction
//! - O(1) lookup via HashMap keyed by normalized, lowercased path
//! - Explicit NoMatch rather than silent default, unless a fallback is registered
//! - The previously active route stays displayed while a navigation resolves
//! - Only the newest navigation may commit; older ones report Superseded
//! - The router lock is never held across an await

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use tokio::sync::{watch, OnceCell};

use crate::observability::metrics;
use crate::routing::error::{NavigationError, RouteDefError, RouteTableError};
use crate::routing::history::History;
use crate::routing::matcher::{normalize_path, route_key, Location};
use crate::routing::route::{RouteDef, ViewHandle, ViewSource};

/// Where a navigation should go.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationTarget {
    /// A path, optionally with query and fragment.
    Path(String),
    /// An already parsed location.
    Location(Location),
    /// A route by name, with query parameters.
    Named {
        name: String,
        query: BTreeMap<String, String>,
    },
}

impl NavigationTarget {
    /// Navigate by route name.
    pub fn named(name: impl Into<String>) -> Self {
        NavigationTarget::Named {
            name: name.into(),
            query: BTreeMap::new(),
        }
    }

    /// Add a query parameter (named targets only; others are returned unchanged).
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let NavigationTarget::Named { query, .. } = &mut self {
            query.insert(key.into(), value.into());
        }
        self
    }
}

impl From<&str> for NavigationTarget {
    fn from(path: &str) -> Self {
        NavigationTarget::Path(path.to_string())
    }
}

impl From<String> for NavigationTarget {
    fn from(path: String) -> Self {
        NavigationTarget::Path(path)
    }
}

impl From<Location> for NavigationTarget {
    fn from(location: Location) -> Self {
        NavigationTarget::Location(location)
    }
}

/// A route that has been resolved and has its view available.
#[derive(Debug, Clone)]
pub struct ActiveRoute {
    pub name: String,
    /// Path as declared in the route table.
    pub route_path: String,
    /// The location that was navigated to.
    pub location: Location,
    pub view: ViewHandle,
}

impl ActiveRoute {
    pub fn view_name(&self) -> &'static str {
        self.view.name()
    }
}

/// Navigation state machine.
#[derive(Debug, Clone, Default)]
pub enum NavigationState {
    #[default]
    Idle,
    Resolving(Location),
    Active(ActiveRoute),
}

/// Result of a pure lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub name: String,
    pub route_path: String,
    /// The match came from the catch-all route.
    pub fallback: bool,
}

/// Summary of one route table entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteInfo {
    pub name: String,
    pub path: String,
    pub lazy: bool,
    pub fallback: bool,
}

#[derive(Debug)]
struct RouteRecord {
    path: String,
    name: String,
    source: ViewSource,
    cache: OnceCell<ViewHandle>,
}

#[derive(Debug, Default)]
struct RouterInner {
    history: History,
    current: Option<ActiveRoute>,
    latest: u64,
}

#[derive(Debug, Clone, Copy)]
enum HistoryAction {
    Push,
    Replace,
    Traverse(usize),
}

/// Collects route definitions and validates them into a `Router`.
#[derive(Debug, Default)]
pub struct RouterBuilder {
    routes: Vec<RouteDef>,
    fallback: Option<RouteDef>,
    base: Option<String>,
}

impl RouterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, def: RouteDef) -> Self {
        self.routes.push(def);
        self
    }

    pub fn routes(mut self, defs: impl IntoIterator<Item = RouteDef>) -> Self {
        self.routes.extend(defs);
        self
    }

    /// Catch-all route used when nothing else matches. Its path is only
    /// informational, and its name reserves the slot but cannot be
    /// navigated to with `NavigationTarget::named`.
    pub fn fallback(mut self, def: RouteDef) -> Self {
        self.fallback = Some(def);
        self
    }

    /// Public base path the application is served under.
    pub fn base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    /// Validate the table; every problem is reported, not just the first.
    pub fn build(self) -> Result<Router, RouteTableError> {
        let mut errors = Vec::new();
        let mut by_key: HashMap<String, usize> = HashMap::new();
        let mut by_name: HashMap<String, usize> = HashMap::new();
        let mut names: HashSet<String> = HashSet::new();
        let mut records = Vec::with_capacity(self.routes.len() + 1);

        for def in self.routes {
            if def.name.trim().is_empty() {
                errors.push(RouteDefError::EmptyName { path: def.path.clone() });
            } else if !names.insert(def.name.clone()) {
                errors.push(RouteDefError::DuplicateName { name: def.name.clone() });
            }

            if !def.path.starts_with('/') {
                errors.push(RouteDefError::InvalidPath {
                    name: def.name.clone(),
                    path: def.path.clone(),
                });
                continue;
            }

            let key = route_key(&def.path);
            if let Some(&first) = by_key.get(&key) {
                let first: &RouteRecord = &records[first];
                errors.push(RouteDefError::DuplicatePath {
                    path: normalize_path(&def.path),
                    first: first.name.clone(),
                    second: def.name.clone(),
                });
                continue;
            }

            let index = records.len();
            by_key.insert(key, index);
            by_name.entry(def.name.clone()).or_insert(index);
            records.push(RouteRecord {
                path: normalize_path(&def.path),
                name: def.name,
                source: def.component,
                cache: OnceCell::new(),
            });
        }

        let fallback = match self.fallback {
            Some(def) => {
                if def.name.trim().is_empty() {
                    errors.push(RouteDefError::EmptyName { path: def.path.clone() });
                } else if !names.insert(def.name.clone()) {
                    errors.push(RouteDefError::DuplicateName { name: def.name.clone() });
                }
                records.push(RouteRecord {
                    path: def.path,
                    name: def.name,
                    source: def.component,
                    cache: OnceCell::new(),
                });
                Some(records.len() - 1)
            }
            None => None,
        };

        if !errors.is_empty() {
            return Err(RouteTableError { errors });
        }

        let (state, _) = watch::channel(NavigationState::Idle);
        let base = self.base.unwrap_or_else(|| "/".to_string());

        tracing::debug!(routes = by_key.len(), fallback = fallback.is_some(), base = %base, "Route table built");

        Ok(Router {
            routes: records,
            by_key,
            by_name,
            fallback,
            base,
            state,
            inner: Mutex::new(RouterInner::default()),
        })
    }
}

/// Maps locations to views and tracks navigation.
#[derive(Debug)]
pub struct Router {
    routes: Vec<RouteRecord>,
    by_key: HashMap<String, usize>,
    by_name: HashMap<String, usize>,
    fallback: Option<usize>,
    base: String,
    state: watch::Sender<NavigationState>,
    inner: Mutex<RouterInner>,
}

impl Router {
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    /// Route table in declaration order, fallback last.
    pub fn routes(&self) -> Vec<RouteInfo> {
        self.routes
            .iter()
            .enumerate()
            .map(|(index, record)| RouteInfo {
                name: record.name.clone(),
                path: record.path.clone(),
                lazy: matches!(record.source, ViewSource::Lazy(_)),
                fallback: Some(index) == self.fallback,
            })
            .collect()
    }

    /// Pure lookup: which route would a path resolve to.
    pub fn resolve(&self, path: &str) -> Result<RouteMatch, NavigationError> {
        let location = Location::parse(path)?;
        let index = self.match_index(&location)?;
        let record = &self.routes[index];
        Ok(RouteMatch {
            name: record.name.clone(),
            route_path: record.path.clone(),
            fallback: Some(index) == self.fallback,
        })
    }

    /// Navigate and push a history entry.
    pub async fn navigate(
        &self,
        target: impl Into<NavigationTarget>,
    ) -> Result<ActiveRoute, NavigationError> {
        let location = self.location_for(target.into())?;
        self.run(location, HistoryAction::Push).await
    }

    /// Navigate and overwrite the current history entry.
    pub async fn replace(
        &self,
        target: impl Into<NavigationTarget>,
    ) -> Result<ActiveRoute, NavigationError> {
        let location = self.location_for(target.into())?;
        self.run(location, HistoryAction::Replace).await
    }

    pub async fn back(&self) -> Result<ActiveRoute, NavigationError> {
        self.go(-1).await
    }

    pub async fn forward(&self) -> Result<ActiveRoute, NavigationError> {
        self.go(1).await
    }

    /// Move `delta` entries through the history. The cursor only moves on success.
    pub async fn go(&self, delta: isize) -> Result<ActiveRoute, NavigationError> {
        let (index, location) = {
            let inner = self.lock();
            inner
                .history
                .peek(delta)
                .map(|(index, location)| (index, location.clone()))
                .ok_or(NavigationError::NoHistory { delta })?
        };
        self.run(location, HistoryAction::Traverse(index)).await
    }

    /// The route currently on display.
    pub fn current(&self) -> Option<ActiveRoute> {
        self.lock().current.clone()
    }

    pub fn state(&self) -> NavigationState {
        self.state.borrow().clone()
    }

    /// Feed of state machine transitions.
    pub fn subscribe(&self) -> watch::Receiver<NavigationState> {
        self.state.subscribe()
    }

    pub fn history(&self) -> History {
        self.lock().history.clone()
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Served URL for a location under the base path.
    pub fn href(&self, location: &Location) -> String {
        format!("{}{}", self.base.trim_end_matches('/'), location.full_path())
    }

    /// Router location for a served URL, if it lies under the base path.
    pub fn strip_base(&self, href: &str) -> Option<Location> {
        let base = self.base.trim_end_matches('/');
        let rest = href.strip_prefix(base)?;
        if rest.is_empty() {
            return Location::parse("/").ok();
        }
        if !rest.starts_with(['/', '?', '#']) {
            return None;
        }
        let rest = if rest.starts_with('/') {
            rest.to_string()
        } else {
            format!("/{}", rest)
        };
        Location::parse(&rest).ok()
    }

    fn lock(&self) -> MutexGuard<'_, RouterInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn location_for(&self, target: NavigationTarget) -> Result<Location, NavigationError> {
        match target {
            NavigationTarget::Path(path) => Location::parse(&path),
            NavigationTarget::Location(location) => Ok(location),
            NavigationTarget::Named { name, query } => {
                let index = self
                    .by_name
                    .get(&name)
                    .copied()
                    .ok_or(NavigationError::UnknownRouteName { name })?;
                let mut location = Location::new(&self.routes[index].path);
                for (key, value) in query {
                    location = location.with_query(key, value);
                }
                Ok(location)
            }
        }
    }

    fn match_index(&self, location: &Location) -> Result<usize, NavigationError> {
        self.by_key
            .get(&location.route_key())
            .copied()
            .or(self.fallback)
            .ok_or_else(|| NavigationError::NoMatch {
                path: location.path().to_string(),
            })
    }

    async fn run(
        &self,
        location: Location,
        action: HistoryAction,
    ) -> Result<ActiveRoute, NavigationError> {
        let ticket = {
            let mut inner = self.lock();
            inner.latest += 1;
            self.state
                .send_replace(NavigationState::Resolving(location.clone()));
            inner.latest
        };

        tracing::debug!(location = %location, "Resolving navigation");

        let outcome = self.activate(&location).await;

        let mut inner = self.lock();
        if inner.latest != ticket {
            let err = NavigationError::Superseded {
                path: location.path().to_string(),
            };
            tracing::debug!(location = %location, "Navigation superseded");
            metrics::record_navigation("none", err.outcome());
            return Err(err);
        }

        match outcome {
            Ok(active) => {
                match action {
                    HistoryAction::Push => inner.history.push(location),
                    HistoryAction::Replace => inner.history.replace(location),
                    HistoryAction::Traverse(index) => inner.history.go_to(index),
                }
                inner.current = Some(active.clone());
                self.state.send_replace(NavigationState::Active(active.clone()));
                drop(inner);

                tracing::info!(
                    route = %active.name,
                    view = active.view_name(),
                    location = %active.location,
                    "Navigation complete"
                );
                metrics::record_navigation(&active.name, "ok");
                Ok(active)
            }
            Err(err) => {
                self.state.send_replace(NavigationState::Idle);
                drop(inner);

                tracing::warn!(location = %location, error = %err, "Navigation failed");
                metrics::record_navigation("none", err.outcome());
                Err(err)
            }
        }
    }

    async fn activate(&self, location: &Location) -> Result<ActiveRoute, NavigationError> {
        let index = self.match_index(location)?;
        let record = &self.routes[index];
        let view = self.load(record).await?;
        Ok(ActiveRoute {
            name: record.name.clone(),
            route_path: record.path.clone(),
            location: location.clone(),
            view,
        })
    }

    async fn load(&self, record: &RouteRecord) -> Result<ViewHandle, NavigationError> {
        let loader = match &record.source {
            ViewSource::Eager(view) => return Ok(view.clone()),
            ViewSource::Lazy(loader) => loader,
        };

        let view = record
            .cache
            .get_or_try_init(|| async {
                let start = Instant::now();
                let result = loader().await;
                metrics::record_view_load(&record.name, result.is_ok());
                match &result {
                    Ok(view) => tracing::info!(
                        route = %record.name,
                        view = view.name(),
                        elapsed_ms = start.elapsed().as_millis() as u64,
                        "Lazy view loaded"
                    ),
                    Err(e) => tracing::warn!(
                        route = %record.name,
                        error = %e,
                        "Lazy view failed to load"
                    ),
                }
                result
            })
            .await
            .map_err(|source| NavigationError::LoadFailed {
                route: record.name.clone(),
                source,
            })?;

        Ok(view.clone())
    }
}
