//! Route definitions and view sources.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use crate::views::View;

/// Shared handle to a mounted view.
pub type ViewHandle = Arc<dyn View>;

/// Future produced by a lazy view loader.
pub type LoadFuture = BoxFuture<'static, Result<ViewHandle, LoadError>>;

/// Function that produces a view on first use.
pub type ViewLoader = Arc<dyn Fn() -> LoadFuture + Send + Sync>;

/// A lazy view could not be produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct LoadError(String);

impl LoadError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// How a route obtains its view.
#[derive(Clone)]
pub enum ViewSource {
    /// Constructed up front.
    Eager(ViewHandle),
    /// Loaded on first navigation and cached after the first success.
    Lazy(ViewLoader),
}

impl fmt::Debug for ViewSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewSource::Eager(view) => f.debug_tuple("Eager").field(&view.name()).finish(),
            ViewSource::Lazy(_) => f.write_str("Lazy(..)"),
        }
    }
}

/// One entry of the route table.
#[derive(Debug, Clone)]
pub struct RouteDef {
    /// URL path, e.g. `/route`.
    pub path: String,
    /// Unique name used for programmatic navigation.
    pub name: String,
    pub component: ViewSource,
}

impl RouteDef {
    /// Route whose view exists from the start.
    pub fn eager<V>(path: impl Into<String>, name: impl Into<String>, view: V) -> Self
    where
        V: View + 'static,
    {
        Self {
            path: path.into(),
            name: name.into(),
            component: ViewSource::Eager(Arc::new(view)),
        }
    }

    /// Route whose view is produced by `loader` on first navigation.
    pub fn lazy<F, Fut>(path: impl Into<String>, name: impl Into<String>, loader: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ViewHandle, LoadError>> + Send + 'static,
    {
        Self {
            path: path.into(),
            name: name.into(),
            component: ViewSource::Lazy(Arc::new(move || loader().boxed())),
        }
    }

    pub fn is_lazy(&self) -> bool {
        matches!(self.component, ViewSource::Lazy(_))
    }
}
