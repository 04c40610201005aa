//! Shared UI state for cross-view data.
//!
//! # Data Flow
//! ```text
//! GpxForm view ── set_stoplight_groups ──→ StoplightStore ──→ snapshot() ── DestinationForm view
//!                                               │
//!                                               └──→ subscribe() (revision feed)
//! ```
//!
//! # Design Decisions
//! - Explicit handle passed through the application context, not a global
//! - Each write swaps in a whole new state (last write wins, no merging)
//! - Readers get an immutable snapshot; they never block writers
//! - A setter only replaces its own field, even under concurrent writes

use std::sync::Arc;

use arc_swap::ArcSwap;
use tokio::sync::watch;

use crate::model::{Stoplight, StoplightGroup};
use crate::observability::metrics;

/// Immutable view of the store at one point in time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreState {
    stoplight_groups: Arc<Vec<StoplightGroup>>,
    stoplights: Arc<Vec<Stoplight>>,
    revision: u64,
}

impl StoreState {
    pub fn stoplight_groups(&self) -> &[StoplightGroup] {
        &self.stoplight_groups
    }

    pub fn stoplights(&self) -> &[Stoplight] {
        &self.stoplights
    }

    /// Number of writes applied since the store was created.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_empty(&self) -> bool {
        self.stoplight_groups.is_empty() && self.stoplights.is_empty()
    }
}

/// The operations views use to share stoplight data.
pub trait StoplightState: Send + Sync {
    /// Replace the stored stoplight groups.
    fn set_stoplight_groups(&self, groups: Vec<StoplightGroup>);

    /// Replace the stored stoplights.
    fn set_stoplights(&self, stoplights: Vec<Stoplight>);

    /// Reset both fields to empty.
    fn clear(&self);

    /// The most recent completed state.
    fn snapshot(&self) -> Arc<StoreState>;
}

/// Cheaply cloneable handle to the shared stoplight state.
#[derive(Debug, Clone)]
pub struct StoplightStore {
    state: Arc<ArcSwap<StoreState>>,
    revisions: Arc<watch::Sender<u64>>,
}

impl Default for StoplightStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StoplightStore {
    /// An empty store.
    pub fn new() -> Self {
        let (revisions, _) = watch::channel(0);
        Self {
            state: Arc::new(ArcSwap::from_pointee(StoreState::default())),
            revisions: Arc::new(revisions),
        }
    }

    /// Feed of store revisions; changes after every write.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revisions.subscribe()
    }

    pub fn stoplight_groups(&self) -> Arc<Vec<StoplightGroup>> {
        Arc::clone(&self.state.load().stoplight_groups)
    }

    pub fn stoplights(&self) -> Arc<Vec<Stoplight>> {
        Arc::clone(&self.state.load().stoplights)
    }

    /// Apply one write and return the state it committed.
    fn update<F>(&self, field: &'static str, apply: F) -> Arc<StoreState>
    where
        F: Fn(&StoreState) -> StoreState,
    {
        let mut committed = Arc::new(StoreState::default());
        self.state.rcu(|current| {
            let mut next = apply(current);
            next.revision = current.revision + 1;
            // The last attempt is the one that was stored.
            committed = Arc::new(next);
            Arc::clone(&committed)
        });
        let revision = committed.revision;
        metrics::record_store_items("stoplight_groups", committed.stoplight_groups.len());
        metrics::record_store_items("stoplights", committed.stoplights.len());
        tracing::debug!(
            field,
            revision,
            stoplight_groups = committed.stoplight_groups.len(),
            stoplights = committed.stoplights.len(),
            "Store updated"
        );
        // Concurrent writers may finish out of order; never move the feed backwards.
        self.revisions.send_if_modified(|seen| {
            if revision > *seen {
                *seen = revision;
                true
            } else {
                false
            }
        });
        committed
    }
}

impl StoplightState for StoplightStore {
    fn set_stoplight_groups(&self, groups: Vec<StoplightGroup>) {
        let groups = Arc::new(groups);
        self.update("stoplight_groups", |current| StoreState {
            stoplight_groups: Arc::clone(&groups),
            stoplights: Arc::clone(&current.stoplights),
            revision: current.revision,
        });
    }

    fn set_stoplights(&self, stoplights: Vec<Stoplight>) {
        let stoplights = Arc::new(stoplights);
        self.update("stoplights", |current| StoreState {
            stoplight_groups: Arc::clone(&current.stoplight_groups),
            stoplights: Arc::clone(&stoplights),
            revision: current.revision,
        });
    }

    fn clear(&self) {
        self.update("all", |current| StoreState {
            revision: current.revision,
            ..StoreState::default()
        });
    }

    fn snapshot(&self) -> Arc<StoreState> {
        self.state.load_full()
    }
}
