//! Published node state.
//!
//! # States
//! - Unset: no cycle has completed yet
//! - Published: snapshot of the latest cycle, possibly empty
//!
//! # Design Decisions
//! - Each cycle builds a fresh snapshot and swaps it in whole
//! - Readers load an `Arc` and never observe a partial update
//! - Only the scheduler writes; everything else reads

use arc_swap::ArcSwapOption;
use serde::Serialize;
use std::sync::Arc;
use std::time::SystemTime;

use crate::nodes::types::{Endpoint, PoolTier, ServiceType};

/// Pool a snapshot was drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PoolSource {
    pub node_type: ServiceType,
    pub tier: PoolTier,
    /// True when this pool is the fallback target rather than the primary.
    pub fallback: bool,
}

/// Current best-known healthy endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ActiveNodeState {
    pub nodes: Vec<Endpoint>,
    pub source: PoolSource,
    /// Monotonic cycle counter, starting at 1.
    pub cycle: u64,
    #[serde(skip)]
    pub evaluated_at: SystemTime,
}

impl ActiveNodeState {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn is_fallback(&self) -> bool {
        self.source.fallback
    }

    /// Highest-priority healthy endpoint.
    pub fn first(&self) -> Option<&Endpoint> {
        self.nodes.first()
    }
}

/// Atomically swappable holder for the active state.
#[derive(Debug, Default)]
pub struct NodeStateCell {
    inner: ArcSwapOption<ActiveNodeState>,
}

impl NodeStateCell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest snapshot, `None` before the first cycle.
    pub fn load(&self) -> Option<Arc<ActiveNodeState>> {
        self.inner.load_full()
    }

    /// Replace the snapshot.
    pub fn publish(&self, state: ActiveNodeState) -> Arc<ActiveNodeState> {
        let state = Arc::new(state);
        self.inner.store(Some(state.clone()));
        state
    }

    /// Current node list, empty when unset.
    pub fn nodes(&self) -> Vec<Endpoint> {
        match &*self.inner.load() {
            Some(state) => state.nodes.clone(),
            None => Vec::new(),
        }
    }
}
