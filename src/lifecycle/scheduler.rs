//! Periodic refresh of the active node list.
//!
//! # Responsibilities
//! - Run one fallback-controller cycle per tick
//! - Publish each cycle's snapshot and notify subscribers
//! - Keep at most one cycle in flight; skip ticks that arrive while busy
//! - Serve on-demand cycles for callers that need a node before the first tick

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, SystemTime};
use tokio::sync::{broadcast, Mutex as AsyncMutex, OwnedMutexGuard};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::health::evaluator::PoolEvaluator;
use crate::health::state::{ActiveNodeState, NodeStateCell};
use crate::nodes::table::NodeTable;
use crate::nodes::types::{Network, ServiceType};
use crate::observability::metrics;
use crate::pulse::subscribers::Subscribers;
use crate::resilience::backoff::ExhaustionBackoff;
use crate::resilience::fallback::FallbackController;

/// Mutable per-cycle state. Holding its lock is what "a cycle is in flight" means.
#[derive(Debug)]
pub struct CycleState {
    pub controller: FallbackController,
    pub backoff: ExhaustionBackoff,
    pub completed: u64,
}

/// Everything a cycle needs, shared by the timer task, the facade and on-demand callers.
#[derive(Debug)]
pub struct RefreshCore {
    node_type: ServiceType,
    network: Network,
    evaluator: PoolEvaluator,
    table: NodeTable,
    cycle: Arc<AsyncMutex<CycleState>>,
    state: NodeStateCell,
    subscribers: Subscribers,
}

impl RefreshCore {
    pub fn new(
        node_type: ServiceType,
        network: Network,
        evaluator: PoolEvaluator,
        table: NodeTable,
        cycle: CycleState,
        subscribers: Subscribers,
    ) -> Self {
        Self {
            node_type,
            network,
            evaluator,
            table,
            cycle: Arc::new(AsyncMutex::new(cycle)),
            state: NodeStateCell::new(),
            subscribers,
        }
    }

    pub fn state(&self) -> &NodeStateCell {
        &self.state
    }

    /// Claim the cycle slot without waiting. `None` if a cycle is in flight.
    fn try_begin(&self) -> Option<OwnedMutexGuard<CycleState>> {
        self.cycle.clone().try_lock_owned().ok()
    }

    /// Run a cycle, waiting for any in-flight one to finish first.
    pub async fn run_cycle(&self) -> Arc<ActiveNodeState> {
        let mut cycle = self.cycle.lock().await;
        self.execute(&mut cycle).await
    }

    /// Current snapshot if it holds nodes; otherwise one best-effort cycle.
    ///
    /// If another cycle completes while this call waits for the slot, its
    /// result is returned instead of probing again.
    pub async fn ensure_state(&self) -> Arc<ActiveNodeState> {
        let seen = self.state.load();
        if let Some(state) = &seen {
            if !state.is_empty() {
                return state.clone();
            }
        }
        let seen_cycle = seen.map(|s| s.cycle);

        let mut cycle = self.cycle.lock().await;
        if let Some(state) = self.state.load() {
            if Some(state.cycle) != seen_cycle {
                return state;
            }
        }
        tracing::debug!(node_type = %self.node_type, "Running on-demand evaluation");
        self.execute(&mut cycle).await
    }

    async fn execute(&self, cycle: &mut CycleState) -> Arc<ActiveNodeState> {
        let outcome = cycle.controller.run_cycle(&self.evaluator, &self.table).await;
        cycle.completed += 1;

        let exhausted = outcome.nodes.is_empty();
        if let Some(delay) = cycle.backoff.record(exhausted, Instant::now()) {
            tracing::warn!(
                node_type = %self.node_type,
                streak = cycle.backoff.streak(),
                delay_ms = delay.as_millis() as u64,
                "No healthy endpoints, backing off"
            );
        }

        let state = self.state.publish(ActiveNodeState {
            nodes: outcome.nodes,
            source: outcome.source,
            cycle: cycle.completed,
            evaluated_at: SystemTime::now(),
        });
        metrics::record_state(self.node_type, &state);

        if outcome.transition.is_some() {
            self.subscribers.fallback(state.source.node_type, &state.nodes);
        }
        if !state.is_empty() {
            tracing::info!(
                node_type = %self.node_type,
                network = %self.network,
                source = %state.source.node_type,
                fallback = state.is_fallback(),
                nodes = state.nodes.len(),
                cycle = state.cycle,
                "Node list updated"
            );
            self.subscribers.node_update(&state.nodes);
        }
        if let Some(error) = &outcome.error {
            self.subscribers.error(error);
        }
        state
    }
}

struct Running {
    stop_tx: broadcast::Sender<()>,
    handle: JoinHandle<()>,
}

/// Owns the repeating timer driving `RefreshCore`.
pub struct RefreshScheduler {
    core: Arc<RefreshCore>,
    period: Duration,
    running: Mutex<Option<Running>>,
}

impl RefreshScheduler {
    pub fn new(core: Arc<RefreshCore>, period: Duration) -> Self {
        Self {
            core,
            period,
            running: Mutex::new(None),
        }
    }

    /// Arm the timer and run one evaluation immediately.
    ///
    /// The first timed tick fires one period after the call. Starting an
    /// already running scheduler does nothing.
    pub async fn start(&self) {
        {
            let mut running = self.running.lock().unwrap_or_else(PoisonError::into_inner);
            if running.as_ref().is_some_and(|r| !r.handle.is_finished()) {
                tracing::warn!(node_type = %self.core.node_type, "Refresh scheduler already running");
                return;
            }
            let (stop_tx, stop_rx) = broadcast::channel(1);
            let handle = tokio::spawn(run_timer(self.core.clone(), self.period, stop_rx));
            *running = Some(Running { stop_tx, handle });
        }

        tracing::info!(
            node_type = %self.core.node_type,
            network = %self.core.network,
            interval_ms = self.period.as_millis() as u64,
            "Refresh scheduler started"
        );
        self.core.run_cycle().await;
    }

    /// Disarm the timer. An in-flight cycle is allowed to finish and may
    /// still notify once. Returns false if the scheduler was not running.
    pub fn stop(&self) -> bool {
        let running = self.running.lock().unwrap_or_else(PoisonError::into_inner).take();
        match running {
            Some(r) => {
                let _ = r.stop_tx.send(());
                tracing::info!(node_type = %self.core.node_type, "Refresh scheduler stopped");
                true
            }
            None => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|r| !r.handle.is_finished())
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for RefreshScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshScheduler")
            .field("period", &self.period)
            .field("running", &self.is_running())
            .finish()
    }
}

async fn run_timer(core: Arc<RefreshCore>, period: Duration, mut stop: broadcast::Receiver<()>) {
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = stop.recv() => {
                tracing::debug!(node_type = %core.node_type, "Refresh timer exiting");
                break;
            }
            _ = ticker.tick() => {
                let Some(cycle) = core.try_begin() else {
                    tracing::debug!(node_type = %core.node_type, "Previous cycle still running, skipping tick");
                    metrics::record_cycle_skipped("busy");
                    continue;
                };
                if cycle.backoff.should_wait(Instant::now()) {
                    tracing::debug!(node_type = %core.node_type, "Backing off, skipping tick");
                    metrics::record_cycle_skipped("backoff");
                    continue;
                }
                let core = core.clone();
                tokio::spawn(async move {
                    let mut cycle = cycle;
                    core.execute(&mut cycle).await;
                });
            }
        }
    }
}
