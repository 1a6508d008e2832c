//! Public entry point.
//!
//! # Data Flow
//! ```text
//! NodePulse::builder(config)
//!     → hooks + optional HTTP client / node table
//!     → build(): validate config, assemble prober → evaluator → controller
//!     → RefreshScheduler (timer) + RefreshCore (cycle, published state)
//!
//! get_node()
//!     → published state has nodes? return first
//!     → otherwise one on-demand cycle (or wait for the in-flight one)
//!     → first node or NoHealthyEndpoints
//! ```

pub mod subscribers;

use std::sync::Arc;
use std::time::Duration;

use crate::config::{validate_config, ConfigError, PulseConfig};
use crate::error::{PulseError, PulseResult};
use crate::health::evaluator::PoolEvaluator;
use crate::health::probe::HealthProber;
use crate::health::state::ActiveNodeState;
use crate::http::{HttpProbe, ReqwestProbe};
use crate::lifecycle::scheduler::{CycleState, RefreshCore, RefreshScheduler};
use crate::nodes::table::NodeTable;
use crate::nodes::types::{Endpoint, ServiceType};
use crate::resilience::backoff::ExhaustionBackoff;
use crate::resilience::fallback::{FallbackController, FallbackPolicy};

pub use subscribers::Subscribers;

/// Builder for [`NodePulse`].
pub struct NodePulseBuilder {
    config: PulseConfig,
    subscribers: Subscribers,
    client: Option<Arc<dyn HttpProbe>>,
    table: Option<NodeTable>,
}

impl NodePulseBuilder {
    /// Called with the node list after every cycle that found nodes.
    pub fn on_node_update<F>(mut self, hook: F) -> Self
    where
        F: Fn(&[Endpoint]) + Send + Sync + 'static,
    {
        self.subscribers.on_node_update = Some(Box::new(hook));
        self
    }

    /// Called when a cycle ends with no healthy endpoints.
    pub fn on_error<F>(mut self, hook: F) -> Self
    where
        F: Fn(&PulseError) + Send + Sync + 'static,
    {
        self.subscribers.on_error = Some(Box::new(hook));
        self
    }

    /// Called once per switch between the primary and fallback pools, with
    /// the service type that became active.
    pub fn on_fallback<F>(mut self, hook: F) -> Self
    where
        F: Fn(ServiceType, &[Endpoint]) + Send + Sync + 'static,
    {
        self.subscribers.on_fallback = Some(Box::new(hook));
        self
    }

    /// Replace the HTTP transport used for probes.
    pub fn http_client(mut self, client: Arc<dyn HttpProbe>) -> Self {
        self.client = Some(client);
        self
    }

    /// Replace the node table. Config `[[pools]]` overrides are ignored when set.
    pub fn node_table(mut self, table: NodeTable) -> Self {
        self.table = Some(table);
        self
    }

    pub fn build(self) -> PulseResult<NodePulse> {
        let config = self.config;
        validate_config(&config).map_err(|errors| PulseError::Config(ConfigError::Validation(errors)))?;

        let client = self.client.unwrap_or_else(|| Arc::new(ReqwestProbe::new()));
        let table = self.table.unwrap_or_else(|| NodeTable::from_config(&config.pools));

        let prober = HealthProber::new(client, &config.probe);
        let evaluator = PoolEvaluator::new(prober, config.probe.max_concurrency);
        let policy = FallbackPolicy::from_config(&config.fallback);
        let controller = FallbackController::new(config.node_type, config.network, &policy, config.node_count);

        if table.primary(config.node_type, config.network).is_empty() {
            tracing::warn!(
                node_type = %config.node_type,
                network = %config.network,
                "Primary pool has no candidates"
            );
        }

        let core = Arc::new(RefreshCore::new(
            config.node_type,
            config.network,
            evaluator,
            table,
            CycleState {
                controller,
                backoff: ExhaustionBackoff::new(config.backoff.clone()),
                completed: 0,
            },
            self.subscribers,
        ));
        let scheduler = RefreshScheduler::new(core.clone(), Duration::from_millis(config.update_interval_ms));

        Ok(NodePulse {
            inner: Arc::new(Inner {
                config,
                core,
                scheduler,
            }),
        })
    }
}

#[derive(Debug)]
struct Inner {
    config: PulseConfig,
    core: Arc<RefreshCore>,
    scheduler: RefreshScheduler,
}

/// Keeps a validated list of healthy endpoints for one service type.
///
/// Cheap to clone; clones share state and the scheduler.
#[derive(Debug, Clone)]
pub struct NodePulse {
    inner: Arc<Inner>,
}

impl NodePulse {
    pub fn builder(config: PulseConfig) -> NodePulseBuilder {
        NodePulseBuilder {
            config,
            subscribers: Subscribers::default(),
            client: None,
            table: None,
        }
    }

    /// Build with default hooks, transport and node table.
    pub fn new(config: PulseConfig) -> PulseResult<Self> {
        Self::builder(config).build()
    }

    /// Evaluate once now, then refresh on every interval.
    pub async fn start(&self) {
        self.inner.scheduler.start().await;
    }

    /// Stop periodic refresh. See [`RefreshScheduler::stop`].
    pub fn stop(&self) -> bool {
        self.inner.scheduler.stop()
    }

    pub fn is_running(&self) -> bool {
        self.inner.scheduler.is_running()
    }

    /// Highest-priority healthy endpoint.
    ///
    /// Runs an evaluation first when nothing usable has been published yet.
    pub async fn get_node(&self) -> PulseResult<Endpoint> {
        let state = self.inner.core.ensure_state().await;
        state.first().cloned().ok_or(PulseError::NoHealthyEndpoints {
            node_type: self.inner.config.node_type,
            network: self.inner.config.network,
        })
    }

    /// Current node list; empty before the first cycle or when exhausted.
    pub fn get_nodes(&self) -> Vec<Endpoint> {
        self.inner.core.state().nodes()
    }

    /// Full published snapshot.
    pub fn state(&self) -> Option<Arc<ActiveNodeState>> {
        self.inner.core.state().load()
    }

    pub fn is_fallback_active(&self) -> bool {
        self.state().is_some_and(|s| s.is_fallback())
    }

    /// Run one cycle immediately, independent of the timer.
    pub async fn refresh(&self) -> Arc<ActiveNodeState> {
        self.inner.core.run_cycle().await
    }

    pub fn config(&self) -> &PulseConfig {
        &self.inner.config
    }
}
