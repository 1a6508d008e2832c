//! Pool evaluation.
//!
//! # Responsibilities
//! - Probe every candidate of a pool concurrently
//! - Keep the healthy subset in original pool order
//! - Truncate to the requested node count

use futures_util::stream::{self, StreamExt};

use crate::health::probe::{HealthProber, HealthResult};
use crate::nodes::types::{Endpoint, ServiceType};

/// Runs the prober over candidate pools.
#[derive(Debug, Clone)]
pub struct PoolEvaluator {
    prober: HealthProber,
    max_concurrency: Option<usize>,
}

impl PoolEvaluator {
    pub fn new(prober: HealthProber, max_concurrency: Option<usize>) -> Self {
        Self {
            prober,
            max_concurrency,
        }
    }

    /// Probe all candidates and return every result in pool order.
    pub async fn probe_all(&self, pool: &[Endpoint], node_type: ServiceType) -> Vec<HealthResult> {
        if pool.is_empty() {
            return Vec::new();
        }
        let limit = self.max_concurrency.unwrap_or(pool.len()).clamp(1, pool.len());

        // Collect before streaming; a borrowing `map` closure in the stream is not `Send`.
        // `buffered` yields in input order, so completion order cannot reorder results.
        let probes: Vec<_> = pool
            .iter()
            .map(|endpoint| self.prober.probe(endpoint, node_type))
            .collect();
        stream::iter(probes).buffered(limit).collect().await
    }

    /// Up to `count` healthy endpoints, ordered by pool priority. May be empty.
    pub async fn evaluate(&self, pool: &[Endpoint], node_type: ServiceType, count: usize) -> Vec<Endpoint> {
        let results = self.probe_all(pool, node_type).await;
        let total = results.len();

        let healthy: Vec<Endpoint> = results
            .into_iter()
            .filter(HealthResult::is_healthy)
            .map(|r| r.endpoint)
            .take(count)
            .collect();

        tracing::debug!(
            node_type = %node_type,
            candidates = total,
            selected = healthy.len(),
            "Pool evaluated"
        );
        healthy
    }
}
