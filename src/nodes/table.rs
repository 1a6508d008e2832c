//! Candidate pool lookup.
//!
//! # Responsibilities
//! - Hold every known pool keyed by service type, network and tier
//! - Apply configured overrides on top of the built-in defaults
//! - Hand out read-only candidate pools to the evaluator

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::PoolConfig;
use crate::nodes::defaults::default_endpoints;
use crate::nodes::types::{Endpoint, Network, PoolTier, ServiceType};

/// Ordered candidates for one pool. Earlier entries are preferred.
pub type CandidatePool = Arc<[Endpoint]>;

type PoolKey = (ServiceType, Network, PoolTier);

/// Immutable mapping of pools to their candidates.
#[derive(Debug, Clone, Default)]
pub struct NodeTable {
    pools: HashMap<PoolKey, CandidatePool>,
}

impl NodeTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Table populated with the built-in public endpoints.
    pub fn defaults() -> Self {
        let mut table = Self::new();
        for node_type in ServiceType::ALL {
            for network in [Network::Mainnet, Network::Testnet] {
                for tier in [PoolTier::Primary, PoolTier::Secondary] {
                    let urls = default_endpoints(node_type, network, tier);
                    if !urls.is_empty() {
                        table = table.with_pool(node_type, network, tier, urls.iter().copied());
                    }
                }
            }
        }
        table
    }

    /// Defaults with configured overrides applied.
    pub fn from_config(overrides: &[PoolConfig]) -> Self {
        let mut table = Self::defaults();
        for pool in overrides {
            for url in &pool.endpoints {
                if let Err(e) = url::Url::parse(url) {
                    tracing::warn!(url = %url, error = %e, "Endpoint does not parse as a URL, keeping it anyway");
                }
            }
            let replace = pool.replace || !table.pools.contains_key(&(pool.node_type, pool.network, pool.tier));
            table = if replace {
                table.with_pool(pool.node_type, pool.network, pool.tier, pool.endpoints.iter().cloned())
            } else {
                table.extend_pool(pool.node_type, pool.network, pool.tier, pool.endpoints.iter().cloned())
            };
        }
        table
    }

    /// Replace one pool.
    pub fn with_pool<I, E>(mut self, node_type: ServiceType, network: Network, tier: PoolTier, endpoints: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Endpoint>,
    {
        let pool: CandidatePool = endpoints.into_iter().map(Into::into).collect();
        self.pools.insert((node_type, network, tier), pool);
        self
    }

    /// Append to a pool, skipping endpoints already present.
    pub fn extend_pool<I, E>(mut self, node_type: ServiceType, network: Network, tier: PoolTier, endpoints: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Endpoint>,
    {
        let key = (node_type, network, tier);
        let mut merged: Vec<Endpoint> = self.pools.get(&key).map(|p| p.to_vec()).unwrap_or_default();
        for endpoint in endpoints.into_iter().map(Into::into) {
            if !merged.contains(&endpoint) {
                merged.push(endpoint);
            }
        }
        self.pools.insert(key, merged.into());
        self
    }

    /// Candidates for a pool; empty if nothing is configured.
    pub fn pool(&self, node_type: ServiceType, network: Network, tier: PoolTier) -> CandidatePool {
        self.pools
            .get(&(node_type, network, tier))
            .cloned()
            .unwrap_or_else(|| Arc::from(Vec::new()))
    }

    /// Shorthand for the primary tier.
    pub fn primary(&self, node_type: ServiceType, network: Network) -> CandidatePool {
        self.pool(node_type, network, PoolTier::Primary)
    }
}
