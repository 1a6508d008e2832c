//! Primary/fallback pool selection.
//!
//! # States
//! - PrimaryActive: nodes come from the configured service type's pool
//! - FallbackActive: primary pool had no healthy nodes; the fallback target is used
//!
//! # State Transitions
//! ```text
//! PrimaryActive → FallbackActive: primary evaluates to zero healthy nodes
//! FallbackActive → PrimaryActive: primary evaluates to at least one healthy node
//! ```
//!
//! # Design Decisions
//! - The primary pool is re-probed first on every cycle (cheap promotion check)
//! - A transition is reported once, on the cycle that crosses the boundary
//! - When both pools are empty the controller stays in FallbackActive

use std::collections::HashMap;

use crate::config::FallbackConfig;
use crate::error::PulseError;
use crate::health::evaluator::PoolEvaluator;
use crate::health::state::PoolSource;
use crate::nodes::table::NodeTable;
use crate::nodes::types::{Endpoint, Network, PoolTier, ServiceType};
use crate::observability::metrics;

/// Pool used when a service type's primary pool is unhealthy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackTarget {
    pub node_type: ServiceType,
    pub tier: PoolTier,
}

/// Fallback policy table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackPolicy {
    rules: HashMap<ServiceType, FallbackTarget>,
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        let mut rules = HashMap::new();
        rules.insert(
            ServiceType::Lightapi,
            FallbackTarget {
                node_type: ServiceType::Hyperion,
                tier: PoolTier::Primary,
            },
        );
        rules.insert(
            ServiceType::Ipfs,
            FallbackTarget {
                node_type: ServiceType::Ipfs,
                tier: PoolTier::Secondary,
            },
        );
        Self { rules }
    }
}

impl FallbackPolicy {
    /// Policy that never falls back.
    pub fn disabled() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Built-in rules with configured rules layered on top.
    pub fn from_config(config: &FallbackConfig) -> Self {
        if !config.enabled {
            return Self::disabled();
        }
        let mut policy = Self::default();
        for rule in &config.rules {
            match rule.to {
                Some(node_type) => {
                    policy.rules.insert(rule.from, FallbackTarget { node_type, tier: rule.tier });
                }
                None => {
                    policy.rules.remove(&rule.from);
                }
            }
        }
        policy
    }

    pub fn target_for(&self, node_type: ServiceType) -> Option<FallbackTarget> {
        self.rules.get(&node_type).copied()
    }
}

/// Controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControllerState {
    #[default]
    PrimaryActive,
    FallbackActive,
}

/// Boundary crossing observed during a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Switched from the primary pool to the fallback target.
    Engaged,
    /// Switched back to the primary pool.
    Recovered,
}

/// Result of one evaluation cycle.
#[derive(Debug)]
pub struct CycleOutcome {
    pub nodes: Vec<Endpoint>,
    pub source: PoolSource,
    pub transition: Option<Transition>,
    /// Set when `nodes` is empty.
    pub error: Option<PulseError>,
}

/// Two-state machine choosing between the primary and fallback pools.
#[derive(Debug)]
pub struct FallbackController {
    state: ControllerState,
    primary: ServiceType,
    network: Network,
    target: Option<FallbackTarget>,
    node_count: usize,
}

impl FallbackController {
    pub fn new(primary: ServiceType, network: Network, policy: &FallbackPolicy, node_count: usize) -> Self {
        Self {
            state: ControllerState::PrimaryActive,
            primary,
            network,
            target: policy.target_for(primary),
            node_count,
        }
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn target(&self) -> Option<FallbackTarget> {
        self.target
    }

    fn primary_source(&self) -> PoolSource {
        PoolSource {
            node_type: self.primary,
            tier: PoolTier::Primary,
            fallback: false,
        }
    }

    /// Evaluate the pools once and advance the state machine.
    pub async fn run_cycle(&mut self, evaluator: &PoolEvaluator, table: &NodeTable) -> CycleOutcome {
        let primary_pool = table.primary(self.primary, self.network);
        let nodes = evaluator.evaluate(&primary_pool, self.primary, self.node_count).await;

        if !nodes.is_empty() {
            let transition = if self.state == ControllerState::FallbackActive {
                tracing::info!(
                    node_type = %self.primary,
                    network = %self.network,
                    healthy = nodes.len(),
                    "Primary pool recovered, leaving fallback"
                );
                metrics::record_fallback_transition(self.primary, false);
                Some(Transition::Recovered)
            } else {
                None
            };
            self.state = ControllerState::PrimaryActive;
            return CycleOutcome {
                nodes,
                source: self.primary_source(),
                transition,
                error: None,
            };
        }

        let Some(target) = self.target else {
            tracing::warn!(
                node_type = %self.primary,
                network = %self.network,
                "No healthy endpoints and no fallback configured"
            );
            return CycleOutcome {
                nodes,
                source: self.primary_source(),
                transition: None,
                error: Some(PulseError::NoHealthyEndpoints {
                    node_type: self.primary,
                    network: self.network,
                }),
            };
        };

        let fallback_pool = table.pool(target.node_type, self.network, target.tier);
        let nodes = evaluator.evaluate(&fallback_pool, target.node_type, self.node_count).await;

        let transition = if self.state == ControllerState::PrimaryActive {
            tracing::warn!(
                node_type = %self.primary,
                fallback = %target.node_type,
                tier = %target.tier,
                healthy = nodes.len(),
                "Primary pool unhealthy, switching to fallback"
            );
            metrics::record_fallback_transition(target.node_type, true);
            Some(Transition::Engaged)
        } else {
            None
        };
        self.state = ControllerState::FallbackActive;

        let error = if nodes.is_empty() {
            tracing::error!(
                node_type = %self.primary,
                fallback = %target.node_type,
                network = %self.network,
                "Primary and fallback pools exhausted"
            );
            Some(PulseError::AllPoolsExhausted {
                primary: self.primary,
                fallback: target.node_type,
                network: self.network,
            })
        } else {
            None
        };

        CycleOutcome {
            nodes,
            source: PoolSource {
                node_type: target.node_type,
                tier: target.tier,
                fallback: true,
            },
            transition,
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FallbackRule, ProbeConfig};
    use crate::health::probe::HealthProber;
    use crate::http::{HttpProbe, ProbeOptions, ProbeResponse, TransportError};
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};

    /// Answers 200 for hosts currently marked up.
    #[derive(Debug, Default)]
    struct Switchboard {
        up: Mutex<HashSet<String>>,
    }

    impl Switchboard {
        fn set(&self, hosts: &[&str]) {
            *self.up.lock().unwrap() = hosts.iter().map(|h| h.to_string()).collect();
        }
    }

    #[async_trait]
    impl HttpProbe for Switchboard {
        async fn probe(&self, url: &str, _options: &ProbeOptions) -> Result<ProbeResponse, TransportError> {
            let up = self.up.lock().unwrap();
            if up.iter().any(|h| url.starts_with(h.as_str())) {
                Ok(ProbeResponse::from_status(200))
            } else {
                Err(TransportError::Network("connection refused".into()))
            }
        }
    }

    fn setup() -> (Arc<Switchboard>, PoolEvaluator, NodeTable) {
        let board = Arc::new(Switchboard::default());
        let evaluator = PoolEvaluator::new(HealthProber::new(board.clone(), &ProbeConfig::default()), None);
        let table = NodeTable::new()
            .with_pool(ServiceType::Lightapi, Network::Mainnet, PoolTier::Primary, ["http://light-a", "http://light-b"])
            .with_pool(ServiceType::Hyperion, Network::Mainnet, PoolTier::Primary, ["http://hyp-a", "http://hyp-b"]);
        (board, evaluator, table)
    }

    #[test]
    fn test_policy_from_config() {
        let policy = FallbackPolicy::default();
        assert_eq!(policy.target_for(ServiceType::Lightapi).unwrap().node_type, ServiceType::Hyperion);
        assert!(policy.target_for(ServiceType::Atomic).is_none());

        let config = FallbackConfig {
            enabled: true,
            rules: vec![
                FallbackRule {
                    from: ServiceType::Atomic,
                    to: Some(ServiceType::Hyperion),
                    tier: PoolTier::Primary,
                },
                FallbackRule {
                    from: ServiceType::Lightapi,
                    to: None,
                    tier: PoolTier::Primary,
                },
            ],
        };
        let policy = FallbackPolicy::from_config(&config);
        assert!(policy.target_for(ServiceType::Atomic).is_some());
        assert!(policy.target_for(ServiceType::Lightapi).is_none());
        assert_eq!(policy.target_for(ServiceType::Ipfs).unwrap().tier, PoolTier::Secondary);

        let disabled = FallbackPolicy::from_config(&FallbackConfig {
            enabled: false,
            rules: Vec::new(),
        });
        assert_eq!(disabled, FallbackPolicy::disabled());
    }

    #[tokio::test]
    async fn test_transitions_fire_once_per_crossing() {
        let (board, evaluator, table) = setup();
        let mut controller =
            FallbackController::new(ServiceType::Lightapi, Network::Mainnet, &FallbackPolicy::default(), 3);

        board.set(&["http://light-b", "http://hyp-a"]);
        let out = controller.run_cycle(&evaluator, &table).await;
        assert_eq!(out.transition, None);
        assert_eq!(out.nodes, vec![Endpoint::new("http://light-b")]);

        board.set(&["http://hyp-b"]);
        let out = controller.run_cycle(&evaluator, &table).await;
        assert_eq!(out.transition, Some(Transition::Engaged));
        assert!(out.source.fallback);
        assert_eq!(out.source.node_type, ServiceType::Hyperion);
        assert_eq!(out.nodes, vec![Endpoint::new("http://hyp-b")]);

        // Steady state in fallback: no further transition.
        let out = controller.run_cycle(&evaluator, &table).await;
        assert_eq!(out.transition, None);
        assert_eq!(controller.state(), ControllerState::FallbackActive);

        board.set(&["http://light-a", "http://hyp-a"]);
        let out = controller.run_cycle(&evaluator, &table).await;
        assert_eq!(out.transition, Some(Transition::Recovered));
        assert!(!out.source.fallback);
        assert_eq!(out.nodes, vec![Endpoint::new("http://light-a")]);
    }

    #[tokio::test]
    async fn test_both_pools_exhausted() {
        let (board, evaluator, table) = setup();
        let mut controller =
            FallbackController::new(ServiceType::Lightapi, Network::Mainnet, &FallbackPolicy::default(), 3);

        board.set(&[]);
        let out = controller.run_cycle(&evaluator, &table).await;
        assert!(out.nodes.is_empty());
        assert_eq!(out.transition, Some(Transition::Engaged));
        assert!(matches!(out.error, Some(PulseError::AllPoolsExhausted { .. })));
        assert_eq!(controller.state(), ControllerState::FallbackActive);

        let out = controller.run_cycle(&evaluator, &table).await;
        assert_eq!(out.transition, None);
        assert!(out.error.is_some());

        // Fallback comes back while primary is still down: no transition.
        board.set(&["http://hyp-a"]);
        let out = controller.run_cycle(&evaluator, &table).await;
        assert_eq!(out.transition, None);
        assert!(out.error.is_none());
        assert_eq!(out.nodes, vec![Endpoint::new("http://hyp-a")]);
    }

    #[tokio::test]
    async fn test_without_fallback_target() {
        let (board, evaluator, table) = setup();
        let mut controller =
            FallbackController::new(ServiceType::Hyperion, Network::Mainnet, &FallbackPolicy::default(), 3);

        board.set(&["http://light-a"]);
        let out = controller.run_cycle(&evaluator, &table).await;
        assert!(out.nodes.is_empty());
        assert!(out.transition.is_none());
        assert!(matches!(out.error, Some(PulseError::NoHealthyEndpoints { .. })));
        assert_eq!(controller.state(), ControllerState::PrimaryActive);
    }
}
