//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for node-pulse.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::nodes::types::{Network, PoolTier, ServiceType};

/// Root configuration for a pulse instance.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PulseConfig {
    /// Service type whose pool is monitored.
    pub node_type: ServiceType,

    /// Network selecting the sub-pool.
    pub network: Network,

    /// Upper bound on the number of nodes kept in the active list.
    pub node_count: usize,

    /// Refresh interval in milliseconds.
    pub update_interval_ms: u64,

    /// Probe settings.
    pub probe: ProbeConfig,

    /// Fallback policy.
    pub fallback: FallbackConfig,

    /// Pool overrides applied on top of the built-in table.
    pub pools: Vec<PoolConfig>,

    /// Optional backoff while every pool is exhausted.
    pub backoff: BackoffConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            node_type: ServiceType::Hyperion,
            network: Network::Mainnet,
            node_count: 3,
            update_interval_ms: 30_000,
            probe: ProbeConfig::default(),
            fallback: FallbackConfig::default(),
            pools: Vec::new(),
            backoff: BackoffConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl PulseConfig {
    /// Minimal config for one service type and network.
    pub fn new(node_type: ServiceType, network: Network) -> Self {
        Self {
            node_type,
            network,
            ..Self::default()
        }
    }
}

/// Health probe configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Per-probe timeout in milliseconds.
    pub timeout_ms: u64,

    /// Cap on concurrent probes per cycle. `None` probes the whole pool at once.
    pub max_concurrency: Option<usize>,

    /// User-Agent sent with every probe.
    pub user_agent: String,

    /// Probe path overrides keyed by service type.
    pub paths: HashMap<ServiceType, String>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 5_000,
            max_concurrency: None,
            user_agent: format!("node-pulse/{}", env!("CARGO_PKG_VERSION")),
            paths: HashMap::new(),
        }
    }
}

/// Fallback policy configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FallbackConfig {
    /// Disable to never leave the primary pool.
    pub enabled: bool,

    /// Rules replacing the built-in policy entries.
    pub rules: Vec<FallbackRule>,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            rules: Vec::new(),
        }
    }
}

/// One entry of the fallback policy table.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FallbackRule {
    /// Service type this rule applies to.
    pub from: ServiceType,

    /// Service type to fall back to. Omit to disable fallback for `from`.
    pub to: Option<ServiceType>,

    /// Which pool of the target type to use.
    #[serde(default)]
    pub tier: PoolTier,
}

/// Pool override entry.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PoolConfig {
    pub node_type: ServiceType,

    pub network: Network,

    #[serde(default)]
    pub tier: PoolTier,

    /// Endpoints in priority order.
    pub endpoints: Vec<String>,

    /// Replace the built-in list instead of appending to it.
    #[serde(default)]
    pub replace: bool,
}

/// Backoff applied while both pools stay exhausted.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackoffConfig {
    /// Retry every cycle when disabled.
    pub enabled: bool,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_delay_ms: 30_000,
            max_delay_ms: 300_000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus exporter.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
