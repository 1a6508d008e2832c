//! Single-endpoint health probe.
//!
//! # Responsibilities
//! - Pick the cheap liveness request for a service type
//! - Bound every probe by a timeout
//! - Classify the outcome as healthy or unhealthy, never failing itself

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time;

use crate::config::ProbeConfig;
use crate::error::ProbeError;
use crate::http::{HttpProbe, ProbeMethod, ProbeOptions};
use crate::nodes::types::{Endpoint, ServiceType};
use crate::observability::metrics;

/// Small, always-available object used to check gateway liveness.
pub const GATEWAY_PROBE_CID: &str = "QmWnfdZkwWJxabDUbimrtaweYF8u9TaESDBM8xvRxxbQxv";

/// How a service type is probed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeSpec {
    pub method: ProbeMethod,
    pub path: String,
    pub range: Option<(u64, u64)>,
}

impl ProbeSpec {
    /// Built-in probe for a service type.
    pub fn for_service(node_type: ServiceType) -> Self {
        match node_type {
            ServiceType::Hyperion => Self::get("/v2/health"),
            ServiceType::Atomic => Self::get("/health"),
            ServiceType::Lightapi => Self::get("/api/status"),
            ServiceType::Ipfs => Self {
                method: ProbeMethod::Get,
                path: format!("/ipfs/{}", GATEWAY_PROBE_CID),
                range: Some((0, 0)),
            },
        }
    }

    fn get(path: &str) -> Self {
        Self {
            method: ProbeMethod::Get,
            path: path.to_string(),
            range: None,
        }
    }
}

/// Outcome of probing one endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy { latency: Duration },
    Unhealthy(ProbeError),
}

/// Per-endpoint health result. Ephemeral, never persisted.
#[derive(Debug, Clone)]
pub struct HealthResult {
    pub endpoint: Endpoint,
    pub status: HealthStatus,
}

impl HealthResult {
    pub fn is_healthy(&self) -> bool {
        matches!(self.status, HealthStatus::Healthy { .. })
    }
}

/// Issues liveness checks through an injected HTTP capability.
#[derive(Debug, Clone)]
pub struct HealthProber {
    client: Arc<dyn HttpProbe>,
    timeout: Duration,
    user_agent: String,
    overrides: HashMap<ServiceType, String>,
}

impl HealthProber {
    pub fn new(client: Arc<dyn HttpProbe>, config: &ProbeConfig) -> Self {
        Self {
            client,
            timeout: Duration::from_millis(config.timeout_ms),
            user_agent: config.user_agent.clone(),
            overrides: config.paths.clone(),
        }
    }

    /// Probe spec for a service type, honoring configured path overrides.
    pub fn spec_for(&self, node_type: ServiceType) -> ProbeSpec {
        let mut spec = ProbeSpec::for_service(node_type);
        if let Some(path) = self.overrides.get(&node_type) {
            spec.path = path.clone();
        }
        spec
    }

    /// Probe one endpoint. Network errors, timeouts and bad statuses all
    /// come back as `Unhealthy`.
    pub async fn probe(&self, endpoint: &Endpoint, node_type: ServiceType) -> HealthResult {
        let spec = self.spec_for(node_type);
        let url = endpoint.join(&spec.path);
        let options = ProbeOptions {
            method: spec.method,
            timeout: self.timeout,
            range: spec.range,
            user_agent: Some(self.user_agent.clone()),
        };

        let started = Instant::now();
        let status = match time::timeout(self.timeout, self.client.probe(&url, &options)).await {
            Ok(Ok(response)) if response.ok => HealthStatus::Healthy {
                latency: started.elapsed(),
            },
            Ok(Ok(response)) => {
                tracing::debug!(endpoint = %endpoint, status = response.status, "Health check failed: non-success status");
                HealthStatus::Unhealthy(ProbeError::ProbeBadStatus(response.status))
            }
            Ok(Err(crate::http::TransportError::Timeout)) | Err(_) => {
                tracing::debug!(endpoint = %endpoint, "Health check failed: timeout");
                HealthStatus::Unhealthy(ProbeError::ProbeTimeout(self.timeout.as_millis() as u64))
            }
            Ok(Err(e)) => {
                tracing::debug!(endpoint = %endpoint, error = %e, "Health check failed: connection error");
                HealthStatus::Unhealthy(ProbeError::ProbeNetworkFailure(e.to_string()))
            }
        };

        let result = HealthResult {
            endpoint: endpoint.clone(),
            status,
        };
        metrics::record_probe(node_type, &result);
        result
    }
}
