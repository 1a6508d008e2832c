//! Error definitions.

use thiserror::Error;

use crate::config::ConfigError;
use crate::nodes::types::{Network, ServiceType};

/// Why a single endpoint was classified unhealthy.
///
/// These never leave the evaluator; they are recorded on the health result
/// and logged.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProbeError {
    /// No response within the probe timeout.
    #[error("probe timed out after {0} ms")]
    ProbeTimeout(u64),

    /// Connection, TLS or protocol failure.
    #[error("network failure: {0}")]
    ProbeNetworkFailure(String),

    /// Response arrived with a non-2xx status.
    #[error("unexpected status {0}")]
    ProbeBadStatus(u16),
}

/// Pool-level failures surfaced to callers and error subscribers.
#[derive(Debug, Error)]
pub enum PulseError {
    /// No healthy endpoint is available after a best-effort evaluation.
    #[error("no healthy {node_type} endpoints on {network}")]
    NoHealthyEndpoints { node_type: ServiceType, network: Network },

    /// Both the primary pool and the fallback pool came back empty.
    #[error("all pools exhausted: no healthy {primary} or {fallback} endpoints on {network}")]
    AllPoolsExhausted {
        primary: ServiceType,
        fallback: ServiceType,
        network: Network,
    },

    /// The configuration was rejected.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for pulse operations.
pub type PulseResult<T> = Result<T, PulseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ProbeError::ProbeTimeout(5000);
        assert_eq!(err.to_string(), "probe timed out after 5000 ms");

        let err = PulseError::AllPoolsExhausted {
            primary: ServiceType::Lightapi,
            fallback: ServiceType::Hyperion,
            network: Network::Testnet,
        };
        assert_eq!(
            err.to_string(),
            "all pools exhausted: no healthy lightapi or hyperion endpoints on testnet"
        );
    }
}
