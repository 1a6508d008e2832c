//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (counts and intervals > 0)
//! - Reject fallback rules that point back at the primary pool
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: PulseConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;

use crate::config::schema::PulseConfig;
use crate::nodes::types::PoolTier;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &PulseConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.node_count == 0 {
        errors.push(ValidationError::new("node_count", "must be greater than 0"));
    }
    if config.update_interval_ms == 0 {
        errors.push(ValidationError::new("update_interval_ms", "must be greater than 0"));
    }
    if config.probe.timeout_ms == 0 {
        errors.push(ValidationError::new("probe.timeout_ms", "must be greater than 0"));
    }
    if config.probe.max_concurrency == Some(0) {
        errors.push(ValidationError::new("probe.max_concurrency", "must be greater than 0 when set"));
    }

    for (i, rule) in config.fallback.rules.iter().enumerate() {
        if rule.to == Some(rule.from) && rule.tier == PoolTier::Primary {
            errors.push(ValidationError::new(
                format!("fallback.rules[{}]", i),
                format!("{} cannot fall back to its own primary pool", rule.from),
            ));
        }
    }

    for (i, pool) in config.pools.iter().enumerate() {
        if pool.endpoints.is_empty() && pool.replace {
            errors.push(ValidationError::new(
                format!("pools[{}].endpoints", i),
                "replacing a pool with an empty list leaves nothing to probe",
            ));
        }
    }

    if config.backoff.enabled {
        if config.backoff.base_delay_ms == 0 {
            errors.push(ValidationError::new("backoff.base_delay_ms", "must be greater than 0"));
        }
        if config.backoff.max_delay_ms < config.backoff.base_delay_ms {
            errors.push(ValidationError::new("backoff.max_delay_ms", "must not be below base_delay_ms"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{FallbackRule, PoolConfig};
    use crate::nodes::types::{Network, ServiceType};

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&PulseConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = PulseConfig::default();
        config.node_count = 0;
        config.update_interval_ms = 0;
        config.fallback.rules.push(FallbackRule {
            from: ServiceType::Atomic,
            to: Some(ServiceType::Atomic),
            tier: PoolTier::Primary,
        });
        config.pools.push(PoolConfig {
            node_type: ServiceType::Atomic,
            network: Network::Mainnet,
            tier: PoolTier::Primary,
            endpoints: Vec::new(),
            replace: true,
        });

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert_eq!(errors[0].field, "node_count");
        assert!(errors[2].to_string().contains("own primary pool"));
    }

    #[test]
    fn test_secondary_self_fallback_is_allowed() {
        let mut config = PulseConfig::new(ServiceType::Ipfs, Network::Mainnet);
        config.fallback.rules.push(FallbackRule {
            from: ServiceType::Ipfs,
            to: Some(ServiceType::Ipfs),
            tier: PoolTier::Secondary,
        });
        assert!(validate_config(&config).is_ok());
    }
}
