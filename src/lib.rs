//! Health-checked endpoint selection for blockchain service pools.
//!
//! Keeps a list of healthy endpoints for one service type and network,
//! re-probing on an interval and switching to a fallback pool when the
//! primary pool has no healthy endpoints.

pub mod config;
pub mod error;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod nodes;
pub mod observability;
pub mod pulse;
pub mod resilience;

pub use config::PulseConfig;
pub use error::{ProbeError, PulseError, PulseResult};
pub use nodes::{Endpoint, Network, NodeTable, PoolTier, ServiceType};
pub use pulse::{NodePulse, NodePulseBuilder};
