//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Candidate pool
//!     → evaluator.rs (fan out, bounded by pool size)
//!     → probe.rs (one liveness request per endpoint)
//!     → healthy subset in pool order, truncated to node_count
//!
//! Cycle result
//!     → state.rs (fresh snapshot, atomic swap)
//! ```
//!
//! # Design Decisions
//! - Probe failures are classified, never propagated
//! - No retries inside a cycle; the next cycle is the retry
//! - Ordering follows pool priority, not probe latency

pub mod evaluator;
pub mod probe;
pub mod state;

pub use evaluator::PoolEvaluator;
pub use probe::{HealthProber, HealthResult, HealthStatus, ProbeSpec};
pub use state::{ActiveNodeState, NodeStateCell, PoolSource};
