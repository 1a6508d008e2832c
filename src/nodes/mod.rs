//! Endpoint pools.
//!
//! # Data Flow
//! ```text
//! defaults.rs (built-in public endpoints)
//!     + [[pools]] overrides from config
//!     → table.rs (NodeTable, immutable once built)
//!     → CandidatePool handed to the evaluator each cycle
//! ```
//!
//! # Design Decisions
//! - Pool order is a priority hint, preserved end to end
//! - The table is injected, never read from a global
//! - URLs are opaque strings; malformed ones are only warned about

pub mod defaults;
pub mod table;
pub mod types;

pub use table::{CandidatePool, NodeTable};
pub use types::{Endpoint, Network, PoolTier, ServiceType};
