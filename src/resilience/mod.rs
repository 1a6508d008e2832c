//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Each refresh cycle:
//!     → fallback.rs (primary pool first, fallback target if primary is empty)
//!     → backoff.rs (optionally space out cycles while every pool is exhausted)
//! ```
//!
//! # Design Decisions
//! - Fallback targets are policy data, not code paths
//! - Transitions are edge-triggered, never level-triggered
//! - Retry every cycle unless backoff is explicitly enabled

pub mod backoff;
pub mod fallback;

pub use backoff::ExhaustionBackoff;
pub use fallback::{ControllerState, CycleOutcome, FallbackController, FallbackPolicy, FallbackTarget, Transition};
