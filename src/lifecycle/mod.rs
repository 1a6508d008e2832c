//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! start():
//!     Arm timer (first tick one interval out) → run one cycle inline
//!
//! Each tick:
//!     Cycle slot free? → spawn cycle → publish snapshot → notify
//!     Slot busy or backing off? → skip tick (never queued)
//!
//! stop():
//!     Signal timer → timer exits → in-flight cycle finishes on its own
//! ```
//!
//! # Design Decisions
//! - The cycle mutex is the single in-flight guard for timed and on-demand cycles
//! - Stopping never aborts probes already sent
//! - A stopped scheduler can be started again

pub mod scheduler;

pub use scheduler::{RefreshCore, RefreshScheduler};
