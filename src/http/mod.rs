//! HTTP transport subsystem.
//!
//! # Data Flow
//! ```text
//! HealthProber
//!     → client.rs (HttpProbe trait)
//!     → ReqwestProbe (production) or an injected implementation (tests)
//!     → ProbeResponse { ok, status, headers }
//! ```

pub mod client;

pub use client::{HttpProbe, ProbeMethod, ProbeOptions, ProbeResponse, ReqwestProbe, TransportError};
