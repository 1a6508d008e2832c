//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Prober, controller and scheduler produce:
//!     → tracing events (structured fields: endpoint, node_type, network)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → logging.rs subscriber (stdout, filtered by RUST_LOG)
//!     → Prometheus scrape endpoint (optional)
//! ```

pub mod logging;
pub mod metrics;
