//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML) or CLI flags
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → PulseConfig (validated, immutable)
//!     → moved into NodePulse at construction
//! ```
//!
//! # Design Decisions
//! - Config is immutable once a pulse is built; there is no hot reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Callbacks are not config; they are registered on the builder

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    BackoffConfig, FallbackConfig, FallbackRule, ObservabilityConfig, PoolConfig, ProbeConfig, PulseConfig,
};
pub use validation::{validate_config, ValidationError};
