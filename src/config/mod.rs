//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults
//!     → config file (TOML, optional)
//!     → .env file (optional)
//!     → environment variables (PORT, DATABASE_URL, DB_*, ...)
//!     → validation.rs (semantic checks)
//!     → ServiceConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{ConfigError, ConfigLoader};
pub use schema::{
    DatabaseConfig, HealthConfig, ListenerConfig, LogFormat, ObservabilityConfig, ServiceConfig,
    StartupConfig, TimeoutConfig,
};
pub use validation::ValidationError;
