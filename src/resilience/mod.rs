//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Dependency probe:
//!     → bounded by startup.probe_timeout
//!     → On failure: retries.rs (retry allowed? wait with backoff)
//!     → Exhausted: caller records the failure
//! ```
//!
//! # Design Decisions
//! - Every probe has a deadline
//! - Retries are opt-in through configuration

pub mod retries;

pub use retries::RetryPolicy;
