//! Readiness subsystem.
//!
//! # Data Flow
//! ```text
//! Startup orchestrator
//!     → state.rs (transition, swap in new snapshot)
//!     → signal.rs (broadcast startup line)
//!
//! Observers:
//!     → endpoints.rs (/health/live, /health/ready)
//!     → Readiness::subscribe (in-process listeners)
//! ```
//!
//! # Design Decisions
//! - Readiness never gates the request router
//! - Readers never block the writer

pub mod endpoints;
pub mod signal;
pub mod state;

pub use endpoints::health_routes;
pub use signal::StartupSignal;
pub use state::{Readiness, ReadinessSnapshot, ReadinessState, TransitionError};
