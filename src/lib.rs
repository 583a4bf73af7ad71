//! HTTP service bootstrap with a post-bind dependency readiness probe.
//!
//! # Architecture Overview
//!
//! ```text
//!   config ──▶ net::listener ──▶ http::server ──▶ application router
//!                   │                 │
//!                   │                 └──▶ /health/live, /health/ready
//!                   ▼                               ▲
//!         lifecycle::startup ──▶ dependency ──▶ health::Readiness
//!          (StartupOrchestrator)  (authenticate)   (Starting → Listening
//!                                                   → Ready | Degraded)
//! ```
//!
//! The listener accepts traffic as soon as it is bound. The dependency probe
//! runs afterwards and only changes the reported readiness.

pub mod config;
pub mod dependency;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod resilience;

pub use config::ServiceConfig;
pub use dependency::{DependencyClient, DependencyError};
pub use health::{Readiness, ReadinessState, StartupSignal};
pub use http::HttpServer;
pub use lifecycle::{start, Service, Shutdown, StartupOrchestrator};
