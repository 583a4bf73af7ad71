//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! ListenerConfig.bind_address
//!     → listener.rs (normalize, resolve, bind)
//!     → BoundListener handed to the HTTP server
//!     → every accepted connection goes to the request router
//! ```
//!
//! # Design Decisions
//! - Bind errors are classified and always fatal
//! - No readiness gating at this layer

pub mod listener;

pub use listener::{bind, BindError, BoundListener};
