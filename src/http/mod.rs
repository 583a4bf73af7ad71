//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! Bound TCP listener
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID set + propagated)
//!     → application router (opaque) or health endpoints
//!     → Send to client
//! ```

pub mod app;
pub mod request;
pub mod server;

pub use app::default_router;
pub use request::{UuidRequestId, X_REQUEST_ID};
pub use server::HttpServer;
