//! Backing data store client.
//!
//! # Data Flow
//! ```text
//! DatabaseConfig
//!     → postgres.rs (lazy pool, no I/O at construction)
//!     → authenticate(): one round trip on an authenticated session
//!     → Result<(), DependencyError> consumed by the startup orchestrator
//! ```
//!
//! # Design Decisions
//! - The orchestrator only sees the trait; the driver stays behind it
//! - Errors describe themselves in operator terms (e.g. ECONNREFUSED)

pub mod postgres;

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

pub use postgres::PostgresClient;

/// Why the dependency could not be confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DependencyError {
    /// The store answered but refused the credentials.
    #[error("credentials rejected: {0}")]
    Rejected(String),

    /// The store could not be reached at the network level.
    #[error("{0}")]
    Unreachable(String),

    /// No answer within the probe deadline.
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// Handshake or query failed for another reason.
    #[error("protocol failure: {0}")]
    Protocol(String),

    /// The connection parameters are unusable.
    #[error("invalid connection parameters: {0}")]
    Config(String),
}

/// A client able to confirm the data store is reachable and accepts our
/// credentials.
pub trait DependencyClient: Send + Sync {
    fn authenticate(&self) -> impl Future<Output = Result<(), DependencyError>> + Send;
}
