//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, attempts > 0)
//! - Check that a dependency target is configured
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ServiceConfig;

/// A single semantic problem in a loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address must not be empty")]
    EmptyBindAddress,

    #[error("database target missing: set database.url or database.host (DATABASE_URL / DB_HOST)")]
    MissingDatabaseTarget,

    #[error("startup.probe_timeout_secs must be greater than zero")]
    ZeroProbeTimeout,

    #[error("startup.max_attempts must be at least 1")]
    ZeroAttempts,

    #[error("startup.base_delay_ms ({base}) exceeds startup.max_delay_ms ({max})")]
    BackoffRange { base: u64, max: u64 },

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroRequestTimeout,

    #[error("database.max_connections must be at least 1")]
    ZeroPoolSize,

    #[error("observability.metrics_address '{0}' is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Check a configuration for semantic errors.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.trim().is_empty() {
        errors.push(ValidationError::EmptyBindAddress);
    }

    if !config.database.has_target() {
        errors.push(ValidationError::MissingDatabaseTarget);
    }

    if config.database.max_connections == 0 {
        errors.push(ValidationError::ZeroPoolSize);
    }

    let startup = &config.startup;
    if startup.probe_timeout_secs == 0 {
        errors.push(ValidationError::ZeroProbeTimeout);
    }
    if startup.max_attempts == 0 {
        errors.push(ValidationError::ZeroAttempts);
    }
    if startup.base_delay_ms > startup.max_delay_ms {
        errors.push(ValidationError::BackoffRange {
            base: startup.base_delay_ms,
            max: startup.max_delay_ms,
        });
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    let observability = &config.observability;
    if observability.metrics_enabled
        && observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
