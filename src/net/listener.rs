//! TCP listener binding.
//!
//! # Responsibilities
//! - Normalize the configured address (`host:port`, `:port`, `port`)
//! - Bind to it, resolving hostnames when needed
//! - Classify bind failures so the entry point can fail fast
//!
//! Binding never waits on dependency readiness: once this returns, the HTTP
//! server starts accepting immediately.

use std::io::ErrorKind;
use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::ListenerConfig;

/// Error type for listener binding. Always fatal.
#[derive(Debug, Error)]
pub enum BindError {
    /// The address could not be parsed or resolved.
    #[error("invalid listen address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    /// Another socket already owns the address.
    #[error("address {address} already in use")]
    AddressInUse {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// The process may not bind the address (e.g., privileged port).
    #[error("permission denied binding {address}")]
    PermissionDenied {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// Any other bind failure.
    #[error("failed to bind {address}: {source}")]
    Io {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// A bound TCP listener, ready to hand to the HTTP server.
#[derive(Debug)]
pub struct BoundListener {
    inner: TcpListener,
    local_addr: SocketAddr,
}

impl BoundListener {
    /// The resolved address the socket is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn into_inner(self) -> TcpListener {
        self.inner
    }
}

/// Bind to the configured address.
pub async fn bind(config: &ListenerConfig) -> Result<BoundListener, BindError> {
    let address = normalize_address(&config.bind_address)?;

    let candidates: Vec<SocketAddr> = match address.parse::<SocketAddr>() {
        Ok(addr) => vec![addr],
        Err(_) => tokio::net::lookup_host(address.as_str())
            .await
            .map_err(|e| BindError::InvalidAddress {
                address: address.clone(),
                reason: e.to_string(),
            })?
            .collect(),
    };

    if candidates.is_empty() {
        return Err(BindError::InvalidAddress {
            address,
            reason: "resolved to no addresses".to_string(),
        });
    }

    let listener = TcpListener::bind(candidates.as_slice())
        .await
        .map_err(|e| classify(&address, e))?;

    let local_addr = listener.local_addr().map_err(|e| classify(&address, e))?;

    tracing::info!(
        configured = %config.bind_address,
        address = %local_addr,
        "Listener bound"
    );

    Ok(BoundListener {
        inner: listener,
        local_addr,
    })
}

/// Expand the shorthand forms into `host:port`.
fn normalize_address(raw: &str) -> Result<String, BindError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(BindError::InvalidAddress {
            address: String::new(),
            reason: "empty address".to_string(),
        });
    }

    if let Some(port) = raw.strip_prefix(':') {
        return parse_port(raw, port).map(|p| format!("0.0.0.0:{}", p));
    }

    if raw.bytes().all(|b| b.is_ascii_digit()) {
        return parse_port(raw, raw).map(|p| format!("0.0.0.0:{}", p));
    }

    Ok(raw.to_string())
}

fn parse_port(raw: &str, port: &str) -> Result<u16, BindError> {
    port.parse::<u16>().map_err(|e| BindError::InvalidAddress {
        address: raw.to_string(),
        reason: e.to_string(),
    })
}

fn classify(address: &str, source: std::io::Error) -> BindError {
    let address = address.to_string();
    match source.kind() {
        ErrorKind::AddrInUse => BindError::AddressInUse { address, source },
        ErrorKind::PermissionDenied => BindError::PermissionDenied { address, source },
        ErrorKind::AddrNotAvailable | ErrorKind::InvalidInput => BindError::InvalidAddress {
            address,
            reason: source.to_string(),
        },
        _ => BindError::Io { address, source },
    }
}
