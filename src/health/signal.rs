//! Observable startup signals.

use std::net::SocketAddr;

/// One externally visible startup line.
///
/// The `Display` form is the exact text operators and tests match on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartupSignal {
    ListenerActive { address: SocketAddr },
    DependencyReady,
    DependencyUnreachable { error: String },
}

impl std::fmt::Display for StartupSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StartupSignal::ListenerActive { address } => {
                write!(f, "listener active on {}", address)
            }
            StartupSignal::DependencyReady => f.write_str("dependency ready"),
            StartupSignal::DependencyUnreachable { error } => {
                write!(f, "dependency unreachable: {}", error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_operator_lines() {
        let addr: SocketAddr = "0.0.0.0:8080".parse().unwrap();
        assert_eq!(
            StartupSignal::ListenerActive { address: addr }.to_string(),
            "listener active on 0.0.0.0:8080"
        );
        assert_eq!(StartupSignal::DependencyReady.to_string(), "dependency ready");
        assert_eq!(
            StartupSignal::DependencyUnreachable {
                error: "ECONNREFUSED".into()
            }
            .to_string(),
            "dependency unreachable: ECONNREFUSED"
        );
    }
}
