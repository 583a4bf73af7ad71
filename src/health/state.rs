//! Service readiness state machine.
//!
//! # States
//! - Starting: process launched, socket not yet confirmed
//! - Listening: socket bound, dependency probe pending
//! - Ready: dependency authenticated
//! - Degraded: dependency unreachable, still serving
//!
//! # State Transitions
//! ```text
//! Starting → Listening: bind succeeded
//! Listening → Ready: probe succeeded
//! Listening → Degraded: probe failed (after any configured retries)
//! ```
//!
//! # Design Decisions
//! - Each transition swaps in a new immutable snapshot (ArcSwap)
//! - Single writer (the startup orchestrator), any number of readers
//! - Ready and Degraded are terminal

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use arc_swap::ArcSwap;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::broadcast;

use crate::health::signal::StartupSignal;

/// Capacity of the startup signal channel. A run emits at most two signals.
const SIGNAL_CAPACITY: usize = 16;

/// Process readiness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReadinessState {
    Starting,
    Listening,
    Ready,
    Degraded,
}

impl ReadinessState {
    pub fn as_str(self) -> &'static str {
        match self {
            ReadinessState::Starting => "STARTING",
            ReadinessState::Listening => "LISTENING",
            ReadinessState::Ready => "READY",
            ReadinessState::Degraded => "DEGRADED",
        }
    }

    pub fn is_ready(self) -> bool {
        self == ReadinessState::Ready
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ReadinessState::Ready | ReadinessState::Degraded)
    }

    /// Numeric encoding used for the readiness gauge.
    pub fn as_gauge(self) -> f64 {
        match self {
            ReadinessState::Starting => 0.0,
            ReadinessState::Listening => 1.0,
            ReadinessState::Ready => 2.0,
            ReadinessState::Degraded => 3.0,
        }
    }

    fn can_transition_to(self, next: ReadinessState) -> bool {
        matches!(
            (self, next),
            (ReadinessState::Starting, ReadinessState::Listening)
                | (ReadinessState::Listening, ReadinessState::Ready)
                | (ReadinessState::Listening, ReadinessState::Degraded)
        )
    }
}

impl std::fmt::Display for ReadinessState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid readiness transition {from} -> {to}")]
pub struct TransitionError {
    pub from: ReadinessState,
    pub to: ReadinessState,
}

/// Immutable view of readiness at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadinessSnapshot {
    pub state: ReadinessState,
    /// Description of the probe failure, set only when `Degraded`.
    pub error: Option<String>,
    /// Probe attempts issued so far.
    pub probe_attempts: u32,
    /// Unix time of the last change, in milliseconds.
    pub updated_at_ms: u64,
}

impl ReadinessSnapshot {
    fn initial() -> Self {
        Self {
            state: ReadinessState::Starting,
            error: None,
            probe_attempts: 0,
            updated_at_ms: now_ms(),
        }
    }
}

/// Shared handle to the process readiness.
///
/// Clones observe the same state. Only the startup orchestrator writes.
#[derive(Debug, Clone)]
pub struct Readiness {
    current: Arc<ArcSwap<ReadinessSnapshot>>,
    signals: broadcast::Sender<StartupSignal>,
}

impl Readiness {
    pub fn new() -> Self {
        let (signals, _) = broadcast::channel(SIGNAL_CAPACITY);
        Self {
            current: Arc::new(ArcSwap::from_pointee(ReadinessSnapshot::initial())),
            signals,
        }
    }

    /// Current state.
    pub fn state(&self) -> ReadinessState {
        self.current.load().state
    }

    /// Current snapshot, consistent across all its fields.
    pub fn snapshot(&self) -> Arc<ReadinessSnapshot> {
        self.current.load_full()
    }

    /// Receive startup signals emitted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<StartupSignal> {
        self.signals.subscribe()
    }

    /// Move to `next`, recording `error` alongside it.
    pub(crate) fn transition(
        &self,
        next: ReadinessState,
        error: Option<String>,
    ) -> Result<ReadinessSnapshot, TransitionError> {
        let current = self.current.load_full();
        if !current.state.can_transition_to(next) {
            return Err(TransitionError {
                from: current.state,
                to: next,
            });
        }

        let snapshot = ReadinessSnapshot {
            state: next,
            error,
            probe_attempts: current.probe_attempts,
            updated_at_ms: now_ms(),
        };
        self.current.store(Arc::new(snapshot.clone()));

        tracing::debug!(from = %current.state, to = %next, "Readiness transition");
        Ok(snapshot)
    }

    /// Count one more probe attempt without changing state.
    pub(crate) fn record_attempt(&self) -> u32 {
        let current = self.current.load_full();
        let attempts = current.probe_attempts + 1;
        self.current.store(Arc::new(ReadinessSnapshot {
            probe_attempts: attempts,
            ..(*current).clone()
        }));
        attempts
    }

    /// Broadcast a startup signal. Having no subscribers is fine.
    pub(crate) fn emit(&self, signal: StartupSignal) {
        let _ = self.signals.send(signal);
    }
}

impl Default for Readiness {
    fn default() -> Self {
        Self::new()
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
