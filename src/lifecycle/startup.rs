//! Startup orchestration.
//!
//! # Responsibilities
//! - Bind the listener and start serving immediately
//! - Probe the backing data store once the socket is bound
//! - Record the outcome as `Ready` or `Degraded` and emit it
//!
//! # Design Decisions
//! - Bind failures are fatal and happen before any probe
//! - Probe failures are absorbed into readiness; the listener keeps serving
//! - `StartupOrchestrator::run` consumes the orchestrator: one run per process

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use axum::Router;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time;

use crate::config::{ServiceConfig, StartupConfig};
use crate::dependency::{DependencyClient, DependencyError};
use crate::health::{Readiness, ReadinessState, StartupSignal};
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;
use crate::net::{self, BindError};
use crate::observability::metrics;
use crate::resilience::RetryPolicy;

/// Sequences the dependency probe after bind and records readiness.
#[derive(Debug)]
pub struct StartupOrchestrator {
    readiness: Readiness,
    probe_timeout: Duration,
    retry: RetryPolicy,
}

impl StartupOrchestrator {
    pub fn new(readiness: Readiness, probe_timeout: Duration, retry: RetryPolicy) -> Self {
        Self {
            readiness,
            probe_timeout,
            retry,
        }
    }

    pub fn from_config(readiness: Readiness, config: &StartupConfig) -> Self {
        Self::new(
            readiness,
            config.probe_timeout(),
            RetryPolicy::from_config(config),
        )
    }

    /// Run once, after the listener on `listener_addr` is bound.
    ///
    /// Never fails: a dependency error ends in `Degraded`.
    pub async fn run<C: DependencyClient>(
        self,
        listener_addr: SocketAddr,
        client: &C,
    ) -> ReadinessState {
        self.advance(ReadinessState::Listening, None);
        self.emit(StartupSignal::ListenerActive {
            address: listener_addr,
        });

        match self.probe(client).await {
            Ok(()) => {
                self.advance(ReadinessState::Ready, None);
                self.emit(StartupSignal::DependencyReady);
            }
            Err(e) => {
                let error = e.to_string();
                self.advance(ReadinessState::Degraded, Some(error.clone()));
                self.emit(StartupSignal::DependencyUnreachable { error });
            }
        }

        self.readiness.state()
    }

    async fn probe<C: DependencyClient>(&self, client: &C) -> Result<(), DependencyError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            self.readiness.record_attempt();

            let started = Instant::now();
            let result = match time::timeout(self.probe_timeout, client.authenticate()).await {
                Ok(result) => result,
                Err(_) => Err(DependencyError::Timeout(self.probe_timeout)),
            };
            metrics::record_probe(result.is_ok(), started.elapsed());

            match result {
                Ok(()) => {
                    tracing::debug!(attempt, elapsed = ?started.elapsed(), "Dependency probe succeeded");
                    return Ok(());
                }
                Err(e) if self.retry.allows_retry_after(attempt) => {
                    let delay = self.retry.delay_after(attempt);
                    tracing::warn!(
                        attempt,
                        max_attempts = self.retry.max_attempts,
                        delay = ?delay,
                        error = %e,
                        "Dependency probe failed, retrying"
                    );
                    time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn advance(&self, next: ReadinessState, error: Option<String>) {
        match self.readiness.transition(next, error) {
            Ok(snapshot) => metrics::record_readiness(snapshot.state),
            Err(e) => tracing::error!(error = %e, "Readiness transition rejected"),
        }
    }

    fn emit(&self, signal: StartupSignal) {
        match &signal {
            StartupSignal::DependencyUnreachable { .. } => tracing::warn!("{}", signal),
            _ => tracing::info!("{}", signal),
        }
        self.readiness.emit(signal);
    }
}

/// Error surfaced by a running service.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),

    #[error("service task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// A bound, serving process with its startup probe in flight.
#[derive(Debug)]
pub struct Service {
    local_addr: SocketAddr,
    readiness: Readiness,
    server: JoinHandle<Result<(), std::io::Error>>,
    startup: Option<JoinHandle<ReadinessState>>,
}

impl Service {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn readiness(&self) -> &Readiness {
        &self.readiness
    }

    /// Wait until the probe has settled on `Ready` or `Degraded`.
    pub async fn startup_complete(&mut self) -> Result<ReadinessState, ServiceError> {
        match self.startup.take() {
            Some(handle) => Ok(handle.await?),
            None => Ok(self.readiness.state()),
        }
    }

    /// Wait for the server to stop after shutdown is triggered.
    pub async fn wait(mut self) -> Result<(), ServiceError> {
        let served = self.server.await;
        if let Some(startup) = self.startup.take() {
            // Shutdown while the probe is still pending.
            startup.abort();
        }
        served??;
        Ok(())
    }
}

/// Bind, start serving and launch the readiness probe.
///
/// Returns once the listener is bound; the probe continues in the
/// background. On bind failure `client` is dropped without being used.
pub async fn start<C>(
    config: &ServiceConfig,
    app: Router,
    client: C,
    readiness: Readiness,
    shutdown: &Shutdown,
) -> Result<Service, BindError>
where
    C: DependencyClient + 'static,
{
    let listener = net::bind(&config.listener).await?;
    let local_addr = listener.local_addr();

    let server = HttpServer::new(config, app, readiness.clone());
    let server = tokio::spawn(server.run(listener, shutdown.subscribe()));

    let orchestrator = StartupOrchestrator::from_config(readiness.clone(), &config.startup);
    let startup = tokio::spawn(async move { orchestrator.run(local_addr, &client).await });

    Ok(Service {
        local_addr,
        readiness,
        server,
        startup: Some(startup),
    })
}
