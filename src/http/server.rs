//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Mount the application router (opaque to this crate)
//! - Mount health endpoints when enabled
//! - Wire up middleware (request ID, tracing, timeout)
//! - Serve on an already bound listener until shutdown
//!
//! The router is never gated on readiness: requests are dispatched as soon
//! as the listener is handed over.

use std::net::SocketAddr;
use std::time::Duration;

use axum::{body::Body, http::Request, Router};
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ServiceConfig;
use crate::health::{health_routes, Readiness};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer, X_REQUEST_ID};
use crate::net::BoundListener;

/// HTTP server wrapping the application router.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server around `app`.
    pub fn new(config: &ServiceConfig, app: Router, readiness: Readiness) -> Self {
        Self {
            router: Self::build_router(config, app, readiness),
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServiceConfig, app: Router, readiness: Readiness) -> Router {
        let router = if config.health.enabled {
            app.merge(health_routes(readiness))
        } else {
            app
        };

        router.layer(
            ServiceBuilder::new()
                .layer(set_request_id_layer())
                .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                    let request_id = request
                        .headers()
                        .get(X_REQUEST_ID)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("unknown");
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        path = %request.uri().path(),
                        request_id = %request_id,
                    )
                }))
                .layer(propagate_request_id_layer())
                .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
        )
    }

    /// The fully layered router, without serving it.
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Serve on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: BoundListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr();
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener.into_inner(), app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
