use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

use crate::health::state::{Readiness, ReadinessSnapshot};

#[derive(Serialize)]
pub struct Liveness {
    pub status: &'static str,
    pub version: &'static str,
}

/// `/health/live` and `/health/ready`, bound to `readiness`.
pub fn health_routes(readiness: Readiness) -> Router {
    Router::new()
        .route("/health/live", get(get_live))
        .route("/health/ready", get(get_ready))
        .with_state(readiness)
}

pub async fn get_live() -> Json<Liveness> {
    Json(Liveness {
        status: "alive",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// 200 once the dependency is authenticated, 503 before that or when degraded.
pub async fn get_ready(
    State(readiness): State<Readiness>,
) -> (StatusCode, Json<ReadinessSnapshot>) {
    let snapshot = readiness.snapshot();
    let status = if snapshot.state.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json((*snapshot).clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::ReadinessState;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    async fn ready_status(readiness: &Readiness) -> (StatusCode, serde_json::Value) {
        let response = health_routes(readiness.clone())
            .oneshot(Request::get("/health/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn ready_reports_unavailable_until_ready() {
        let readiness = Readiness::new();
        let (status, body) = ready_status(&readiness).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["state"], "STARTING");

        readiness.transition(ReadinessState::Listening, None).unwrap();
        readiness.transition(ReadinessState::Ready, None).unwrap();
        let (status, body) = ready_status(&readiness).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["state"], "READY");
    }

    #[tokio::test]
    async fn degraded_includes_error() {
        let readiness = Readiness::new();
        readiness.transition(ReadinessState::Listening, None).unwrap();
        readiness
            .transition(ReadinessState::Degraded, Some("ECONNREFUSED".into()))
            .unwrap();

        let (status, body) = ready_status(&readiness).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["state"], "DEGRADED");
        assert_eq!(body["error"], "ECONNREFUSED");
    }

    #[tokio::test]
    async fn live_is_always_ok() {
        let response = health_routes(Readiness::new())
            .oneshot(Request::get("/health/live").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
