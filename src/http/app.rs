//! Default application router.
//!
//! Business routes live outside this crate; the binary mounts this minimal
//! router so the process answers something on `/` out of the box.

use axum::{routing::get, Json, Router};
use serde::Serialize;

#[derive(Serialize)]
pub struct ServiceInfo {
    pub service: &'static str,
    pub version: &'static str,
    pub message: &'static str,
}

pub fn default_router() -> Router {
    Router::new().route("/", get(get_root))
}

async fn get_root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        message: "server is running",
    })
}
