use crate::models::WelcomeResponse;
use axum::{response::IntoResponse, Json};
use serde_json::json;

pub async fn root() -> Json<WelcomeResponse> {
    Json(WelcomeResponse::default())
}

/// Liveness probe. The service has no backing store, so it is healthy
/// whenever it can answer.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "assignment-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub async fn metrics() -> impl IntoResponse {
    crate::services::metrics::get_metrics()
}
