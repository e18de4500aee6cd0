use crate::startup::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

/// Liveness probe.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "tour-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Readiness probe: the database must answer.
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.pipeline.persister().store().health_check().await {
        Ok(_) => (StatusCode::OK, Json(json!({ "status": "ready" }))),
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable", "error": e.to_string() })),
            )
        }
    }
}

pub async fn metrics() -> impl IntoResponse {
    crate::services::metrics::get_metrics()
}
