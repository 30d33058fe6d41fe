//! Health check endpoints.

use axum::{extract::State, http::StatusCode, Json};
use telemetry::{health, metrics};
use tide_store::check_connection;

use crate::response::HealthResponse;
use crate::state::AppState;

/// GET /health - Full health report. Probes the store on every call.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let store_connected = check_connection(&state.store).await;
    if store_connected {
        health().store.set_healthy();
    } else {
        health().store.set_unhealthy("store connection check failed");
    }

    let report = health().report();

    Json(HealthResponse {
        status: report.status,
        store_connected,
        components: report.components,
        metrics: metrics().snapshot(),
    })
}

/// GET /health/ready - Readiness probe (can accept traffic).
pub async fn ready_handler() -> StatusCode {
    if health().is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /health/live - Liveness probe (service is running).
pub async fn live_handler() -> StatusCode {
    if health().is_alive() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
