//! Response bodies and the API error type.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use telemetry::{ComponentHealthReport, HealthStatus, MetricsSnapshot};
use tide_core::{AlertRecord, RiskVerdict, TideKind, TideObservation};
use tracing::error;

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub store_connected: bool,
    pub components: Vec<ComponentHealthReport>,
    pub metrics: MetricsSnapshot,
}

/// Result of a manual sync.
#[derive(Debug, Serialize, Deserialize)]
pub struct SyncResponse {
    pub message: String,
    pub count: usize,
}

impl SyncResponse {
    pub fn completed(count: usize) -> Self {
        Self {
            message: "Sync completed".to_string(),
            count,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TideResponse {
    pub kind: TideKind,
    pub time: DateTime<FixedOffset>,
    pub height_m: f64,
    pub height_ft: f64,
}

impl TideResponse {
    pub fn new(obs: &TideObservation, zone: FixedOffset) -> Self {
        Self {
            kind: obs.kind,
            time: obs.occurs_at.with_timezone(&zone),
            height_m: obs.height_m,
            height_ft: obs.height_ft,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TideDayResponse {
    pub location: String,
    pub date: NaiveDate,
    pub tides: Vec<TideResponse>,
}

/// An alert with its flood-risk verdict.
#[derive(Debug, Serialize, Deserialize)]
pub struct AlertResponse {
    pub id: String,
    pub identifier: String,
    pub event: String,
    pub headline: String,
    pub description: String,
    pub area_description: String,
    pub severity: String,
    pub sent: DateTime<FixedOffset>,
    pub effective: DateTime<FixedOffset>,
    pub expires: DateTime<FixedOffset>,
    pub tidal_flood_risk: RiskVerdict,
}

impl AlertResponse {
    pub fn new(alert: AlertRecord, zone: FixedOffset, risk: RiskVerdict) -> Self {
        Self {
            sent: alert.sent.with_timezone(&zone),
            effective: alert.effective.with_timezone(&zone),
            expires: alert.expires.with_timezone(&zone),
            id: alert.id,
            identifier: alert.identifier,
            event: alert.event,
            headline: alert.headline,
            description: alert.description,
            area_description: alert.area_description,
            severity: alert.severity,
            tidal_flood_risk: risk,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

/// Error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
        }
    }
}

/// API error carrying a stable code.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ErrorResponse,
}

impl ApiError {
    pub fn with_code(status: StatusCode, code: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            status,
            response: ErrorResponse::new(msg, code),
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::with_code(StatusCode::BAD_REQUEST, "VALID_001", msg)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl From<tide_core::Error> for ApiError {
    fn from(err: tide_core::Error) -> Self {
        let status =
            StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            error!(code = err.error_code().code(), error = %err, "Request failed");
        }
        Self::with_code(status, err.error_code().code(), err.to_string())
    }
}
