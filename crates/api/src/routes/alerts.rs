//! Alert listing with flood risk.

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use tide_store::AlertFilter;

use crate::extractors::{DisplayZone, Pagination};
use crate::response::{AlertResponse, ApiError, Paginated, PaginationMeta};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AlertParams {
    /// `true` keeps only alerts in force now
    pub active: Option<String>,
    /// Place named in the alert description
    pub location: Option<String>,
}

/// GET /alerts - Home-area alerts, newest first, each with its risk verdict.
pub async fn list_handler(
    State(state): State<AppState>,
    pagination: Pagination,
    DisplayZone(zone): DisplayZone,
    Query(params): Query<AlertParams>,
) -> Result<Json<Paginated<AlertResponse>>, ApiError> {
    let mut filter = AlertFilter::new().area(state.alert_area.clone());
    if params.active.as_deref() == Some("true") {
        filter = filter.active_at(Utc::now());
    }
    if let Some(location) = params.location.filter(|l| !l.trim().is_empty()) {
        filter = filter.location(location.trim());
    }

    let (alerts, total) = state
        .store
        .query_alerts(&filter, pagination.limit, pagination.offset())
        .await?;

    let mut data = Vec::with_capacity(alerts.len());
    for alert in alerts {
        let verdict = state.correlator.assess(&alert.window()).await;
        data.push(AlertResponse::new(alert, zone, verdict));
    }

    Ok(Json(Paginated {
        data,
        pagination: PaginationMeta {
            page: pagination.page,
            limit: pagination.limit,
            total,
            total_pages: pagination.total_pages(total),
        },
    }))
}
