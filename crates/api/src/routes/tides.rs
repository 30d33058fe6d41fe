//! Tide endpoints.

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use tide_core::{civil_now, TideKind};
use tide_store::{TideQuery, TideReader};
use tracing::info;

use crate::extractors::DisplayZone;
use crate::response::{ApiError, SyncResponse, TideDayResponse, TideResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TideParams {
    /// Logical day as `YYYY-MM-DD`; defaults to today in the station's civil time
    pub date: Option<String>,
    pub kind: Option<TideKind>,
}

fn parse_day(raw: Option<&str>) -> Result<NaiveDate, ApiError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(civil_now().date_naive()),
        Some(day) => NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|_| {
            ApiError::bad_request(format!("date must look like 2025-12-04, got {day:?}"))
        }),
    }
}

/// GET /tides - Stored tides for one day, earliest first.
pub async fn list_handler(
    State(state): State<AppState>,
    DisplayZone(zone): DisplayZone,
    Query(params): Query<TideParams>,
) -> Result<Json<TideDayResponse>, ApiError> {
    let date = parse_day(params.date.as_deref())?;

    let mut query = TideQuery::new().location(state.location.clone()).date(date);
    if let Some(kind) = params.kind {
        query = query.kind(kind);
    }

    let tides = state.store.find_tides(&query).await?;

    Ok(Json(TideDayResponse {
        location: state.location.clone(),
        date,
        tides: tides.iter().map(|t| TideResponse::new(t, zone)).collect(),
    }))
}

/// POST /tides/sync - Run one sync cycle now.
pub async fn sync_handler(State(state): State<AppState>) -> Result<Json<SyncResponse>, ApiError> {
    let count = state.sync.trigger_sync().await?;
    info!(count, "Manual tide sync finished");
    Ok(Json(SyncResponse::completed(count)))
}
