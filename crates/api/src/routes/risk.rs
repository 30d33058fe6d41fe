//! Ad-hoc risk assessment.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tide_core::{AlertWindow, RiskVerdict};

use crate::response::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AssessRequest {
    pub effective: DateTime<Utc>,
    pub expires: DateTime<Utc>,
    pub description: String,
}

/// POST /risk/assess - Assess an alert window that is not stored.
pub async fn assess_handler(
    State(state): State<AppState>,
    Json(req): Json<AssessRequest>,
) -> Result<Json<RiskVerdict>, ApiError> {
    let window = AlertWindow::new(req.effective, req.expires, req.description);
    window.validate()?;

    Ok(Json(state.correlator.assess(&window).await))
}
