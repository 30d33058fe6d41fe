//! Shared application state.

use std::sync::Arc;

use risk::RiskCorrelator;
use tide_core::STATION_LOCATION;
use tide_store::TideStore;
use worker::TideSyncWorker;

/// Home area whose alerts are listed.
pub const DEFAULT_ALERT_AREA: &str = "Kep. Riau";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Tide and alert store
    pub store: Arc<TideStore>,
    /// On-demand tide sync
    pub sync: Arc<TideSyncWorker>,
    /// Flood risk for alerts
    pub correlator: RiskCorrelator,
    /// `area_description` of listed alerts
    pub alert_area: String,
    /// Station served by `/tides`
    pub location: String,
}

impl AppState {
    pub fn new(store: Arc<TideStore>, sync: Arc<TideSyncWorker>, correlator: RiskCorrelator) -> Self {
        Self {
            store,
            sync,
            correlator,
            alert_area: DEFAULT_ALERT_AREA.to_string(),
            location: STATION_LOCATION.to_string(),
        }
    }

    pub fn with_alert_area(mut self, area: impl Into<String>) -> Self {
        self.alert_area = area.into();
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }
}
