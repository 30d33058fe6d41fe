//! Tide observations.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::civil::utc_midnight;

/// Default station whose predictions are ingested.
pub const STATION_LOCATION: &str = "Sekupang";

/// Heights at or beyond this magnitude, in meters, are not real tides.
pub const MAX_PLAUSIBLE_HEIGHT_M: f64 = 20.0;

/// Whether `height_m` can be a tide at all. Mirrors the `tide_data` CHECK.
pub fn is_plausible_height(height_m: f64) -> bool {
    height_m.is_finite() && height_m.abs() < MAX_PLAUSIBLE_HEIGHT_M
}

/// Kind of tidal extreme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TideKind {
    High,
    Low,
}

impl TideKind {
    /// Storage / wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Low => "low",
        }
    }

    /// Parse the storage representation.
    pub fn from_db(value: &str) -> Option<Self> {
        match value {
            "high" => Some(Self::High),
            "low" => Some(Self::Low),
            _ => None,
        }
    }

    /// Classify a free-text table label ("High Tide", "low tide", ...).
    ///
    /// Case-insensitive substring match; "high" wins if both appear.
    pub fn classify(label: &str) -> Option<Self> {
        let label = label.to_lowercase();
        if label.contains("high") {
            Some(Self::High)
        } else if label.contains("low") {
            Some(Self::Low)
        } else {
            None
        }
    }
}

impl std::fmt::Display for TideKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A predicted tidal extreme for one station.
///
/// `date` is the logical day of the station's table and is independent of
/// the timezone used for `occurs_at`, which is always UTC. Uniqueness of
/// (location, date, occurs_at, kind) is kept by replacing whole days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TideObservation {
    pub location: String,
    pub date: NaiveDate,
    pub kind: TideKind,
    pub occurs_at: DateTime<Utc>,
    pub height_m: f64,
    pub height_ft: f64,
}

impl TideObservation {
    /// The logical date as UTC midnight, the absolute reference used for storage.
    pub fn date_utc(&self) -> DateTime<Utc> {
        utc_midnight(self.date)
    }

    pub fn is_high(&self) -> bool {
        self.kind == TideKind::High
    }
}
