//! Risk verdict types shared by the correlator and the API.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::tide::{TideKind, TideObservation};

/// Tidal flood risk level attached to an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    None,
    Unknown,
    Moderate,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Unknown => "unknown",
            Self::Moderate => "moderate",
            Self::High => "high",
        }
    }
}

/// The tide that drove a verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakTide {
    pub kind: TideKind,
    pub occurs_at: DateTime<Utc>,
    pub height_m: f64,
    pub height_ft: f64,
}

impl From<&TideObservation> for PeakTide {
    fn from(obs: &TideObservation) -> Self {
        Self {
            kind: obs.kind,
            occurs_at: obs.occurs_at,
            height_m: obs.height_m,
            height_ft: obs.height_ft,
        }
    }
}

/// Outcome of correlating one alert with stored tides.
///
/// `has_risk` is true exactly when `level` is High or Moderate, and only
/// those levels carry a `peak_tide`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskVerdict {
    pub has_risk: bool,
    pub level: RiskLevel,
    pub heavy_rain_detected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peak_tide: Option<PeakTide>,
    pub message: String,
}

impl RiskVerdict {
    pub fn none(heavy_rain_detected: bool, message: impl Into<String>) -> Self {
        Self {
            has_risk: false,
            level: RiskLevel::None,
            heavy_rain_detected,
            peak_tide: None,
            message: message.into(),
        }
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self {
            has_risk: false,
            level: RiskLevel::Unknown,
            heavy_rain_detected: true,
            peak_tide: None,
            message: message.into(),
        }
    }

    pub fn at_risk(level: RiskLevel, peak: PeakTide, message: impl Into<String>) -> Self {
        Self {
            has_risk: true,
            level,
            heavy_rain_detected: true,
            peak_tide: Some(peak),
            message: message.into(),
        }
    }
}

/// Tunables for the correlator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskPolicy {
    /// Tides must be strictly above this height to count.
    #[serde(default = "default_height_threshold_m")]
    pub height_threshold_m: f64,

    /// How long after the alert expires a high tide still matters.
    #[serde(default = "default_buffer_secs")]
    pub buffer_secs: u64,

    /// Case-insensitive phrase marking an alert as heavy rain.
    #[serde(default = "default_rain_phrase")]
    pub rain_phrase: String,
}

fn default_height_threshold_m() -> f64 {
    2.6
}

fn default_buffer_secs() -> u64 {
    2 * 60 * 60
}

fn default_rain_phrase() -> String {
    "heavy rain".to_string()
}

impl Default for RiskPolicy {
    fn default() -> Self {
        Self {
            height_threshold_m: default_height_threshold_m(),
            buffer_secs: default_buffer_secs(),
            rain_phrase: default_rain_phrase(),
        }
    }
}

/// Longest accepted buffer after an alert expires.
pub const MAX_BUFFER_SECS: u64 = 7 * 24 * 60 * 60;

impl RiskPolicy {
    /// Reject policies the correlator cannot apply.
    pub fn validate(&self) -> Result<()> {
        if !self.height_threshold_m.is_finite() {
            return Err(Error::config(format!(
                "risk height threshold must be a finite number, got {}",
                self.height_threshold_m
            )));
        }
        if self.buffer_secs > MAX_BUFFER_SECS {
            return Err(Error::config(format!(
                "risk buffer must be at most {MAX_BUFFER_SECS}s, got {}s",
                self.buffer_secs
            )));
        }
        if self.rain_phrase.trim().is_empty() {
            return Err(Error::config("risk rain phrase must not be empty"));
        }
        Ok(())
    }

    pub fn buffer(&self) -> Duration {
        Duration::from_secs(self.buffer_secs)
    }

    /// Case-insensitive rain phrase check.
    pub fn mentions_rain(&self, description: &str) -> bool {
        description
            .to_lowercase()
            .contains(&self.rain_phrase.to_lowercase())
    }
}
