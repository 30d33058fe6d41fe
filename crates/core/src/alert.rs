//! Weather alerts as seen by the risk correlator and the alert listing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The part of an alert the correlator needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertWindow {
    pub effective: DateTime<Utc>,
    pub expires: DateTime<Utc>,
    pub description: String,
}

impl AlertWindow {
    pub fn new(
        effective: DateTime<Utc>,
        expires: DateTime<Utc>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            effective,
            expires,
            description: description.into(),
        }
    }

    /// Reject windows that end before they start.
    pub fn validate(&self) -> Result<()> {
        if self.effective > self.expires {
            return Err(Error::validation(format!(
                "alert window is inverted: effective {} is after expires {}",
                self.effective, self.expires
            )));
        }
        Ok(())
    }

    /// Whether `at` falls inside the window (both ends inclusive).
    pub fn is_active_at(&self, at: DateTime<Utc>) -> bool {
        self.effective <= at && at <= self.expires
    }
}

/// A stored weather alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRecord {
    pub id: String,
    pub identifier: String,
    pub event: String,
    pub headline: String,
    pub description: String,
    pub area_description: String,
    pub severity: String,
    pub sent: DateTime<Utc>,
    pub effective: DateTime<Utc>,
    pub expires: DateTime<Utc>,
}

impl AlertRecord {
    pub fn window(&self) -> AlertWindow {
        AlertWindow::new(self.effective, self.expires, self.description.clone())
    }
}
