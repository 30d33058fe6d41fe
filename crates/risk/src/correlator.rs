//! Tidal flood risk for weather alerts.
//!
//! Heavy rain only matters if a high tide above the threshold falls inside
//! the alert window or the buffer after it.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use telemetry::metrics;
use tide_core::{AlertWindow, PeakTide, RiskLevel, RiskPolicy, RiskVerdict, TideKind};
use tide_store::{TideOrder, TideQuery, TideReader};
use tracing::{debug, error, warn};

/// Classifies alerts against stored tides.
#[derive(Clone)]
pub struct RiskCorrelator {
    tides: Arc<dyn TideReader>,
    policy: RiskPolicy,
}

impl RiskCorrelator {
    pub fn new(tides: Arc<dyn TideReader>, policy: RiskPolicy) -> Self {
        Self { tides, policy }
    }

    pub fn policy(&self) -> &RiskPolicy {
        &self.policy
    }

    /// Assess one alert. Never fails: a storage error becomes
    /// [`RiskLevel::Unknown`].
    pub async fn assess(&self, alert: &AlertWindow) -> RiskVerdict {
        metrics().assessments.inc();

        if !self.policy.mentions_rain(&alert.description) {
            return RiskVerdict::none(false, "No heavy rain expected");
        }

        let threshold = self.policy.height_threshold_m;
        let Some(window_end) = self.window_end(alert) else {
            metrics().assessments_unknown.inc();
            warn!(
                expires = %alert.expires,
                buffer_secs = self.policy.buffer_secs,
                "Risk buffer overflows the calendar"
            );
            return RiskVerdict::unknown("Unable to determine tidal flood risk");
        };

        let query = TideQuery::new()
            .kind(TideKind::High)
            .above_height(threshold)
            .between(alert.effective, window_end)
            .order(TideOrder::HeightDesc)
            .limit(1);

        let peak = match self.tides.find_tides(&query).await {
            Ok(candidates) => candidates.into_iter().next(),
            Err(e) => {
                metrics().assessments_unknown.inc();
                error!(
                    effective = %alert.effective,
                    expires = %alert.expires,
                    error = %e,
                    "Tide lookup failed during risk assessment"
                );
                return RiskVerdict::unknown("Unable to determine tidal flood risk");
            }
        };

        let Some(peak) = peak else {
            debug!(effective = %alert.effective, "Heavy rain without a qualifying high tide");
            return RiskVerdict::none(
                true,
                format!(
                    "No tidal flood risk: No high tide (>{threshold}m) during or near alert period"
                ),
            );
        };

        if peak.occurs_at <= alert.expires {
            metrics().risk_high.inc();
            RiskVerdict::at_risk(
                RiskLevel::High,
                PeakTide::from(&peak),
                format!(
                    "HIGH RISK: Heavy rain expected during high tide (>{threshold}m) - Flash flood possible!"
                ),
            )
        } else {
            metrics().risk_moderate.inc();
            RiskVerdict::at_risk(
                RiskLevel::Moderate,
                PeakTide::from(&peak),
                format!(
                    "MODERATE RISK: Heavy rain with high tide (>{threshold}m) shortly after - Sea level rising during alert period"
                ),
            )
        }
    }

    /// `expires + buffer`, or `None` when that is not a representable instant.
    fn window_end(&self, alert: &AlertWindow) -> Option<DateTime<Utc>> {
        let secs = i64::try_from(self.policy.buffer_secs).ok()?;
        alert.expires.checked_add_signed(Duration::try_seconds(secs)?)
    }
}
