//! Correlator tests against tides stored by a real sync.

use std::sync::Arc;

use chrono::Duration;
use integration_tests::{fixtures, mocks::FailingTideReader, setup::TestContext};
use risk::RiskCorrelator;
use tide_core::{AlertWindow, RiskLevel, RiskPolicy};

#[tokio::test]
async fn test_rain_over_peak_is_high_risk() {
    let ctx = TestContext::synced().await;

    let verdict = ctx
        .correlator
        .assess(&fixtures::rain_during_peak("a1").window())
        .await;

    assert_eq!(verdict.level, RiskLevel::High);
    assert!(verdict.has_risk);
    assert!(verdict.heavy_rain_detected);
    let peak = verdict.peak_tide.unwrap();
    assert_eq!(peak.occurs_at, fixtures::peak_time());
    assert_eq!(peak.height_m, 2.8);
}

#[tokio::test]
async fn test_peak_inside_buffer_is_moderate() {
    let ctx = TestContext::synced().await;

    let verdict = ctx
        .correlator
        .assess(&fixtures::rain_before_peak("a2").window())
        .await;

    assert_eq!(verdict.level, RiskLevel::Moderate);
    assert!(verdict.has_risk);
}

#[tokio::test]
async fn test_no_rain_means_no_risk() {
    let ctx = TestContext::synced().await;

    let verdict = ctx
        .correlator
        .assess(&fixtures::wind_alert("a3").window())
        .await;

    assert_eq!(verdict.level, RiskLevel::None);
    assert!(!verdict.heavy_rain_detected);
    assert!(verdict.peak_tide.is_none());
}

#[tokio::test]
async fn test_rain_without_tide_data_is_no_risk() {
    let ctx = TestContext::new().await;

    let verdict = ctx
        .correlator
        .assess(&fixtures::rain_during_peak("a4").window())
        .await;

    assert_eq!(verdict.level, RiskLevel::None);
    assert!(verdict.heavy_rain_detected);
    assert!(!verdict.has_risk);
}

#[tokio::test]
async fn test_buffer_is_configurable() {
    let ctx = TestContext::synced().await;
    let strict = RiskCorrelator::new(
        ctx.store.clone(),
        RiskPolicy {
            buffer_secs: 1800,
            ..RiskPolicy::default()
        },
    );

    // Ends an hour before the peak, so a 30 minute buffer misses it.
    let verdict = strict
        .assess(&fixtures::rain_before_peak("a5").window())
        .await;
    assert_eq!(verdict.level, RiskLevel::None);
}

#[tokio::test]
async fn test_unreadable_store_is_unknown() {
    let correlator = RiskCorrelator::new(Arc::new(FailingTideReader), RiskPolicy::default());
    let window = AlertWindow::new(
        fixtures::peak_time() - Duration::hours(1),
        fixtures::peak_time() + Duration::hours(1),
        "HEAVY RAIN over Sekupang",
    );

    let verdict = correlator.assess(&window).await;

    assert_eq!(verdict.level, RiskLevel::Unknown);
    assert!(!verdict.has_risk);
    assert_eq!(verdict.message, "Unable to determine tidal flood risk");
}
