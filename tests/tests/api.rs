//! HTTP surface tests.

use axum::http::StatusCode;
use integration_tests::{fixtures, setup::TestContext};
use serde_json::{json, Value};

/// Test /health endpoint returns proper structure
#[tokio::test]
async fn test_health_endpoint_structure() {
    let ctx = TestContext::new().await;
    let server = ctx.server();

    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["store_connected"], true);
    assert!(body["components"].is_array());
    assert!(body["metrics"].is_object());

    let status = body["status"].as_str().unwrap_or("");
    assert!(
        ["healthy", "degraded", "unhealthy"].contains(&status),
        "unexpected status {status:?}"
    );
}

/// Test /health/live endpoint always returns 200 when service is running
#[tokio::test]
async fn test_live_endpoint() {
    let ctx = TestContext::new().await;
    ctx.server().get("/health/live").await.assert_status_ok();
}

/// Readiness follows the store, which /health has just checked
#[tokio::test]
async fn test_ready_after_health_check() {
    let ctx = TestContext::new().await;
    let server = ctx.server();

    server.get("/health").await.assert_status_ok();
    server.get("/health/ready").await.assert_status_ok();
}

#[tokio::test]
async fn test_manual_sync_reports_count() {
    let ctx = TestContext::new().await;

    let response = ctx.server().post("/tides/sync").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["message"], "Sync completed");
    assert_eq!(body["count"], 4);
}

#[tokio::test]
async fn test_manual_sync_surfaces_source_errors() {
    let ctx = TestContext::new().await;
    ctx.source.set_empty();

    let response = ctx.server().post("/tides/sync").await;
    response.assert_status(StatusCode::BAD_GATEWAY);

    let body: Value = response.json();
    assert_eq!(body["code"], "EMPTY_001");
}

#[tokio::test]
async fn test_list_tides_for_day() {
    let ctx = TestContext::synced().await;

    let response = ctx
        .server()
        .get("/tides")
        .add_query_param("date", "2025-12-04")
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["location"], "Sekupang");
    assert_eq!(body["date"], "2025-12-04");

    let tides = body["tides"].as_array().unwrap();
    assert_eq!(tides.len(), 4);
    assert_eq!(tides[0]["kind"], "low");
    assert_eq!(tides[1]["time"], "2025-12-04T02:27:00+00:00");
    assert_eq!(tides[1]["height_m"], 2.8);
}

#[tokio::test]
async fn test_list_tides_in_requested_zone_and_kind() {
    let ctx = TestContext::synced().await;

    let response = ctx
        .server()
        .get("/tides")
        .add_query_param("date", "2025-12-04")
        .add_query_param("kind", "high")
        .add_query_param("timezone", "+07:00")
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    let tides = body["tides"].as_array().unwrap();
    assert_eq!(tides.len(), 2);
    assert_eq!(tides[0]["time"], "2025-12-04T09:27:00+07:00");
    assert_eq!(tides[1]["time"], "2025-12-04T21:55:00+07:00");
}

#[tokio::test]
async fn test_bad_timezone_is_rejected() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server()
        .get("/tides")
        .add_query_param("timezone", "Asia/Jakarta")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(body["code"], "VALID_001");
}

#[tokio::test]
async fn test_malformed_date_is_rejected_with_code() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server()
        .get("/tides")
        .add_query_param("date", "2025-12-40")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(body["code"], "VALID_001");
}

#[tokio::test]
async fn test_alerts_carry_risk_verdicts() {
    let ctx = TestContext::synced().await;
    ctx.seed_alerts(&[
        fixtures::rain_before_peak("early"),
        fixtures::rain_during_peak("peak"),
    ])
    .await;

    let response = ctx.server().get("/alerts").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["pagination"]["total"], 2);
    assert_eq!(body["pagination"]["page"], 1);
    assert_eq!(body["pagination"]["limit"], 20);

    let data = body["data"].as_array().unwrap();
    assert_eq!(data[0]["id"], "peak");
    assert_eq!(data[0]["tidal_flood_risk"]["level"], "high");
    assert_eq!(data[0]["tidal_flood_risk"]["peak_tide"]["height_m"], 2.8);
    assert_eq!(data[1]["id"], "early");
    assert_eq!(data[1]["tidal_flood_risk"]["level"], "moderate");
}

#[tokio::test]
async fn test_alerts_location_filter_and_paging() {
    let ctx = TestContext::synced().await;
    ctx.seed_alerts(&[
        fixtures::rain_before_peak("early"),
        fixtures::rain_during_peak("peak"),
        fixtures::wind_alert("wind"),
    ])
    .await;
    let server = ctx.server();

    let body: Value = server
        .get("/alerts")
        .add_query_param("location", "Sekupang")
        .await
        .json();
    assert_eq!(body["pagination"]["total"], 2);

    let body: Value = server
        .get("/alerts")
        .add_query_param("page", "2")
        .add_query_param("limit", "2")
        .await
        .json();
    assert_eq!(body["pagination"]["total"], 3);
    assert_eq!(body["pagination"]["total_pages"], 2);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    // Out-of-range limits fall back to the default.
    let body: Value = server
        .get("/alerts")
        .add_query_param("limit", "500")
        .await
        .json();
    assert_eq!(body["pagination"]["limit"], 20);
}

#[tokio::test]
async fn test_assess_window() {
    let ctx = TestContext::synced().await;

    let response = ctx
        .server()
        .post("/risk/assess")
        .json(&json!({
            "effective": "2025-12-04T01:00:00Z",
            "expires": "2025-12-04T04:00:00Z",
            "description": "Heavy rain over Sekupang"
        }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["level"], "high");
    assert_eq!(body["has_risk"], true);
    assert_eq!(body["peak_tide"]["occurs_at"], "2025-12-04T02:27:00Z");
}

#[tokio::test]
async fn test_assess_rejects_inverted_window() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server()
        .post("/risk/assess")
        .json(&json!({
            "effective": "2025-12-04T04:00:00Z",
            "expires": "2025-12-04T01:00:00Z",
            "description": "Heavy rain"
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(body["code"], "VALID_001");
}
