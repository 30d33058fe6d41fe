//! Ingestion pipeline tests: page → batch → day replace → queries.

use std::sync::Arc;
use std::time::Duration;

use integration_tests::{fixtures, setup::TestContext};
use tide_core::{Error, TideKind, STATION_LOCATION};
use tide_store::{TideOrder, TideQuery, TideReader};
use worker::{Cadence, PeriodicScheduler, SchedulerState};

/// A synced day is readable in time order with its UTC instants.
#[tokio::test]
async fn test_sync_stores_parsed_day() {
    let ctx = TestContext::new().await;

    let count = ctx.sync.trigger_sync().await.unwrap();
    assert_eq!(count, 4);

    let tides = ctx
        .store
        .find_tides(
            &TideQuery::new()
                .location(STATION_LOCATION)
                .date(fixtures::station_date()),
        )
        .await
        .unwrap();

    assert_eq!(tides.len(), 4);
    assert!(tides.windows(2).all(|w| w[0].occurs_at <= w[1].occurs_at));
    assert_eq!(tides[1].kind, TideKind::High);
    assert_eq!(tides[1].occurs_at, fixtures::peak_time());
    assert!(tides.iter().all(|t| t.date == fixtures::station_date()));
}

/// Syncing the same page twice leaves one copy of the day.
#[tokio::test]
async fn test_resync_is_idempotent() {
    let ctx = TestContext::synced().await;

    ctx.sync.trigger_sync().await.unwrap();
    ctx.sync.trigger_sync().await.unwrap();

    let stored = ctx
        .store
        .count_day(STATION_LOCATION, fixtures::station_date())
        .await
        .unwrap();
    assert_eq!(stored, 4);
}

/// A newer page for the same day replaces every row of that day.
#[tokio::test]
async fn test_new_page_replaces_whole_day() {
    let ctx = TestContext::synced().await;

    ctx.source.set_batch(fixtures::batch_from(&fixtures::station_page(
        r#"<tr><td>High Tide</td><td>10:02</td><td>2.9 m (9.5 ft)</td></tr>
           <tr><td>Low Tide</td><td>16:20</td><td>0.1 m (0.3 ft)</td></tr>"#,
    )));
    assert_eq!(ctx.sync.trigger_sync().await.unwrap(), 2);

    let tides = ctx
        .store
        .find_tides(&TideQuery::new().date(fixtures::station_date()))
        .await
        .unwrap();
    assert_eq!(tides.len(), 2);
    assert_eq!(tides[0].occurs_at, fixtures::civil_time(10, 2));
    assert_eq!(tides[0].height_m, 2.9);
}

/// A failing source never touches what is already stored.
#[tokio::test]
async fn test_source_failure_keeps_previous_day() {
    let ctx = TestContext::synced().await;

    ctx.source.set_unreachable();
    let err = ctx.sync.trigger_sync().await.unwrap_err();
    assert!(matches!(err, Error::Fetch(_)));
    assert_eq!(err.error_code().code(), "FETCH_001");

    ctx.source.set_empty();
    assert!(matches!(
        ctx.sync.trigger_sync().await,
        Err(Error::EmptyResult(_))
    ));

    let stored = ctx
        .store
        .count_day(STATION_LOCATION, fixtures::station_date())
        .await
        .unwrap();
    assert_eq!(stored, 4);
}

/// Bad rows are dropped, the rest of the table is still stored.
#[tokio::test]
async fn test_bad_rows_do_not_fail_the_batch() {
    let ctx = TestContext::new().await;

    let batch = fixtures::batch_from(&fixtures::station_page(
        r#"<tr><td>Low Tide</td><td>03:12</td><td>0.4 m (1.3 ft)</td></tr>
           <tr><td>Moonset</td><td>04:40</td><td>-</td></tr>
           <tr><td>High Tide</td><td>09:27</td><td>2.8 m (9.2 ft)</td></tr>"#,
    ));
    assert_eq!(batch.skipped, 1);
    ctx.source.set_batch(batch);

    assert_eq!(ctx.sync.trigger_sync().await.unwrap(), 2);
}

/// An impossible height is one bad row, not a failed day.
#[tokio::test]
async fn test_implausible_height_row_is_skipped() {
    let ctx = TestContext::new().await;

    let batch = fixtures::batch_from(&fixtures::station_page(
        r#"<tr><td>High Tide</td><td>09:27</td><td>2.8 m (9.2 ft)</td></tr>
           <tr><td>Low Tide</td><td>15:40</td><td>25.0 m (82.0 ft)</td></tr>"#,
    ));
    assert_eq!(batch.observations.len(), 1);
    assert_eq!(batch.skipped, 1);
    ctx.source.set_batch(batch);

    assert_eq!(ctx.sync.trigger_sync().await.unwrap(), 1);
    assert!(telemetry::health().store.is_healthy());

    let stored = ctx
        .store
        .count_day(STATION_LOCATION, fixtures::station_date())
        .await
        .unwrap();
    assert_eq!(stored, 1);
}

/// A page with rows but none usable is an empty result, not an empty day.
#[test]
fn test_unusable_page_is_empty_result() {
    let result = ingest::TideScraper::parse_document(
        &fixtures::unusable_page(),
        &ingest::ScraperConfig::default(),
        STATION_LOCATION,
    );
    assert!(matches!(result, Err(Error::EmptyResult(_))));
}

/// The highest qualifying tide comes first when ordering by height.
#[tokio::test]
async fn test_height_query_over_synced_day() {
    let ctx = TestContext::synced().await;

    let tides = ctx
        .store
        .find_tides(
            &TideQuery::new()
                .kind(TideKind::High)
                .above_height(2.6)
                .order(TideOrder::HeightDesc)
                .limit(1),
        )
        .await
        .unwrap();

    assert_eq!(tides.len(), 1);
    assert_eq!(tides[0].height_m, 2.8);
}

/// The scheduler runs the worker right away and stops on request.
#[tokio::test]
async fn test_scheduler_drives_sync_worker() {
    let ctx = TestContext::new().await;
    let scheduler = Arc::new(PeriodicScheduler::new(
        ctx.sync.clone(),
        Cadence::Fixed(Duration::from_secs(3600)),
    ));

    let handle = scheduler.start().unwrap();

    let mut waited = 0;
    while ctx.source.call_count() == 0 && waited < 200 {
        tokio::time::sleep(Duration::from_millis(10)).await;
        waited += 1;
    }
    assert_eq!(ctx.source.call_count(), 1);

    assert!(scheduler.stop());
    handle.await.unwrap();
    assert_eq!(scheduler.state(), SchedulerState::Stopped);

    let stored = ctx
        .store
        .count_day(STATION_LOCATION, fixtures::station_date())
        .await
        .unwrap();
    assert_eq!(stored, 4);
}
