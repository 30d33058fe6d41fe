//! Mock implementations for testing.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use ingest::{ScrapeBatch, TideSource};
use parking_lot::Mutex;
use tide_core::{Error, Result, TideObservation};
use tide_store::{TideQuery, TideReader};

/// What the mock source hands out next.
#[derive(Debug, Clone)]
enum Outcome {
    Batch(ScrapeBatch),
    Unreachable,
    Empty,
}

/// Tide source that serves a preset batch or a preset failure.
///
/// Implements the same `TideSource` trait as the real scraper, so the
/// worker and scheduler run their production code paths.
#[derive(Clone)]
pub struct MockTideSource {
    outcome: Arc<Mutex<Outcome>>,
    calls: Arc<AtomicUsize>,
}

impl MockTideSource {
    pub fn new(batch: ScrapeBatch) -> Self {
        Self {
            outcome: Arc::new(Mutex::new(Outcome::Batch(batch))),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Serve `batch` from now on.
    pub fn set_batch(&self, batch: ScrapeBatch) {
        *self.outcome.lock() = Outcome::Batch(batch);
    }

    /// Fail with a fetch error from now on.
    pub fn set_unreachable(&self) {
        *self.outcome.lock() = Outcome::Unreachable;
    }

    /// Fail as if the page had no usable rows.
    pub fn set_empty(&self) {
        *self.outcome.lock() = Outcome::Empty;
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TideSource for MockTideSource {
    async fn fetch_batch(&self) -> Result<ScrapeBatch> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.outcome.lock().clone() {
            Outcome::Batch(batch) => Ok(batch),
            Outcome::Unreachable => Err(Error::fetch("GET mock://station: connection refused")),
            Outcome::Empty => Err(Error::empty_result("no usable tide rows")),
        }
    }

    fn describe(&self) -> String {
        "mock://station".to_string()
    }
}

/// Tide reader whose every lookup fails.
pub struct FailingTideReader;

#[async_trait]
impl TideReader for FailingTideReader {
    async fn find_tides(&self, _query: &TideQuery) -> Result<Vec<TideObservation>> {
        Err(Error::storage("database is locked"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[tokio::test]
    async fn test_mock_source_switches_outcome() {
        let mock = MockTideSource::new(fixtures::batch_from(&fixtures::full_day_page()));

        assert_eq!(mock.fetch_batch().await.unwrap().observations.len(), 4);

        mock.set_unreachable();
        assert!(matches!(mock.fetch_batch().await, Err(Error::Fetch(_))));

        mock.set_empty();
        assert!(matches!(mock.fetch_batch().await, Err(Error::EmptyResult(_))));

        assert_eq!(mock.call_count(), 3);
    }
}
