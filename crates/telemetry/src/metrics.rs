//! In-process metrics.
//!
//! Counters and histograms are plain atomics; `snapshot()` is what the
//! health endpoint serves.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// A monotonically increasing counter.
#[derive(Debug, Default)]
pub struct Counter(AtomicU64);

impl Counter {
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    pub fn inc(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_by(&self, n: u64) {
        self.0.fetch_add(n, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// A value that is overwritten rather than accumulated.
#[derive(Debug, Default)]
pub struct Gauge(AtomicU64);

impl Gauge {
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    pub fn set(&self, val: u64) {
        self.0.store(val, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Latency histogram in milliseconds.
///
/// Bounds are sized for network fetches and small SQLite transactions.
#[derive(Debug)]
pub struct Histogram {
    buckets: [AtomicU64; 10],
    sum: AtomicU64,
    count: AtomicU64,
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

impl Histogram {
    const BUCKET_BOUNDS: [u64; 10] = [5, 10, 50, 100, 250, 500, 1000, 2500, 10000, 30000];

    pub fn new() -> Self {
        Self {
            buckets: Default::default(),
            sum: AtomicU64::new(0),
            count: AtomicU64::new(0),
        }
    }

    /// Records a value in milliseconds.
    pub fn observe(&self, ms: u64) {
        self.sum.fetch_add(ms, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);

        let idx = Self::BUCKET_BOUNDS
            .iter()
            .position(|&bound| ms <= bound)
            .unwrap_or(Self::BUCKET_BOUNDS.len() - 1);
        self.buckets[idx].fetch_add(1, Ordering::Relaxed);
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn sum(&self) -> u64 {
        self.sum.load(Ordering::Relaxed)
    }

    pub fn mean(&self) -> f64 {
        let count = self.count();
        if count == 0 {
            0.0
        } else {
            self.sum() as f64 / count as f64
        }
    }

    /// Returns (upper bound, count) pairs.
    pub fn buckets(&self) -> Vec<(u64, u64)> {
        Self::BUCKET_BOUNDS
            .iter()
            .zip(self.buckets.iter())
            .map(|(&bound, count)| (bound, count.load(Ordering::Relaxed)))
            .collect()
    }
}

/// Collected metrics for tidewatch.
#[derive(Debug, Default)]
pub struct Metrics {
    // Ingestion
    pub sync_cycles: Counter,
    pub sync_failures: Counter,
    pub rows_accepted: Counter,
    pub rows_skipped: Counter,
    pub rows_stored: Counter,
    pub last_cycle_rows: Gauge,

    // Correlator
    pub assessments: Counter,
    pub assessments_unknown: Counter,
    pub risk_high: Counter,
    pub risk_moderate: Counter,

    // Latency
    pub scrape_latency_ms: Histogram,
    pub replace_latency_ms: Histogram,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }
}

/// A snapshot of metrics at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub timestamp: DateTime<Utc>,
    pub sync_cycles: u64,
    pub sync_failures: u64,
    pub rows_accepted: u64,
    pub rows_skipped: u64,
    pub rows_stored: u64,
    pub last_cycle_rows: u64,
    pub assessments: u64,
    pub assessments_unknown: u64,
    pub risk_high: u64,
    pub risk_moderate: u64,
    pub scrape_latency_mean_ms: f64,
    pub replace_latency_mean_ms: f64,
}

impl Metrics {
    /// Takes a snapshot of current metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            timestamp: Utc::now(),
            sync_cycles: self.sync_cycles.get(),
            sync_failures: self.sync_failures.get(),
            rows_accepted: self.rows_accepted.get(),
            rows_skipped: self.rows_skipped.get(),
            rows_stored: self.rows_stored.get(),
            last_cycle_rows: self.last_cycle_rows.get(),
            assessments: self.assessments.get(),
            assessments_unknown: self.assessments_unknown.get(),
            risk_high: self.risk_high.get(),
            risk_moderate: self.risk_moderate.get(),
            scrape_latency_mean_ms: self.scrape_latency_ms.mean(),
            replace_latency_mean_ms: self.replace_latency_ms.mean(),
        }
    }
}

/// Global metrics registry.
pub static METRICS: std::sync::LazyLock<Metrics> = std::sync::LazyLock::new(Metrics::new);

/// Get the global metrics instance.
pub fn metrics() -> &'static Metrics {
    &METRICS
}
