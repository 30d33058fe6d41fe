//! Tide table ingestion.
//!
//! [`TideScraper`] fetches the station page and turns its table into a
//! [`ScrapeBatch`]. The worker only sees the [`TideSource`] trait, so tests
//! can feed batches without a network.

pub mod config;
pub mod station;

pub use crate::config::*;
pub use crate::station::*;

use async_trait::async_trait;
use chrono::NaiveDate;
use tide_core::{Result, TideObservation};

/// One day's worth of parsed tides.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapeBatch {
    pub location: String,
    /// Logical date announced by the page header.
    pub date: NaiveDate,
    pub observations: Vec<TideObservation>,
    /// Table rows rejected during parsing.
    pub skipped: usize,
}

/// A source of tide batches.
#[async_trait]
pub trait TideSource: Send + Sync {
    async fn fetch_batch(&self) -> Result<ScrapeBatch>;

    /// Human-readable origin, for logs.
    fn describe(&self) -> String;
}
