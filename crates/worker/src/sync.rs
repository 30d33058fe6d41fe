//! Tide sync cycle: fetch one day from the source and replace it in the store.

use std::sync::Arc;

use async_trait::async_trait;
use ingest::TideSource;
use telemetry::{health, metrics};
use tide_core::{Error, Result};
use tide_store::TideStore;
use tracing::{error, info, warn};

use crate::scheduler::SyncJob;

/// Pulls tide batches from a source into the store.
pub struct TideSyncWorker {
    source: Arc<dyn TideSource>,
    store: Arc<TideStore>,
}

impl TideSyncWorker {
    pub fn new(source: Arc<dyn TideSource>, store: Arc<TideStore>) -> Self {
        Self { source, store }
    }

    /// Runs one cycle and returns the number of rows stored.
    ///
    /// A source failure leaves the stored day untouched; a storage failure
    /// rolls back inside `replace_day`.
    pub async fn run_cycle(&self) -> Result<usize> {
        metrics().sync_cycles.inc();

        let batch = match self.source.fetch_batch().await {
            Ok(batch) => {
                health().tide_source.set_healthy();
                batch
            }
            Err(e) => {
                metrics().sync_failures.inc();
                health().tide_source.set_unhealthy(e.to_string());
                warn!(
                    source = %self.source.describe(),
                    code = e.error_code().code(),
                    error = %e,
                    "Tide source failed, stored data left as is"
                );
                return Err(e);
            }
        };

        if batch.skipped > 0 {
            warn!(
                date = %batch.date,
                skipped = batch.skipped,
                "Tide batch had rejected rows"
            );
        }

        match self
            .store
            .replace_day(&batch.location, batch.date, &batch.observations)
            .await
        {
            Ok(count) => {
                health().store.set_healthy();
                metrics().last_cycle_rows.set(count as u64);
                info!(
                    location = %batch.location,
                    date = %batch.date,
                    count,
                    "Tide sync cycle complete"
                );
                Ok(count)
            }
            Err(e) => {
                metrics().sync_failures.inc();
                if matches!(e, Error::Storage(_)) {
                    health().store.set_unhealthy(e.to_string());
                }
                error!(date = %batch.date, error = %e, "Failed to store tide batch");
                Err(e)
            }
        }
    }

    /// On-demand sync. Same as a scheduled cycle, but errors go to the caller.
    pub async fn trigger_sync(&self) -> Result<usize> {
        info!(source = %self.source.describe(), "Manual tide sync requested");
        self.run_cycle().await
    }

    pub fn store(&self) -> &Arc<TideStore> {
        &self.store
    }
}

#[async_trait]
impl SyncJob for TideSyncWorker {
    fn name(&self) -> &str {
        "tide_sync"
    }

    async fn run_cycle(&self) -> Result<usize> {
        TideSyncWorker::run_cycle(self).await
    }
}
