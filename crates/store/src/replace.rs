//! Transactional replacement of one day's tides.

use std::time::Instant;

use chrono::{NaiveDate, Utc};
use telemetry::metrics;
use tide_core::{Error, Result, TideObservation};
use tracing::{debug, info};
use uuid::Uuid;

use crate::client::{storage_error, TideStore};

const DELETE_DAY: &str = "DELETE FROM tide_data WHERE location = ? AND date = ?";

const INSERT_TIDE: &str = r#"
INSERT INTO tide_data (id, location, date, tide_type, tide_time, height_m, height_ft, created_at)
VALUES (?, ?, ?, ?, ?, ?, ?, ?)
"#;

impl TideStore {
    /// Replace every stored tide for (`location`, `date`) with `observations`.
    ///
    /// Delete and inserts run in one transaction: on any failure the prior
    /// rows for the day remain exactly as they were. An empty batch is a
    /// no-op. Returns the number of rows inserted.
    pub async fn replace_day(
        &self,
        location: &str,
        date: NaiveDate,
        observations: &[TideObservation],
    ) -> Result<usize> {
        if observations.is_empty() {
            debug!(location, %date, "Empty batch, leaving stored day untouched");
            return Ok(0);
        }

        if let Some(stray) = observations
            .iter()
            .find(|obs| obs.location != location || obs.date != date)
        {
            return Err(Error::validation(format!(
                "batch for {location} {date} contains an observation for {} {}",
                stray.location, stray.date
            )));
        }

        let start = Instant::now();
        let day = date.to_string();
        let created_at = Utc::now().timestamp_millis();

        let mut tx = self
            .inner()
            .begin()
            .await
            .map_err(storage_error("begin transaction"))?;

        let deleted = sqlx::query(DELETE_DAY)
            .bind(location)
            .bind(&day)
            .execute(&mut *tx)
            .await
            .map_err(storage_error("delete day"))?
            .rows_affected();

        for obs in observations {
            sqlx::query(INSERT_TIDE)
                .bind(Uuid::new_v4().to_string())
                .bind(&obs.location)
                .bind(&day)
                .bind(obs.kind.as_str())
                .bind(obs.occurs_at.timestamp_millis())
                .bind(obs.height_m)
                .bind(obs.height_ft)
                .bind(created_at)
                .execute(&mut *tx)
                .await
                .map_err(storage_error("insert tide"))?;
        }

        tx.commit().await.map_err(storage_error("commit"))?;

        let elapsed_ms = start.elapsed().as_millis() as u64;
        metrics().replace_latency_ms.observe(elapsed_ms);
        metrics().rows_stored.inc_by(observations.len() as u64);

        info!(
            location,
            %date,
            deleted,
            count = observations.len(),
            elapsed_ms,
            "Replaced tide day"
        );

        Ok(observations.len())
    }
}
