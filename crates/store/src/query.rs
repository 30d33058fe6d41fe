//! Tide read queries.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{QueryBuilder, Sqlite};
use tide_core::{Error, Result, TideKind, TideObservation};

use crate::client::{storage_error, TideStore};

/// Result ordering for [`TideQuery`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TideOrder {
    #[default]
    TimeAsc,
    /// Highest first; equal heights by earliest time.
    HeightDesc,
}

/// Filter over stored tides. Unset fields do not constrain the result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TideQuery {
    pub location: Option<String>,
    pub date: Option<NaiveDate>,
    pub kind: Option<TideKind>,
    /// Exclusive lower bound on height in meters.
    pub min_height_m: Option<f64>,
    /// Inclusive lower bound on `occurs_at`.
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `occurs_at`.
    pub to: Option<DateTime<Utc>>,
    pub order: TideOrder,
    pub limit: Option<u32>,
}

impl TideQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn kind(mut self, kind: TideKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn above_height(mut self, meters: f64) -> Self {
        self.min_height_m = Some(meters);
        self
    }

    pub fn between(mut self, from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        self.from = Some(from);
        self.to = Some(to);
        self
    }

    pub fn order(mut self, order: TideOrder) -> Self {
        self.order = order;
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    fn validate(&self) -> Result<()> {
        if let (Some(from), Some(to)) = (self.from, self.to) {
            if from > to {
                return Err(Error::validation(format!(
                    "query window is inverted: {from} > {to}"
                )));
            }
        }
        Ok(())
    }

    fn build(&self) -> QueryBuilder<'static, Sqlite> {
        let mut qb = QueryBuilder::new(
            "SELECT id, location, date, tide_type, tide_time, height_m, height_ft FROM tide_data WHERE 1 = 1",
        );

        if let Some(location) = &self.location {
            qb.push(" AND location = ").push_bind(location.clone());
        }
        if let Some(date) = self.date {
            qb.push(" AND date = ").push_bind(date.to_string());
        }
        if let Some(kind) = self.kind {
            qb.push(" AND tide_type = ").push_bind(kind.as_str());
        }
        if let Some(min) = self.min_height_m {
            qb.push(" AND height_m > ").push_bind(min);
        }
        if let Some(from) = self.from {
            qb.push(" AND tide_time >= ").push_bind(from.timestamp_millis());
        }
        if let Some(to) = self.to {
            qb.push(" AND tide_time <= ").push_bind(to.timestamp_millis());
        }

        qb.push(match self.order {
            TideOrder::TimeAsc => " ORDER BY tide_time ASC",
            TideOrder::HeightDesc => " ORDER BY height_m DESC, tide_time ASC",
        });

        if let Some(limit) = self.limit {
            qb.push(" LIMIT ").push_bind(i64::from(limit));
        }

        qb
    }
}

/// Raw `tide_data` row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TideRow {
    pub id: String,
    pub location: String,
    pub date: String,
    pub tide_type: String,
    pub tide_time: i64,
    pub height_m: f64,
    pub height_ft: f64,
}

impl TryFrom<TideRow> for TideObservation {
    type Error = Error;

    fn try_from(row: TideRow) -> Result<Self> {
        let date = NaiveDate::parse_from_str(&row.date, "%Y-%m-%d")
            .map_err(|_| Error::storage(format!("row {} has bad date {:?}", row.id, row.date)))?;
        let kind = TideKind::from_db(&row.tide_type).ok_or_else(|| {
            Error::storage(format!("row {} has bad tide_type {:?}", row.id, row.tide_type))
        })?;
        let occurs_at = DateTime::from_timestamp_millis(row.tide_time).ok_or_else(|| {
            Error::storage(format!("row {} has bad tide_time {}", row.id, row.tide_time))
        })?;

        Ok(TideObservation {
            location: row.location,
            date,
            kind,
            occurs_at,
            height_m: row.height_m,
            height_ft: row.height_ft,
        })
    }
}

/// Read access to stored tides.
#[async_trait]
pub trait TideReader: Send + Sync {
    async fn find_tides(&self, query: &TideQuery) -> Result<Vec<TideObservation>>;
}

#[async_trait]
impl TideReader for TideStore {
    async fn find_tides(&self, query: &TideQuery) -> Result<Vec<TideObservation>> {
        query.validate()?;

        let rows: Vec<TideRow> = query
            .build()
            .build_query_as()
            .fetch_all(self.inner())
            .await
            .map_err(storage_error("query tides"))?;

        rows.into_iter().map(TideObservation::try_from).collect()
    }
}

impl TideStore {
    /// Number of stored rows for one logical day.
    pub async fn count_day(&self, location: &str, date: NaiveDate) -> Result<u64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM tide_data WHERE location = ? AND date = ?")
                .bind(location)
                .bind(date.to_string())
                .fetch_one(self.inner())
                .await
                .map_err(storage_error("count day"))?;
        Ok(count as u64)
    }
}
