//! Read access to weather alerts.
//!
//! Alerts are owned by the alert ingestion service; tidewatch reads them
//! to attach a flood-risk verdict. `insert_alert` exists for seeding.

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite};
use tide_core::{AlertRecord, Error, Result};

use crate::client::{storage_error, TideStore};

/// Filter for alert listings.
#[derive(Debug, Clone, Default)]
pub struct AlertFilter {
    /// Exact `area_description` match.
    pub area: Option<String>,
    /// Alerts whose description lists this place (`"<location>,"`).
    pub location: Option<String>,
    /// Alerts in force at this instant.
    pub active_at: Option<DateTime<Utc>>,
}

impl AlertFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn area(mut self, area: impl Into<String>) -> Self {
        self.area = Some(area.into());
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn active_at(mut self, at: DateTime<Utc>) -> Self {
        self.active_at = Some(at);
        self
    }

    fn push_conditions(&self, qb: &mut QueryBuilder<'static, Sqlite>) {
        qb.push(" WHERE 1 = 1");
        if let Some(area) = &self.area {
            qb.push(" AND area_description = ").push_bind(area.clone());
        }
        if let Some(location) = &self.location {
            qb.push(" AND description LIKE ")
                .push_bind(format!("%{},%", escape_like(location)))
                .push(" ESCAPE '\\'");
        }
        if let Some(at) = self.active_at {
            let ms = at.timestamp_millis();
            qb.push(" AND effective <= ").push_bind(ms);
            qb.push(" AND expires >= ").push_bind(ms);
        }
    }
}

/// Escape `%`, `_` and the escape character itself for a `LIKE ... ESCAPE '\'`.
fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[derive(Debug, sqlx::FromRow)]
struct AlertRow {
    id: String,
    identifier: String,
    event: String,
    headline: String,
    description: String,
    area_description: String,
    severity: String,
    sent: i64,
    effective: i64,
    expires: i64,
}

fn instant(id: &str, column: &str, ms: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms)
        .ok_or_else(|| Error::storage(format!("alert {id} has bad {column} {ms}")))
}

impl TryFrom<AlertRow> for AlertRecord {
    type Error = Error;

    fn try_from(row: AlertRow) -> Result<Self> {
        let sent = instant(&row.id, "sent", row.sent)?;
        let effective = instant(&row.id, "effective", row.effective)?;
        let expires = instant(&row.id, "expires", row.expires)?;

        Ok(AlertRecord {
            id: row.id,
            identifier: row.identifier,
            event: row.event,
            headline: row.headline,
            description: row.description,
            area_description: row.area_description,
            severity: row.severity,
            sent,
            effective,
            expires,
        })
    }
}

impl TideStore {
    /// A page of alerts, newest `sent` first, plus the total matching count.
    pub async fn query_alerts(
        &self,
        filter: &AlertFilter,
        limit: u32,
        offset: u32,
    ) -> Result<(Vec<AlertRecord>, u64)> {
        let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM alert_details");
        filter.push_conditions(&mut count_qb);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(self.inner())
            .await
            .map_err(storage_error("count alerts"))?;

        let mut qb = QueryBuilder::new(
            "SELECT id, identifier, event, headline, description, area_description, severity, sent, effective, expires FROM alert_details",
        );
        filter.push_conditions(&mut qb);
        qb.push(" ORDER BY sent DESC LIMIT ")
            .push_bind(i64::from(limit))
            .push(" OFFSET ")
            .push_bind(i64::from(offset));

        let rows: Vec<AlertRow> = qb
            .build_query_as()
            .fetch_all(self.inner())
            .await
            .map_err(storage_error("query alerts"))?;

        let alerts = rows
            .into_iter()
            .map(AlertRecord::try_from)
            .collect::<Result<Vec<_>>>()?;

        Ok((alerts, total as u64))
    }

    /// Insert or overwrite an alert by id.
    pub async fn insert_alert(&self, alert: &AlertRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO alert_details
                (id, identifier, event, headline, description, area_description, severity, sent, effective, expires)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&alert.id)
        .bind(&alert.identifier)
        .bind(&alert.event)
        .bind(&alert.headline)
        .bind(&alert.description)
        .bind(&alert.area_description)
        .bind(&alert.severity)
        .bind(alert.sent.timestamp_millis())
        .bind(alert.effective.timestamp_millis())
        .bind(alert.expires.timestamp_millis())
        .execute(self.inner())
        .await
        .map_err(storage_error("insert alert"))?;
        Ok(())
    }
}
