//! Scraper for the station's published tide table.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::NaiveDate;
use scraper::{ElementRef, Html, Selector};
use telemetry::metrics;
use tide_core::parse::{parse_clock_time, parse_height, parse_station_date_header};
use tide_core::{
    civil_to_utc, is_plausible_height, Error, Result, TideKind, TideObservation,
    MAX_PLAUSIBLE_HEIGHT_M,
};
use tracing::{debug, info, warn};

use crate::config::ScraperConfig;
use crate::{ScrapeBatch, TideSource};

/// HTTP scraper for one station page.
#[derive(Debug, Clone)]
pub struct TideScraper {
    client: reqwest::Client,
    config: ScraperConfig,
}

impl TideScraper {
    pub fn new(config: ScraperConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// Fetch the station page and parse it.
    pub async fn scrape(&self) -> Result<ScrapeBatch> {
        let start = Instant::now();
        let html = self.fetch_html().await?;
        metrics()
            .scrape_latency_ms
            .observe(start.elapsed().as_millis() as u64);

        Self::parse_document(&html, &self.config, &self.config.location)
    }

    async fn fetch_html(&self) -> Result<String> {
        let url = &self.config.url;
        debug!(url = %url, "Fetching tide table");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::fetch(format!("GET {url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::fetch(format!("GET {url} returned {status}")));
        }

        response
            .text()
            .await
            .map_err(|e| Error::fetch(format!("reading body of {url}: {e}")))
    }

    /// Parse a station page into a batch for `location`.
    ///
    /// Fails as a whole when the date header is missing or no row survives;
    /// individual bad rows are skipped and counted.
    pub fn parse_document(html: &str, config: &ScraperConfig, location: &str) -> Result<ScrapeBatch> {
        let document = Html::parse_document(html);

        let date = find_station_date(&document, config)?;
        let row_selector = selector(&config.table_selector)?;
        let cell_selector = selector("td")?;

        let mut observations = Vec::new();
        let mut skipped = 0;

        // Row 0 is the table's heading.
        for (idx, row) in document.select(&row_selector).enumerate().skip(1) {
            let cells: Vec<String> = row.select(&cell_selector).map(cell_text).collect();

            match parse_row(&cells, date, location) {
                Ok(obs) => observations.push(obs),
                Err(e) => {
                    skipped += 1;
                    warn!(row = idx, cells = ?cells, reason = %e, "Skipping tide row");
                }
            }
        }

        metrics().rows_skipped.inc_by(skipped as u64);

        if observations.is_empty() {
            return Err(Error::empty_result(format!(
                "no usable tide rows for {location} on {date} ({skipped} skipped)"
            )));
        }

        metrics().rows_accepted.inc_by(observations.len() as u64);
        info!(
            location,
            %date,
            accepted = observations.len(),
            skipped,
            "Parsed tide table"
        );

        Ok(ScrapeBatch {
            location: location.to_string(),
            date,
            observations,
            skipped,
        })
    }
}

#[async_trait]
impl TideSource for TideScraper {
    async fn fetch_batch(&self) -> Result<ScrapeBatch> {
        self.scrape().await
    }

    fn describe(&self) -> String {
        self.config.url.clone()
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| Error::parse(format!("bad selector {css:?}: {e}")))
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_string()
}

/// Locate the innermost block announcing the station date and parse it.
fn find_station_date(document: &Html, config: &ScraperConfig) -> Result<NaiveDate> {
    let div = selector("div")?;

    let header = document
        .select(&div)
        .map(|el| el.text().collect::<String>())
        .filter(|text| text.contains(&config.header_marker) && text.contains(&config.timezone_tag))
        .last()
        .ok_or_else(|| {
            Error::missing_header(format!(
                "no block containing {:?} and {:?}",
                config.header_marker, config.timezone_tag
            ))
        })?;

    parse_station_date_header(&header)
}

fn parse_row(cells: &[String], date: NaiveDate, location: &str) -> Result<TideObservation> {
    let [label, time, height] = cells else {
        return Err(Error::parse(format!("expected 3 cells, found {}", cells.len())));
    };

    let kind = TideKind::classify(label)
        .ok_or_else(|| Error::parse(format!("unknown tide kind {label:?}")))?;
    let (hour, minute) = parse_clock_time(time)?;
    let (height_m, height_ft) = parse_height(height)?;
    if !is_plausible_height(height_m) {
        return Err(Error::parse(format!(
            "implausible height {height_m} m (limit ±{MAX_PLAUSIBLE_HEIGHT_M} m)"
        )));
    }
    let occurs_at = civil_to_utc(date, hour, minute)?;

    Ok(TideObservation {
        location: location.to_string(),
        date,
        kind,
        occurs_at,
        height_m,
        height_ft,
    })
}
