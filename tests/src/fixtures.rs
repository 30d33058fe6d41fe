//! Station pages, observations, and alerts used across tests.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use ingest::{ScrapeBatch, ScraperConfig, TideScraper};
use tide_core::{civil_to_utc, AlertRecord, TideKind, TideObservation, STATION_LOCATION};

/// The logical day every fixture page announces.
pub fn station_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 12, 4).unwrap()
}

/// Wrap table rows in a station page for [`station_date`].
pub fn station_page(rows: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>Sekupang Tide Times</title></head>
<body>
  <div class="main">
    <div class="station-info">
      <h2>Tide Times for Sekupang: Thursday December 4, 2025 (WIB)</h2>
      <p>Times are local (WIB).</p>
    </div>
    <table class="table table-bordered">
      <tr><th>Tide</th><th>Time</th><th>Height</th></tr>
      {rows}
    </table>
  </div>
</body>
</html>"#
    )
}

/// A typical day: two highs, two lows, one of the highs above 2.6 m.
pub fn full_day_page() -> String {
    station_page(
        r#"<tr><td>Low Tide</td><td>03:12</td><td>0.4 m (1.3 ft)</td></tr>
      <tr><td>High Tide</td><td>09:27</td><td>2.8 m (9.2 ft)</td></tr>
      <tr><td>Low Tide</td><td>15:40</td><td>-0.1 m (-0.3 ft)</td></tr>
      <tr><td>High Tide</td><td>21:55</td><td>2.5 m (8.2 ft)</td></tr>"#,
    )
}

/// A page whose table has rows but none that parse.
pub fn unusable_page() -> String {
    station_page(
        r#"<tr><td>Sunrise</td><td>06:01</td><td>-</td></tr>
      <tr><td>High Tide</td><td>9.27</td><td>2.8 m (9.2 ft)</td></tr>"#,
    )
}

/// Parse a fixture page the way the scraper does.
pub fn batch_from(html: &str) -> ScrapeBatch {
    TideScraper::parse_document(html, &ScraperConfig::default(), STATION_LOCATION)
        .expect("fixture page should parse")
}

/// Instant of a civil (UTC+7) clock time on [`station_date`].
pub fn civil_time(hour: u32, minute: u32) -> DateTime<Utc> {
    civil_to_utc(station_date(), hour, minute).unwrap()
}

/// The 09:27 WIB high tide of [`full_day_page`], in UTC.
pub fn peak_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 12, 4, 2, 27, 0).unwrap()
}

pub fn observation(kind: TideKind, hour: u32, minute: u32, height_m: f64) -> TideObservation {
    TideObservation {
        location: STATION_LOCATION.to_string(),
        date: station_date(),
        kind,
        occurs_at: civil_time(hour, minute),
        height_m,
        height_ft: (height_m * 3.28084 * 10.0).round() / 10.0,
    }
}

/// An alert for the home area.
pub fn alert(
    id: &str,
    description: &str,
    effective: DateTime<Utc>,
    expires: DateTime<Utc>,
) -> AlertRecord {
    AlertRecord {
        id: id.to_string(),
        identifier: format!("CAP-{id}"),
        event: "Thunderstorm".to_string(),
        headline: "Peringatan Dini Cuaca Kep. Riau".to_string(),
        description: description.to_string(),
        area_description: "Kep. Riau".to_string(),
        severity: "Moderate".to_string(),
        sent: effective - Duration::minutes(30),
        effective,
        expires,
    }
}

/// Heavy rain over the station, covering the 09:27 WIB high tide.
pub fn rain_during_peak(id: &str) -> AlertRecord {
    alert(
        id,
        "Heavy rain accompanied by lightning over Batam, Sekupang, Nongsa.",
        peak_time() - Duration::hours(1),
        peak_time() + Duration::hours(2),
    )
}

/// Heavy rain that ends an hour before the 09:27 WIB high tide.
pub fn rain_before_peak(id: &str) -> AlertRecord {
    alert(
        id,
        "Heavy rain over Batam, Sekupang, Belakang Padang.",
        peak_time() - Duration::hours(4),
        peak_time() - Duration::hours(1),
    )
}

/// Wind only, no rain.
pub fn wind_alert(id: &str) -> AlertRecord {
    alert(
        id,
        "Strong wind over Bintan, Tanjungpinang.",
        peak_time() - Duration::hours(1),
        peak_time() + Duration::hours(2),
    )
}
