//! Scraper configuration.

use serde::{Deserialize, Serialize};
use tide_core::STATION_LOCATION;

/// Where and how to scrape the station's tide table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// Station page URL
    #[serde(default = "default_url")]
    pub url: String,
    /// Location recorded on every observation
    #[serde(default = "default_location")]
    pub location: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Phrase identifying the date header block
    #[serde(default = "default_header_marker")]
    pub header_marker: String,
    /// Timezone tag the header block must also carry
    #[serde(default = "default_timezone_tag")]
    pub timezone_tag: String,
    /// CSS selector for the tide table rows
    #[serde(default = "default_table_selector")]
    pub table_selector: String,
}

fn default_url() -> String {
    "https://www.worldtides.info/tidestations/Sekupang".to_string()
}

fn default_location() -> String {
    STATION_LOCATION.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("tidewatch/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_header_marker() -> String {
    "Tide Times for".to_string()
}

fn default_timezone_tag() -> String {
    "(WIB)".to_string()
}

fn default_table_selector() -> String {
    "table.table-bordered tr".to_string()
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            location: default_location(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            header_marker: default_header_marker(),
            timezone_tag: default_timezone_tag(),
            table_selector: default_table_selector(),
        }
    }
}
