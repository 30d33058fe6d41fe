//! Table definitions.
//!
//! Instants are stored as INTEGER milliseconds since the Unix epoch (UTC).
//! Logical dates are stored as `YYYY-MM-DD` text.

/// Tide predictions, one row per extreme.
pub const CREATE_TIDE_DATA_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS tide_data (
    id TEXT PRIMARY KEY,
    location TEXT NOT NULL,
    date TEXT NOT NULL,
    tide_type TEXT NOT NULL CHECK (tide_type IN ('high', 'low')),
    tide_time INTEGER NOT NULL,
    height_m REAL NOT NULL CHECK (height_m > -20 AND height_m < 20),
    height_ft REAL NOT NULL,
    created_at INTEGER NOT NULL
)
"#;

pub const CREATE_TIDE_DAY_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_tide_data_location_date ON tide_data (location, date)";

pub const CREATE_TIDE_TIME_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_tide_data_type_time ON tide_data (tide_type, tide_time)";

/// Weather alert details, written by the alert ingestion service.
pub const CREATE_ALERT_DETAILS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS alert_details (
    id TEXT PRIMARY KEY,
    identifier TEXT NOT NULL,
    event TEXT NOT NULL DEFAULT '',
    headline TEXT NOT NULL DEFAULT '',
    description TEXT NOT NULL DEFAULT '',
    area_description TEXT NOT NULL DEFAULT '',
    severity TEXT NOT NULL DEFAULT '',
    sent INTEGER NOT NULL,
    effective INTEGER NOT NULL,
    expires INTEGER NOT NULL
)
"#;

pub const CREATE_ALERT_SENT_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_alert_details_sent ON alert_details (sent)";

/// All DDL statements in creation order.
pub fn all_tables() -> Vec<&'static str> {
    vec![
        CREATE_TIDE_DATA_TABLE,
        CREATE_TIDE_DAY_INDEX,
        CREATE_TIDE_TIME_INDEX,
        CREATE_ALERT_DETAILS_TABLE,
        CREATE_ALERT_SENT_INDEX,
    ]
}
