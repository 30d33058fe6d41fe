//! Cell-level parsers for the station's tide table.
//!
//! These are pure functions over strings; DOM traversal lives in the ingest
//! crate.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::error::{Error, Result};

static HEIGHT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(-?[\d.]+)\s*m\s*\((-?[\d.]+)\s*ft\)").expect("height pattern compiles")
});

static HEADER_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\w+)\s+(\w+)\s+(\d+),\s+(\d+)").expect("header pattern compiles")
});

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Parse a height cell such as `"1.1 m (3.6 ft)"` into `(meters, feet)`.
///
/// Both numbers may be negative.
pub fn parse_height(text: &str) -> Result<(f64, f64)> {
    let caps = HEIGHT_RE
        .captures(text)
        .ok_or_else(|| Error::parse(format!("unrecognized height: {text:?}")))?;

    let meters = parse_number(&caps[1], text)?;
    let feet = parse_number(&caps[2], text)?;
    Ok((meters, feet))
}

fn parse_number(raw: &str, cell: &str) -> Result<f64> {
    raw.parse::<f64>()
        .map_err(|_| Error::parse(format!("bad number {raw:?} in height {cell:?}")))
}

/// Parse an `HH:MM` clock cell into `(hour, minute)`.
///
/// Surrounding whitespace is ignored; anything other than exactly one colon
/// separating two integers in range is rejected.
pub fn parse_clock_time(text: &str) -> Result<(u32, u32)> {
    let trimmed = text.trim();
    let mut parts = trimmed.split(':');

    let (hour, minute) = match (parts.next(), parts.next(), parts.next()) {
        (Some(h), Some(m), None) => (h, m),
        _ => return Err(Error::parse(format!("unrecognized clock time: {text:?}"))),
    };

    let hour: u32 = hour
        .parse()
        .map_err(|_| Error::parse(format!("bad hour in {text:?}")))?;
    let minute: u32 = minute
        .parse()
        .map_err(|_| Error::parse(format!("bad minute in {text:?}")))?;

    if hour > 23 || minute > 59 {
        return Err(Error::parse(format!("clock time out of range: {text:?}")));
    }

    Ok((hour, minute))
}

/// Extract the calendar date from a header such as
/// `"Tide Times for Sekupang: Thursday December 4, 2025 (WIB)"`.
///
/// The first match of `<word> <month> <day>, <year>` is used.
pub fn parse_station_date_header(text: &str) -> Result<NaiveDate> {
    let caps = HEADER_DATE_RE
        .captures(text)
        .ok_or_else(|| Error::parse(format!("no date in header: {text:?}")))?;

    let month = month_number(&caps[2])
        .ok_or_else(|| Error::parse(format!("unknown month {:?}", &caps[2])))?;
    let day: u32 = caps[3]
        .parse()
        .map_err(|_| Error::parse(format!("bad day {:?}", &caps[3])))?;
    let year: i32 = caps[4]
        .parse()
        .map_err(|_| Error::parse(format!("bad year {:?}", &caps[4])))?;

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| Error::parse(format!("invalid calendar date {year}-{month}-{day}")))
}

fn month_number(name: &str) -> Option<u32> {
    let name = name.to_lowercase();
    MONTHS
        .iter()
        .position(|m| *m == name)
        .map(|idx| idx as u32 + 1)
}
