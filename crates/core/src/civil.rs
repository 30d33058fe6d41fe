//! Civil timezone of the station.
//!
//! The tide source publishes clock times in WIB, a fixed UTC+7 offset with
//! no daylight saving. All local-time arithmetic goes through here; storage
//! and comparisons are always UTC.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::error::{Error, Result};

/// Offset of the station's civil time from UTC, in seconds.
pub const CIVIL_OFFSET_SECS: i32 = 7 * 60 * 60;

/// Label the source uses for its civil timezone.
pub const CIVIL_TZ_TAG: &str = "WIB";

/// The station's civil timezone.
pub fn civil_offset() -> FixedOffset {
    FixedOffset::east_opt(CIVIL_OFFSET_SECS).expect("UTC+7 is within the valid offset range")
}

/// Current instant in civil time.
pub fn civil_now() -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&civil_offset())
}

/// Midnight of `date` in civil time.
pub fn civil_midnight(date: NaiveDate) -> DateTime<FixedOffset> {
    let offset = civil_offset();
    offset.from_utc_datetime(&(date.and_time(NaiveTime::MIN) - offset_duration(&offset)))
}

/// Midnight of `date` in UTC. Shares (Y, M, D) with [`civil_midnight`].
pub fn utc_midnight(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

/// Combine a civil calendar date with a civil clock time and convert to UTC.
pub fn civil_to_utc(date: NaiveDate, hour: u32, minute: u32) -> Result<DateTime<Utc>> {
    let time = NaiveTime::from_hms_opt(hour, minute, 0)
        .ok_or_else(|| Error::parse(format!("clock time out of range: {hour:02}:{minute:02}")))?;

    civil_offset()
        .from_local_datetime(&date.and_time(time))
        .single()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| Error::parse(format!("ambiguous civil time {date} {time}")))
}

fn offset_duration(offset: &FixedOffset) -> chrono::Duration {
    chrono::Duration::seconds(offset.local_minus_utc() as i64)
}
