//! Request extractors.

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use chrono::{FixedOffset, Offset, Utc};
use serde::Deserialize;

use crate::response::ApiError;

const DEFAULT_LIMIT: u32 = 20;
const MAX_LIMIT: u32 = 100;

/// Page and page size from `?page=&limit=`.
///
/// Unparseable or out-of-range values fall back to defaults instead of
/// failing the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Pagination {
    pub fn from_raw(page: Option<&str>, limit: Option<&str>) -> Self {
        let page = page
            .and_then(|p| p.trim().parse::<u32>().ok())
            .filter(|&p| p >= 1)
            .unwrap_or(1);
        let limit = limit
            .and_then(|l| l.trim().parse::<u32>().ok())
            .filter(|l| (1..=MAX_LIMIT).contains(l))
            .unwrap_or(DEFAULT_LIMIT);

        Self { page, limit }
    }

    pub fn offset(&self) -> u32 {
        (self.page - 1).saturating_mul(self.limit)
    }

    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(u64::from(self.limit))
    }
}

#[derive(Debug, Deserialize)]
struct RawPagination {
    page: Option<String>,
    limit: Option<String>,
}

#[async_trait]
impl<S> FromRequestParts<S> for Pagination
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(raw) = Query::<RawPagination>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;

        Ok(Self::from_raw(raw.page.as_deref(), raw.limit.as_deref()))
    }
}

/// Offset used to render instants, from `?timezone=+08:00`. Defaults to UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayZone(pub FixedOffset);

impl DisplayZone {
    pub fn utc() -> Self {
        Self(Utc.fix())
    }
}

/// Parse `±HH:MM` or `±HHMM`.
///
/// A leading space is read as `+`, which is what an unencoded plus sign
/// becomes in a query string.
pub fn parse_offset(raw: &str) -> Option<FixedOffset> {
    let (sign, rest) = match raw.chars().next()? {
        '+' | ' ' => (1, &raw[1..]),
        '-' => (-1, &raw[1..]),
        _ => return None,
    };

    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    if rest.contains(':') && rest.find(':') != Some(2) {
        return None;
    }

    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;
    if hours > 14 || minutes > 59 {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

#[derive(Debug, Deserialize)]
struct RawZone {
    timezone: Option<String>,
}

#[async_trait]
impl<S> FromRequestParts<S> for DisplayZone
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(raw) = Query::<RawZone>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;

        match raw.timezone.as_deref() {
            None | Some("") => Ok(Self::utc()),
            Some(tz) => parse_offset(tz).map(Self).ok_or_else(|| {
                ApiError::bad_request(format!("timezone must be a UTC offset like +07:00, got {tz:?}"))
            }),
        }
    }
}
