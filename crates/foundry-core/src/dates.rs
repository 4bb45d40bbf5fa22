//! Flexible date parsing for report payloads.
//!
//! The report forms submit plain `YYYY-MM-DD` strings while API clients
//! send full RFC 3339 timestamps; both must land in the same
//! `DateTime<Utc>` field with a helpful error when neither parses.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{de, Deserialize, Deserializer};

/// Parse a date string with multiple format support.
///
/// Accepts:
/// - RFC 3339 with timezone: `2026-01-03T10:30:00Z`
/// - ISO 8601 without timezone (assumes UTC): `2026-01-03T10:30:00`
/// - With fractional seconds: `2026-01-03T10:30:00.123`
/// - Date only (assumes midnight UTC): `2026-01-03`
pub fn parse_flexible_date(s: &str) -> Result<DateTime<Utc>, String> {
    let s = s.trim();

    if s.is_empty() {
        return Err("Date value cannot be empty".to_string());
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Ok(naive.and_utc());
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date.and_time(chrono::NaiveTime::MIN).and_utc());
    }

    Err(format!(
        "Invalid date format: '{s}'. Expected ISO 8601, e.g. '2026-01-03' or '2026-01-03T10:30:00Z'"
    ))
}

/// Serde helper: deserialize an optional flexible date.
///
/// Usage: `#[serde(default, deserialize_with = "dates::deserialize_opt")]`
pub fn deserialize_opt<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    match value {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => parse_flexible_date(&s)
            .map(Some)
            .map_err(de::Error::custom),
    }
}
