use anyhow::{anyhow, Result};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

/// Parses a `YYYY-MM-DD` date and `HH:MM` time pair as a UTC timestamp.
/// Times are timezone-normalized at the boundary; everything downstream
/// works in UTC.
pub fn parse_date_time(date: &str, time: &str) -> Result<DateTime<Utc>> {
    let combined = format!("{} {}", date.trim(), time.trim());
    let naive = NaiveDateTime::parse_from_str(&combined, "%Y-%m-%d %H:%M")
        .map_err(|_| anyhow!("Invalid date/time '{}'", combined))?;

    Ok(Utc.from_utc_datetime(&naive))
}

/// Formats a timestamp the way task listings display it.
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M UTC").to_string()
}
