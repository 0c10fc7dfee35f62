use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;

/// Parse a 14-digit Wayback capture timestamp (YYYYMMDDhhmmss, UTC).
pub fn parse_wayback_timestamp(ts: &str) -> Result<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(ts, "%Y%m%d%H%M%S")
        .with_context(|| format!("Invalid Wayback timestamp: {ts}"))?;
    Ok(naive.and_utc())
}

/// Calendar date of a capture in the beach's local timezone.
///
/// With no timezone the UTC date is used instead; the caller decides how
/// loudly to report that.
pub fn local_date(ts: &str, tz: Option<Tz>) -> Result<NaiveDate> {
    let utc = parse_wayback_timestamp(ts)?;
    Ok(match tz {
        Some(tz) => utc.with_timezone(&tz).date_naive(),
        None => utc.date_naive(),
    })
}

/// Today's date in the given timezone, for the daily logger.
pub fn today_local(tz: Option<Tz>) -> NaiveDate {
    let now = Utc::now();
    match tz {
        Some(tz) => now.with_timezone(&tz).date_naive(),
        None => now.date_naive(),
    }
}

/// Current instant formatted the way every log row records it:
/// second precision, trailing Z.
pub fn fetched_at_utc() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}
