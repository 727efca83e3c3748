//! Generic date-string parsing
//!
//! Timezone-less inputs are read as UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use tv_core::Timestamp;

/// Integers with magnitude below this are read as epoch seconds, above as milliseconds
const EPOCH_SECONDS_LIMIT: i64 = 100_000_000_000;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
];

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Parse a timestamp cell; `None` if no known layout matches
pub fn parse_timestamp(raw: &str) -> Option<Timestamp> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(epoch) = value.parse::<i64>() {
        return from_epoch(epoch);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(value, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return date.and_hms_opt(0, 0, 0).map(|naive| Utc.from_utc_datetime(&naive));
        }
    }

    None
}

fn from_epoch(epoch: i64) -> Option<Timestamp> {
    if epoch.abs() < EPOCH_SECONDS_LIMIT {
        Utc.timestamp_opt(epoch, 0).single()
    } else {
        Utc.timestamp_millis_opt(epoch).single()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd_hms(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> Timestamp {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_iso_layouts() {
        let expected = ymd_hms(2024, 3, 1, 12, 30, 15);
        assert_eq!(parse_timestamp("2024-03-01T12:30:15Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-01T14:30:15+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-01 12:30:15"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-01T12:30:15"), Some(expected));
        assert_eq!(parse_timestamp(" 2024/03/01 12:30:15 "), Some(expected));
    }

    #[test]
    fn test_fractional_seconds() {
        let parsed = parse_timestamp("2024-03-01 12:30:15.250").unwrap();
        assert_eq!(parsed.timestamp_millis(), ymd_hms(2024, 3, 1, 12, 30, 15).timestamp_millis() + 250);
    }

    #[test]
    fn test_date_only() {
        assert_eq!(parse_timestamp("2024-03-01"), Some(ymd_hms(2024, 3, 1, 0, 0, 0)));
        assert_eq!(parse_timestamp("03/01/2024"), Some(ymd_hms(2024, 3, 1, 0, 0, 0)));
    }

    #[test]
    fn test_epoch_seconds_and_millis() {
        assert_eq!(parse_timestamp("1700000000"), Utc.timestamp_opt(1_700_000_000, 0).single());
        assert_eq!(parse_timestamp("1700000000123"), Utc.timestamp_millis_opt(1_700_000_000_123).single());
    }

    #[test]
    fn test_unparseable() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp("2024-13-45"), None);
    }
}
