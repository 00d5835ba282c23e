//! `/Date(<ms>[+-]HHMM)/` date strings
//!
//! The service embeds a millisecond Unix timestamp and an optional zone
//! offset in a string. Two readings exist: [`parse_json_date`] shifts the
//! instant by the offset, [`parse_json_utc_date`] ignores it for fields the
//! service already sends as UTC.
//!
//! A string that does not match is a decode anomaly: it is logged and the
//! field decodes to `None`.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

static DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/Date\((-?\d+)(?:([-+])(\d{2})(\d{2}))?\)/$").expect("valid date pattern")
});

const HOUR_IN_MS: i64 = 60 * 60 * 1000;
const MINUTE_IN_MS: i64 = 60 * 1000;

/// Splits a date string into epoch milliseconds and zone offset in milliseconds
fn split_json_date(date: &str) -> Option<(i64, i64)> {
    let caps = DATE_PATTERN.captures(date)?;
    let millis: i64 = caps.get(1)?.as_str().parse().ok()?;

    let zone = match (caps.get(2), caps.get(3), caps.get(4)) {
        (Some(sign), Some(hours), Some(minutes)) => {
            let hours: i64 = hours.as_str().parse().ok()?;
            let minutes: i64 = minutes.as_str().parse().ok()?;
            let offset = hours * HOUR_IN_MS + minutes * MINUTE_IN_MS;
            if sign.as_str() == "-" { -offset } else { offset }
        }
        _ => 0,
    };

    Some((millis, zone))
}

/// Parses a date string, applying the embedded zone offset
///
/// `/Date(1318763400000+0100)/` is `1318763400000 + 3600000` ms after the
/// epoch.
pub fn parse_json_date(date: &str) -> Option<DateTime<Utc>> {
    let Some((millis, zone)) = split_json_date(date) else {
        tracing::warn!(date, "parse_json_date failed");
        return None;
    };
    let instant = millis
        .checked_add(zone)
        .and_then(DateTime::<Utc>::from_timestamp_millis);
    if instant.is_none() {
        tracing::warn!(date, "parse_json_date out of range");
    }
    instant
}

/// Parses a date string as UTC, ignoring any embedded zone offset
pub fn parse_json_utc_date(date: &str) -> Option<DateTime<Utc>> {
    let Some((millis, _zone)) = split_json_date(date) else {
        tracing::warn!(date, "parse_json_utc_date failed");
        return None;
    };
    let instant = DateTime::<Utc>::from_timestamp_millis(millis);
    if instant.is_none() {
        tracing::warn!(date, "parse_json_utc_date out of range");
    }
    instant
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_date_applies_zone() {
        let date = parse_json_date("/Date(1318763400000+0100)/").unwrap();
        assert_eq!(date.timestamp_millis(), 1318763400000 + 3600000);

        let date = parse_json_date("/Date(1318763400000-0700)/").unwrap();
        assert_eq!(date.timestamp_millis(), 1318763400000 - 7 * 3600000);

        let date = parse_json_date("/Date(1318763400000+0530)/").unwrap();
        assert_eq!(date.timestamp_millis(), 1318763400000 + 5 * 3600000 + 30 * 60000);
    }

    #[test]
    fn test_parse_json_date_without_zone() {
        let date = parse_json_date("/Date(1318763400000)/").unwrap();
        assert_eq!(date.timestamp_millis(), 1318763400000);

        let date = parse_json_date("/Date(-86400000)/").unwrap();
        assert_eq!(date.timestamp_millis(), -86400000);
    }

    #[test]
    fn test_zone_applied_equals_utc_plus_offset() {
        for (zone, offset) in [("+0000", 0), ("+0100", 3600000), ("-1100", -39600000), ("+1245", 45900000)] {
            for millis in [0i64, 1318763400000, -1000, 1700000000123] {
                let text = format!("/Date({millis}{zone})/");
                let zoned = parse_json_date(&text).unwrap();
                let utc = parse_json_utc_date(&text).unwrap();
                assert_eq!(utc.timestamp_millis(), millis);
                assert_eq!(zoned.timestamp_millis(), utc.timestamp_millis() + offset);
            }
        }
    }

    #[test]
    fn test_parse_json_date_out_of_range() {
        for text in ["/Date(9999999999999999)/", "/Date(-9999999999999999+0100)/"] {
            assert_eq!(parse_json_date(text), None, "{text}");
            assert_eq!(parse_json_utc_date(text), None, "{text}");
        }
        assert_eq!(parse_json_date(&format!("/Date({}+0100)/", i64::MAX)), None);
    }

    #[test]
    fn test_parse_json_date_rejects_malformed() {
        for text in [
            "",
            "2011-10-16T11:10:00Z",
            "/Date()/",
            "/Date(abc)/",
            "/Date(1318763400000+01)/",
            "/Date(13187634000000100)/x",
            "Date(1318763400000)",
        ] {
            assert_eq!(parse_json_date(text), None, "{text}");
            assert_eq!(parse_json_utc_date(text), None, "{text}");
        }
    }
}
