//! Creation timestamps of chronological content.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};

/// Long-form date used on listing pages, e.g. `Tuesday 05 March 2024`.
pub const DATE_FORMAT: &str = "%A %d %B %Y";

const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S %z", "%Y-%m-%d %H:%M:%S%.f %z"];

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Parse a timestamp attribute. Values without an offset are taken as UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<FixedOffset>> {
    let value = value.trim();

    if let Ok(time) = DateTime::parse_from_rfc3339(value) {
        return Some(time);
    }

    for format in OFFSET_FORMATS {
        if let Ok(time) = DateTime::parse_from_str(value, format) {
            return Some(time);
        }
    }

    for format in NAIVE_FORMATS {
        if let Ok(time) = NaiveDateTime::parse_from_str(value, format) {
            return Some(time.and_utc().fixed_offset());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|time| time.and_utc().fixed_offset())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepted_formats() {
        let cases = [
            "2024-03-05T10:30:00+01:00",
            "2024-03-05 10:30:00 +0100",
            "2024-03-05 10:30:00.250 +0100",
            "2024-03-05 09:30:00",
            "2024-03-05T09:30:00",
            "2024-03-05 09:30",
        ];
        for case in cases {
            let time = parse_timestamp(case).unwrap_or_else(|| panic!("failed to parse {case}"));
            assert_eq!(time.timestamp(), 1_709_631_000, "{case}");
        }
    }

    #[test]
    fn test_date_only_is_midnight_utc() {
        let time = parse_timestamp("2024-03-05").unwrap();
        assert_eq!(time.format("%Y-%m-%d %H:%M:%S %z").to_string(), "2024-03-05 00:00:00 +0000");
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("2024-13-40").is_none());
    }

    #[test]
    fn test_date_format() {
        let time = parse_timestamp("2024-03-05").unwrap();
        assert_eq!(time.format(DATE_FORMAT).to_string(), "Tuesday 05 March 2024");
    }
}
