//! Canonical wire format for timestamps: `YYYY-MM-DD HH:MM:SS`.
//!
//! Parsing also accepts the ISO `T` separator and fractional seconds, which
//! are truncated. Output never carries fractions or a timezone.

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Deserializer, Serializer};

pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const ACCEPTED: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

pub fn format(dt: &NaiveDateTime) -> String {
    dt.format(FORMAT).to_string()
}

pub fn parse(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    ACCEPTED
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
        .and_then(|dt| dt.with_nanosecond(0))
}

pub fn serialize<S: Serializer>(dt: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format(dt))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse(&raw).ok_or_else(|| {
        serde::de::Error::custom(format!("invalid datetime '{raw}', expected YYYY-MM-DD HH:MM:SS"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap().and_hms_opt(9, 30, 0).unwrap()
    }

    #[test]
    fn formats_with_space_separator() {
        assert_eq!(format(&sample()), "2025-03-14 09:30:00");
    }

    #[test]
    fn parses_space_and_iso_forms() {
        assert_eq!(parse("2025-03-14 09:30:00"), Some(sample()));
        assert_eq!(parse("2025-03-14T09:30:00"), Some(sample()));
        assert_eq!(parse(" 2025-03-14 09:30:00.789 "), Some(sample()));
    }

    #[test]
    fn rejects_dates_without_time_and_epochs() {
        assert_eq!(parse("2025-03-14"), None);
        assert_eq!(parse("1741944600"), None);
        assert_eq!(parse(""), None);
    }
}
