//
//  redmine-client
//  codec/date.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Date Codec
//!
//! Reads every date encoding the server has used over its history and writes
//! exactly one.
//!
//! ## Accepted Forms
//!
//! | Form | Example |
//! |------|---------|
//! | RFC 3339 | `2024-03-05T10:20:30Z` |
//! | short, `/` | `2024/03/05` |
//! | short, `-` | `2024-03-05` |
//! | long, `/`, numeric offset | `2024/03/05 10:20:30 +0100` |
//! | long, `-`, `Z` or offset, optional fraction | `2024-03-05T10:20:30.125+01:00` |
//!
//! The character at index 4 decides between the `/` family and the `-`
//! family, so only the candidates of one family are tried.
//!
//! ## Written Forms
//!
//! - timestamps: `YYYY-MM-DDTHH:MM:SSZ`, always UTC
//! - dates: `YYYY-MM-DD`
//!
//! ## Example
//!
//! ```rust
//! use redmine_client::codec::date::{format_datetime, parse_datetime};
//!
//! let ts = parse_datetime("2024/03/05 10:20:30 +0100").unwrap();
//! assert_eq!(format_datetime(&ts), "2024-03-05T09:20:30Z");
//! ```

use chrono::{DateTime, FixedOffset, NaiveDate, SecondsFormat, TimeZone, Utc};

use crate::api::common::{ApiError, Result};

const SHORT_SLASH: &str = "%Y/%m/%d";
const SHORT_DASH: &str = "%Y-%m-%d";
const LONG_SLASH: &str = "%Y/%m/%d %H:%M:%S %z";
const LONG_DASH: &str = "%Y-%m-%dT%H:%M:%S%.f%z";

/// How much of a timestamp to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    /// Calendar date only.
    Date,
    /// Date and time of day.
    DateTime,
}

/// Parses a timestamp in any of the accepted forms.
///
/// Pure dates resolve to midnight UTC.
///
/// # Errors
///
/// Returns [`ApiError::Format`] naming `text` when no form matches.
pub fn parse_datetime(text: &str) -> Result<DateTime<Utc>> {
    let text = text.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Ok(ts.with_timezone(&Utc));
    }

    let parsed = if uses_slashes(text) {
        DateTime::parse_from_str(text, LONG_SLASH)
            .ok()
            .or_else(|| short_as_midnight(text, SHORT_SLASH))
    } else {
        DateTime::parse_from_str(&normalize_offset(text), LONG_DASH)
            .ok()
            .or_else(|| short_as_midnight(text, SHORT_DASH))
    };

    parsed
        .map(|ts| ts.with_timezone(&Utc))
        .ok_or_else(|| unparsable(text))
}

/// Parses a calendar date.
///
/// Short forms are tried first; any timestamp form is accepted as well and
/// reduced to its UTC date.
///
/// # Errors
///
/// Returns [`ApiError::Format`] naming `text` when no form matches.
pub fn parse_date(text: &str) -> Result<NaiveDate> {
    let text = text.trim();
    let pattern = if uses_slashes(text) { SHORT_SLASH } else { SHORT_DASH };

    match NaiveDate::parse_from_str(text, pattern) {
        Ok(date) => Ok(date),
        Err(_) => parse_datetime(text)
            .map(|ts| ts.date_naive())
            .map_err(|_| unparsable(text)),
    }
}

/// Writes a timestamp in the canonical form.
pub fn format_datetime(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Writes a date in the canonical form.
pub fn format_date(date: &NaiveDate) -> String {
    date.format(SHORT_DASH).to_string()
}

/// Writes a timestamp at the requested precision.
pub fn format(ts: &DateTime<Utc>, precision: Precision) -> String {
    match precision {
        Precision::Date => format_date(&ts.date_naive()),
        Precision::DateTime => format_datetime(ts),
    }
}

fn uses_slashes(text: &str) -> bool {
    text.as_bytes().get(4) == Some(&b'/')
}

/// `Z` becomes `+0000` and `+HH:MM` becomes `+HHMM`.
fn normalize_offset(text: &str) -> String {
    if let Some(stripped) = text.strip_suffix('Z') {
        return format!("{stripped}+0000");
    }

    let bytes = text.as_bytes();
    let len = bytes.len();
    if len > 6 && matches!(bytes[len - 6], b'+' | b'-') && bytes[len - 3] == b':' {
        let mut normalized = text.to_string();
        normalized.remove(len - 3);
        return normalized;
    }

    text.to_string()
}

fn short_as_midnight(text: &str, pattern: &str) -> Option<DateTime<FixedOffset>> {
    let date = NaiveDate::parse_from_str(text, pattern).ok()?;
    let utc = FixedOffset::east_opt(0)?;
    utc.from_local_datetime(&date.and_hms_opt(0, 0, 0)?).single()
}

fn unparsable(text: &str) -> ApiError {
    ApiError::Format(format!("unparsable date '{text}'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn canonical(text: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(text).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_legacy_forms_round_trip_to_canonical() {
        let cases = [
            ("2024/03/05", "2024-03-05T00:00:00Z"),
            ("2024-03-05", "2024-03-05T00:00:00Z"),
            ("2024/03/05 10:20:30 +0100", "2024-03-05T09:20:30Z"),
            ("2024-03-05T10:20:30Z", "2024-03-05T10:20:30Z"),
            ("2024-03-05T10:20:30+0200", "2024-03-05T08:20:30Z"),
            ("2024-03-05T10:20:30.250Z", "2024-03-05T10:20:30.250Z"),
            ("2024-03-05T10:20:30.250-05:00", "2024-03-05T15:20:30.250Z"),
        ];

        for (legacy, modern) in cases {
            let parsed = parse_datetime(legacy).unwrap();
            let reparsed = parse_datetime(&format_datetime(&parsed)).unwrap();
            let expected = canonical(modern);
            assert_eq!(
                reparsed.with_nanosecond(0),
                expected.with_nanosecond(0),
                "{legacy}"
            );
            assert_eq!(parsed, expected, "{legacy}");
        }
    }

    #[test]
    fn test_writes_are_always_modern() {
        let ts = parse_datetime("2012/01/02 03:04:05 +0000").unwrap();
        assert_eq!(format_datetime(&ts), "2012-01-02T03:04:05Z");
        assert_eq!(format(&ts, Precision::Date), "2012-01-02");
        assert_eq!(format(&ts, Precision::DateTime), "2012-01-02T03:04:05Z");
    }

    #[test]
    fn test_parse_date_accepts_both_separators_and_timestamps() {
        let expected = NaiveDate::from_ymd_opt(2011, 12, 31).unwrap();
        assert_eq!(parse_date("2011/12/31").unwrap(), expected);
        assert_eq!(parse_date("2011-12-31").unwrap(), expected);
        assert_eq!(parse_date("2011-12-31T10:00:00Z").unwrap(), expected);
        assert_eq!(format_date(&expected), "2011-12-31");
    }

    #[test]
    fn test_failures_name_the_text() {
        for bad in ["", "yesterday", "2024.03.05", "2024/13/45", "12/31/2011"] {
            let err = parse_datetime(bad).unwrap_err();
            assert!(matches!(&err, ApiError::Format(msg) if msg.contains(bad)), "{bad}");
        }
        assert!(parse_date("31-12-2011").is_err());
    }
}
