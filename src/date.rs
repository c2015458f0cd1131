//! Flexible parsing of front-matter dates into [`NaiveDateTime`]s.
//!
//! Authors write dates in many shapes (`2024-05-10`, `2024-05-10 08:30`,
//! `2024-05-10T08:30:00+02:00`, `May 10, 2024`, `2024-05`, ...). [`parse`]
//! tries each supported form in turn. Offset-carrying dates are reduced to the
//! wall-clock time in their own offset so that the year and month match what
//! the author wrote.
//!
//! Slash dates with the year last are read month-first (`05/10/2024` is May
//! 10th) and fall back to day-first only when that can't be a valid date
//! (`13/05/2024` is May 13th).

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::fmt;

/// Date-time formats carrying an explicit UTC offset.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f %z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M %z",
];

/// Date-time formats without an offset.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Date-only formats. These resolve to midnight.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
];

/// Year-month formats, paired with the separator used to append the first
/// day of the month.
const MONTH_FORMATS: &[(&str, &str)] = &[("-", "%Y-%m-%d"), ("/", "%Y/%m/%d")];

/// Parses `input` into a [`NaiveDateTime`]. See the module documentation for
/// the accepted forms.
pub fn parse(input: &str) -> Result<NaiveDateTime, ParseError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ParseError(input.to_owned()));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(input) {
        return Ok(dt.naive_local());
    }
    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(input, format) {
            return Ok(dt.naive_local());
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(dt);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(input, format) {
            if let Some(dt) = date.and_hms_opt(0, 0, 0) {
                return Ok(dt);
            }
        }
    }
    for (separator, format) in MONTH_FORMATS {
        let first_day = format!("{}{}01", input, separator);
        if let Ok(date) = NaiveDate::parse_from_str(&first_day, format) {
            if let Some(dt) = date.and_hms_opt(0, 0, 0) {
                return Ok(dt);
            }
        }
    }

    Err(ParseError(input.to_owned()))
}

/// Returned when a date string matches none of the supported forms. Holds the
/// offending input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError(pub String);

impl fmt::Display for ParseError {
    /// Displays a [`ParseError`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unrecognized date `{}`", self.0)
    }
}

impl std::error::Error for ParseError {}
