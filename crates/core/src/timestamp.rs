#![forbid(unsafe_code)]

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, UtcOffset};

const DATE_TIME_FORMATS: &[&[BorrowedFormatItem<'static>]] = &[
    format_description!("[year]-[month padding:none]-[day padding:none] [hour]:[minute]:[second].[subsecond]"),
    format_description!("[year]-[month padding:none]-[day padding:none] [hour]:[minute]:[second]"),
    format_description!("[year]-[month padding:none]-[day padding:none] [hour]:[minute]"),
    format_description!("[year]/[month padding:none]/[day padding:none] [hour]:[minute]:[second]"),
];

// Month-first wins over day-first for slash dates; day-first only applies when
// the first field cannot be a month.
const DATE_FORMATS: &[&[BorrowedFormatItem<'static>]] = &[
    format_description!("[year]-[month padding:none]-[day padding:none]"),
    format_description!("[year]/[month padding:none]/[day padding:none]"),
    format_description!("[month padding:none]/[day padding:none]/[year]"),
    format_description!("[day padding:none]/[month padding:none]/[year]"),
    format_description!("[day padding:none]-[month padding:none]-[year]"),
];

const DATE_ONLY: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");
const DATE_TIME: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Legacy spreadsheet exports spell "no value" in several ways.
const EMPTY_MARKERS: &[&str] = &["", "nat", "nan", "none", "null"];

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized date/time value '{value}'")]
pub struct TimestampParseError {
    pub value: String,
}

/// A zone-less wall-clock instant at second resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(PrimitiveDateTime);

impl Timestamp {
    pub fn new(value: PrimitiveDateTime) -> Self {
        Self(value.replace_nanosecond(0).unwrap_or(value))
    }

    pub fn from_date(date: Date) -> Self {
        Self(date.midnight())
    }

    pub fn from_offset(value: OffsetDateTime) -> Self {
        Self::new(PrimitiveDateTime::new(value.date(), value.time()))
    }

    pub fn date(self) -> Date {
        self.0.date()
    }

    /// Parses the mixed formats found in hand-maintained spreadsheets.
    ///
    /// Blank cells (and the usual "NaT"/"nan" spellings) are `Ok(None)`.
    pub fn parse_flexible(value: &str) -> Result<Option<Self>, TimestampParseError> {
        let trimmed = value.trim();
        if EMPTY_MARKERS
            .iter()
            .any(|marker| trimmed.eq_ignore_ascii_case(marker))
        {
            return Ok(None);
        }

        if let Ok(dt) = OffsetDateTime::parse(trimmed, &Rfc3339) {
            return Ok(Some(Self::from_offset(dt.to_offset(UtcOffset::UTC))));
        }

        let normalized = normalize_separator(trimmed);
        for format in DATE_TIME_FORMATS {
            if let Ok(dt) = PrimitiveDateTime::parse(&normalized, format) {
                return Ok(Some(Self::new(dt)));
            }
        }
        for format in DATE_FORMATS {
            if let Ok(date) = Date::parse(trimmed, format) {
                return Ok(Some(Self::from_date(date)));
            }
        }

        Err(TimestampParseError {
            value: trimmed.to_string(),
        })
    }

    /// Calendar rendering: date only at midnight, full time otherwise.
    pub fn render(self) -> String {
        let format = if self.0.time() == time::Time::MIDNIGHT {
            DATE_ONLY
        } else {
            DATE_TIME
        };
        self.0
            .format(format)
            .unwrap_or_else(|_| self.0.date().to_string())
    }
}

fn normalize_separator(value: &str) -> String {
    match value.as_bytes().get(10) {
        Some(b'T') | Some(b't') => {
            let mut out = String::with_capacity(value.len());
            out.push_str(&value[..10]);
            out.push(' ');
            out.push_str(&value[11..]);
            out
        }
        _ => value.to_string(),
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl FromStr for Timestamp {
    type Err = TimestampParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse_flexible(value)?.ok_or_else(|| TimestampParseError {
            value: value.to_string(),
        })
    }
}

impl Serialize for Timestamp {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
