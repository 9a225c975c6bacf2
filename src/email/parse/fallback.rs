//! Last-resort date recovery for `Received` values that do not tokenize.
//!
//! Only the calendar date is recovered. Whatever time and zone sit next to it
//! came out of text that failed to parse, so the result is pinned to midnight
//! UTC.

use chrono::offset::FixedOffset;
use chrono::DateTime;
use chrono::NaiveDate;
use chrono::TimeZone;
use lazy_static::lazy_static;
use regex::Captures;
use regex::Regex;

use super::super::error::EmailError;

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

lazy_static! {
    // [ day-of-week "," ] day month year
    static ref LOOSE_DATE: Regex = Regex::new(
        r"(?i)(?:\b(?:mon|tue|wed|thu|fri|sat|sun),\s*)?\b(\d{1,2})\s+(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)\s+(\d{4})\b"
    )
    .unwrap();
}

fn calendar_date(caps: &Captures) -> Option<NaiveDate> {
    let day = caps[1].parse().ok()?;
    let month = caps[2].to_ascii_lowercase();
    let month = MONTHS.iter().position(|m| *m == month)? as u32 + 1;
    let year = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Find the first real calendar date anywhere in `raw`, at `00:00:00 +0000`.
pub fn fallback_date(raw: &str) -> Result<DateTime<FixedOffset>, EmailError<'static>> {
    let utc = FixedOffset::east_opt(0).ok_or(EmailError::DatePatternNotFound)?;
    LOOSE_DATE
        .captures_iter(raw)
        .filter_map(|caps| calendar_date(&caps))
        .filter_map(|date| date.and_hms_opt(0, 0, 0))
        .find_map(|midnight| utc.from_local_datetime(&midnight).single())
        .ok_or(EmailError::DatePatternNotFound)
}
