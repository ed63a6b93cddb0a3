// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire time formats: `"yyyy-mm-dd hh:mm"` for readings, `"yyyy-mm-dd"` for
//! history range parameters (spec.md §6.1).

use chrono::{NaiveDate, NaiveDateTime};

const READING_TIME_FMT: &str = "%Y-%m-%d %H:%M";
const DATE_FMT: &str = "%Y-%m-%d";

/// Parse a reading timestamp. Malformed timestamps are a schema problem,
/// not silently-ignored noise, so callers should treat the error as one.
pub fn parse_reading_time(s: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(s, READING_TIME_FMT)
}

/// Format a timestamp back into the wire reading-time representation.
pub fn format_reading_time(t: NaiveDateTime) -> String {
    t.format(READING_TIME_FMT).to_string()
}

/// Parse a history-range date (`Start`/`End` query parameters).
pub fn parse_date(s: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(s, DATE_FMT)
}

/// Format a date back into the wire history-range representation.
pub fn format_date(d: NaiveDate) -> String {
    d.format(DATE_FMT).to_string()
}

#[cfg(test)]
#[path = "time_tests.rs"]
mod tests;
