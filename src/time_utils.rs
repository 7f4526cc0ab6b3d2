// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time parsing and formatting.

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};

/// Format a wall-clock timestamp as a zero-padded `HH:MM` label.
pub fn format_hhmm(t: NaiveDateTime) -> String {
    t.format("%H:%M").to_string()
}

/// Parse an RFC3339 timestamp into local wall-clock time.
/// Returns `None` for anything unparseable.
pub fn parse_local(ts: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_rfc3339(ts)
        .ok()
        .map(|dt| dt.with_timezone(&Local).naive_local())
}

/// Local `YYYY-MM-DD` key for an RFC3339 timestamp.
pub fn local_date_key(ts: &str) -> Option<String> {
    parse_local(ts).map(|dt| dt.date().format("%Y-%m-%d").to_string())
}

/// All calendar days of a month, ascending. Empty for an invalid year/month.
pub fn month_days(year: i32, month: u32) -> Vec<NaiveDate> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    let mut days = Vec::with_capacity(31);
    let mut day = first;
    while day.month() == month {
        days.push(day);
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }
    days
}

/// UTC query range covering one local calendar day
/// (`00:00:00.000` through `23:59:59.999`).
pub fn local_day_range(date: NaiveDate) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = Local
        .from_local_datetime(&date.and_hms_opt(0, 0, 0)?)
        .earliest()?;
    let end = Local
        .from_local_datetime(&date.and_hms_milli_opt(23, 59, 59, 999)?)
        .latest()?;
    Some((start.with_timezone(&Utc), end.with_timezone(&Utc)))
}

/// UTC query range covering one local calendar month.
pub fn local_month_range(year: i32, month: u32) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let days = month_days(year, month);
    let first = days.first()?;
    let last = days.last()?;
    let (start, _) = local_day_range(*first)?;
    let (_, end) = local_day_range(*last)?;
    Some((start, end))
}

/// Format a UTC timestamp for Clockify query parameters
/// (RFC3339 with milliseconds and a `Z` suffix).
pub fn format_utc_query(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}
