// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Timesheet consolidation engine.
//!
//! Reduces a day's possibly-overlapping time entries to one tab-delimited
//! row: day start, break start, break end, day end. The break is guessed by
//! scoring the gaps between merged work spans, with a strong bias toward a
//! gap sitting inside the usual lunch window.
//!
//! Everything here is pure and synchronous; callers fetch the entries.

use crate::models::TimeEntry;
use crate::time_utils::{format_hhmm, month_days, parse_local};
use chrono::{NaiveDate, NaiveDateTime, Timelike};
use std::collections::HashMap;

/// Gaps of this many minutes or less are treated as noise between
/// near-contiguous entries, not as a break.
pub const MIN_GAP_MINUTES: f64 = 15.0;

/// Lunch window bounds, in fractional hours of the local day.
const LUNCH_WINDOW_START_HOUR: f64 = 11.0;
const LUNCH_WINDOW_END_HOUR: f64 = 15.0;

/// Score bonus for a gap fully inside the lunch window. Tunable; it only has
/// to dwarf any plausible gap length in minutes so a midday gap beats a
/// longer gap elsewhere in the day.
const LUNCH_GAP_BIAS: f64 = 1000.0;

/// Placeholder row emitted for days without a computable summary, keeping
/// one output line per calendar day so spreadsheet columns stay aligned.
pub const EMPTY_DAY_ROW: &str = "\t\t\t";

/// One contiguous period of recorded activity, in local wall-clock time.
/// Invariant: `end > start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkInterval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// Idle period between two merged work spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkGap {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// Extract the valid intervals from a day's entries.
///
/// Entries with no end, an unparseable timestamp, or an end not after the
/// start are silently excluded. Partial records are expected from a live
/// integration; this is a data-quality filter, not an error path.
pub fn intervals_from_entries(entries: &[TimeEntry]) -> Vec<WorkInterval> {
    entries
        .iter()
        .filter_map(|entry| {
            let end_raw = entry.time_interval.end.as_deref()?;
            let start = parse_local(&entry.time_interval.start)?;
            let end = parse_local(end_raw)?;
            (end > start).then_some(WorkInterval { start, end })
        })
        .collect()
}

/// Collapse overlapping or touching intervals into non-overlapping spans,
/// sorted ascending by start. Idempotent: re-merging the output is a no-op.
pub fn merge_intervals(mut intervals: Vec<WorkInterval>) -> Vec<WorkInterval> {
    intervals.sort_by_key(|iv| iv.start);

    let mut iter = intervals.into_iter();
    let Some(first) = iter.next() else {
        return Vec::new();
    };

    let mut merged = Vec::new();
    let mut open = first;
    for current in iter {
        if current.start <= open.end {
            if current.end > open.end {
                open.end = current.end;
            }
        } else {
            merged.push(open);
            open = current;
        }
    }
    merged.push(open);
    merged
}

fn minutes_between(a: NaiveDateTime, b: NaiveDateTime) -> f64 {
    (b - a).num_seconds() as f64 / 60.0
}

fn fractional_hour(t: NaiveDateTime) -> f64 {
    t.hour() as f64 + t.minute() as f64 / 60.0
}

fn score_lunch_gap(gap: &WorkGap, gap_minutes: f64) -> f64 {
    let inside_lunch_window = fractional_hour(gap.start) >= LUNCH_WINDOW_START_HOUR
        && fractional_hour(gap.end) <= LUNCH_WINDOW_END_HOUR;
    if inside_lunch_window {
        gap_minutes + LUNCH_GAP_BIAS
    } else {
        gap_minutes
    }
}

/// Pick the most plausible break among the gaps between merged spans.
///
/// Gaps of [`MIN_GAP_MINUTES`] or less are discarded. The rest are scored by
/// length, with the lunch bias added when the gap falls entirely inside the
/// lunch window; the highest score wins and ties keep the earliest gap.
/// `None` when fewer than two spans exist or no gap clears the threshold.
pub fn best_gap(merged: &[WorkInterval]) -> Option<WorkGap> {
    let mut best: Option<WorkGap> = None;
    let mut best_score = -1.0_f64;

    for pair in merged.windows(2) {
        let gap = WorkGap {
            start: pair[0].end,
            end: pair[1].start,
        };
        let gap_minutes = minutes_between(gap.start, gap.end);
        if gap_minutes <= MIN_GAP_MINUTES {
            continue;
        }

        let score = score_lunch_gap(&gap, gap_minutes);
        if score > best_score {
            best_score = score;
            best = Some(gap);
        }
    }

    best
}

/// Render one day's consolidated row from already-validated intervals.
///
/// Empty input yields an empty string. Without a qualifying break the two
/// middle fields stay blank so the column layout is preserved.
pub fn summarize_intervals(intervals: Vec<WorkInterval>) -> String {
    let merged = merge_intervals(intervals);

    let (Some(first), Some(last)) = (merged.first(), merged.last()) else {
        return String::new();
    };
    let day_start = format_hhmm(first.start);
    let day_end = format_hhmm(last.end);

    match best_gap(&merged) {
        Some(gap) => format!(
            "{}\t{}\t{}\t{}",
            day_start,
            format_hhmm(gap.start),
            format_hhmm(gap.end),
            day_end
        ),
        None => format!("{}\t\t\t{}", day_start, day_end),
    }
}

/// Render one day's consolidated row from raw time entries.
pub fn summarize_day(entries: &[TimeEntry]) -> String {
    summarize_intervals(intervals_from_entries(entries))
}

/// Render one row per calendar day of the month, joined by newlines.
///
/// Days strictly after `today` are emitted as placeholder rows without any
/// computation; so are days with no entries or no valid intervals. Line
/// position is determined by the calendar date, never by data arrival order,
/// so the output can be pasted into a fixed-row spreadsheet template.
pub fn summarize_month(
    by_date: &HashMap<String, Vec<TimeEntry>>,
    year: i32,
    month: u32,
    today: NaiveDate,
) -> String {
    let rows: Vec<String> = month_days(year, month)
        .into_iter()
        .map(|day| {
            if day > today {
                return EMPTY_DAY_ROW.to_string();
            }

            let date_key = day.format("%Y-%m-%d").to_string();
            let row = by_date
                .get(&date_key)
                .map(|entries| summarize_day(entries))
                .unwrap_or_default();

            if row.is_empty() {
                EMPTY_DAY_ROW.to_string()
            } else {
                row
            }
        })
        .collect();

    rows.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 2)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn iv(start: NaiveDateTime, end: NaiveDateTime) -> WorkInterval {
        WorkInterval { start, end }
    }

    #[test]
    fn test_lunch_window_bounds_inclusive() {
        // Exactly 11:00–15:00 counts as inside the window.
        let gap = WorkGap {
            start: at(11, 0),
            end: at(15, 0),
        };
        assert_eq!(score_lunch_gap(&gap, 240.0), 240.0 + LUNCH_GAP_BIAS);

        // Starting a minute early falls outside.
        let gap = WorkGap {
            start: at(10, 59),
            end: at(11, 30),
        };
        assert_eq!(score_lunch_gap(&gap, 31.0), 31.0);

        // Ending past 15:00 falls outside.
        let gap = WorkGap {
            start: at(14, 50),
            end: at(15, 1),
        };
        assert_eq!(score_lunch_gap(&gap, 11.0), 11.0);
    }

    #[test]
    fn test_touching_intervals_merge() {
        let merged = merge_intervals(vec![iv(at(9, 0), at(10, 0)), iv(at(10, 0), at(11, 0))]);
        assert_eq!(merged, vec![iv(at(9, 0), at(11, 0))]);
    }

    #[test]
    fn test_contained_interval_does_not_shrink_span() {
        let merged = merge_intervals(vec![iv(at(9, 0), at(12, 0)), iv(at(10, 0), at(10, 30))]);
        assert_eq!(merged, vec![iv(at(9, 0), at(12, 0))]);
    }

    #[test]
    fn test_best_gap_needs_two_spans() {
        assert!(best_gap(&[]).is_none());
        assert!(best_gap(&[iv(at(9, 0), at(17, 0))]).is_none());
    }
}
