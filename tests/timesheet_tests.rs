// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Consolidation engine tests.
//!
//! These cover the properties the spreadsheet paste relies on: merged spans
//! never overlap, the reported break is the midday gap when one exists, and
//! every calendar day of a month yields exactly one output line.

use chrono::{Local, NaiveDate, NaiveDateTime, TimeZone};
use std::collections::HashMap;
use timesheet_relay::models::{TimeEntry, TimeInterval};
use timesheet_relay::services::timesheet::{
    best_gap, intervals_from_entries, merge_intervals, summarize_day, summarize_intervals,
    summarize_month, WorkInterval, EMPTY_DAY_ROW,
};

fn at(h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 6, 2)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

fn iv(start: NaiveDateTime, end: NaiveDateTime) -> WorkInterval {
    WorkInterval { start, end }
}

/// RFC3339 timestamp carrying the local offset, so the engine's
/// local-wall-clock view matches the given hour/minute on any machine.
fn local_ts(day: u32, h: u32, m: u32) -> String {
    Local
        .with_ymd_and_hms(2025, 6, day, h, m, 0)
        .unwrap()
        .to_rfc3339()
}

fn entry(start: String, end: Option<String>) -> TimeEntry {
    TimeEntry {
        id: "entry".to_string(),
        description: String::new(),
        project_id: None,
        project_name: None,
        time_interval: TimeInterval {
            start,
            end,
            duration: None,
        },
    }
}

// ─── Merging ─────────────────────────────────────────────────

#[test]
fn test_merge_empty_input() {
    assert!(merge_intervals(Vec::new()).is_empty());
}

#[test]
fn test_merge_overlapping_pair_covers_union() {
    let merged = merge_intervals(vec![iv(at(9, 0), at(11, 0)), iv(at(10, 30), at(12, 0))]);
    assert_eq!(merged, vec![iv(at(9, 0), at(12, 0))]);
}

#[test]
fn test_merge_normalizes_input_order() {
    let forward = merge_intervals(vec![iv(at(9, 0), at(10, 0)), iv(at(14, 0), at(15, 0))]);
    let reversed = merge_intervals(vec![iv(at(14, 0), at(15, 0)), iv(at(9, 0), at(10, 0))]);
    assert_eq!(forward, reversed);
    assert_eq!(forward.len(), 2);
}

#[test]
fn test_merge_is_idempotent() {
    let once = merge_intervals(vec![
        iv(at(9, 0), at(10, 0)),
        iv(at(9, 30), at(11, 0)),
        iv(at(13, 0), at(17, 0)),
        iv(at(16, 0), at(18, 0)),
    ]);
    let twice = merge_intervals(once.clone());
    assert_eq!(once, twice);
}

#[test]
fn test_merged_spans_sorted_and_disjoint() {
    let merged = merge_intervals(vec![
        iv(at(13, 0), at(14, 0)),
        iv(at(9, 0), at(9, 45)),
        iv(at(9, 30), at(10, 15)),
        iv(at(16, 0), at(16, 30)),
    ]);
    assert!(merged.windows(2).all(|w| w[0].end < w[1].start));
}

// ─── Gap selection ───────────────────────────────────────────

#[test]
fn test_gap_of_exactly_fifteen_minutes_is_noise() {
    let merged = vec![iv(at(9, 0), at(12, 0)), iv(at(12, 15), at(17, 0))];
    assert!(best_gap(&merged).is_none());
}

#[test]
fn test_gap_of_sixteen_minutes_is_a_candidate() {
    let merged = vec![iv(at(9, 0), at(12, 0)), iv(at(12, 16), at(17, 0))];
    let gap = best_gap(&merged).expect("16-minute gap should qualify");
    assert_eq!(gap.start, at(12, 0));
    assert_eq!(gap.end, at(12, 16));
}

#[test]
fn test_midday_gap_beats_longer_morning_gap() {
    // 08:00-08:21 morning gap (21 min, outside the lunch window) vs
    // 12:00-12:20 midday gap (20 min, inside). The midday gap must win.
    let merged = vec![
        iv(at(7, 0), at(8, 0)),
        iv(at(8, 21), at(12, 0)),
        iv(at(12, 20), at(17, 0)),
    ];
    let gap = best_gap(&merged).expect("should find a gap");
    assert_eq!(gap.start, at(12, 0));
    assert_eq!(gap.end, at(12, 20));
}

#[test]
fn test_longest_gap_wins_without_midday_candidate() {
    let merged = vec![
        iv(at(7, 0), at(7, 30)),
        iv(at(8, 0), at(16, 0)),
        iv(at(17, 0), at(18, 0)),
    ];
    let gap = best_gap(&merged).expect("should find a gap");
    assert_eq!(gap.start, at(16, 0));
    assert_eq!(gap.end, at(17, 0));
}

#[test]
fn test_equal_scores_keep_the_earlier_gap() {
    // Two 30-minute gaps, both outside the lunch window.
    let merged = vec![
        iv(at(6, 0), at(7, 0)),
        iv(at(7, 30), at(9, 0)),
        iv(at(9, 30), at(10, 0)),
    ];
    let gap = best_gap(&merged).expect("should find a gap");
    assert_eq!(gap.start, at(7, 0));
}

// ─── Day rendering ───────────────────────────────────────────

#[test]
fn test_day_with_lunch_break_renders_four_labels() {
    // Spec scenario: work 09:00-12:00, 12:20-17:01, 17:22-18:00. The later
    // 21-minute gap is longer than the 20-minute lunch gap but scores lower.
    let text = summarize_intervals(vec![
        iv(at(9, 0), at(12, 0)),
        iv(at(12, 20), at(17, 1)),
        iv(at(17, 22), at(18, 0)),
    ]);
    assert_eq!(text, "09:00\t12:00\t12:20\t18:00");
}

#[test]
fn test_continuous_day_keeps_blank_break_columns() {
    let text = summarize_intervals(vec![iv(at(9, 0), at(17, 30))]);
    assert_eq!(text, "09:00\t\t\t17:30");
}

#[test]
fn test_empty_day_renders_empty_string() {
    assert_eq!(summarize_intervals(Vec::new()), "");
    assert_eq!(summarize_day(&[]), "");
}

#[test]
fn test_summarize_day_from_entries() {
    let entries = vec![
        entry(local_ts(2, 9, 0), Some(local_ts(2, 12, 0))),
        entry(local_ts(2, 13, 0), Some(local_ts(2, 17, 0))),
    ];
    assert_eq!(summarize_day(&entries), "09:00\t12:00\t13:00\t17:00");
}

// ─── Entry filtering ─────────────────────────────────────────

#[test]
fn test_running_timer_is_excluded() {
    let entries = vec![
        entry(local_ts(2, 9, 0), Some(local_ts(2, 12, 0))),
        entry(local_ts(2, 13, 0), None),
    ];
    assert_eq!(intervals_from_entries(&entries).len(), 1);
}

#[test]
fn test_inverted_and_zero_length_entries_are_excluded() {
    let entries = vec![
        // end before start
        entry(local_ts(2, 12, 0), Some(local_ts(2, 9, 0))),
        // end equal to start
        entry(local_ts(2, 9, 0), Some(local_ts(2, 9, 0))),
    ];
    assert!(intervals_from_entries(&entries).is_empty());
}

#[test]
fn test_unparseable_timestamps_are_excluded() {
    let entries = vec![
        entry("garbage".to_string(), Some(local_ts(2, 12, 0))),
        entry(local_ts(2, 9, 0), Some("also garbage".to_string())),
    ];
    assert!(intervals_from_entries(&entries).is_empty());
    assert_eq!(summarize_day(&entries), "");
}

// ─── Month rendering ─────────────────────────────────────────

#[test]
fn test_month_with_single_populated_day() {
    // September 2025 has 30 days. Data exists only on the 15th; every other
    // day must still produce exactly one placeholder line.
    let mut by_date: HashMap<String, Vec<TimeEntry>> = HashMap::new();
    by_date.insert(
        "2025-09-15".to_string(),
        vec![entry(
            Local
                .with_ymd_and_hms(2025, 9, 15, 9, 0, 0)
                .unwrap()
                .to_rfc3339(),
            Some(
                Local
                    .with_ymd_and_hms(2025, 9, 15, 17, 0, 0)
                    .unwrap()
                    .to_rfc3339(),
            ),
        )],
    );

    let today = NaiveDate::from_ymd_opt(2025, 10, 1).unwrap();
    let text = summarize_month(&by_date, 2025, 9, today);
    let lines: Vec<&str> = text.split('\n').collect();

    assert_eq!(lines.len(), 30);
    assert_eq!(lines[14], "09:00\t\t\t17:00");
    assert_eq!(lines.iter().filter(|&&l| l == EMPTY_DAY_ROW).count(), 29);
}

#[test]
fn test_future_days_are_placeholders_even_with_data() {
    let mut by_date: HashMap<String, Vec<TimeEntry>> = HashMap::new();
    for day in [10u32, 20] {
        by_date.insert(
            format!("2025-06-{:02}", day),
            vec![entry(local_ts(day, 9, 0), Some(local_ts(day, 17, 0)))],
        );
    }

    // Fixed "today" in mid-month: day 10 is computed, day 20 is future.
    let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
    let text = summarize_month(&by_date, 2025, 6, today);
    let lines: Vec<&str> = text.split('\n').collect();

    assert_eq!(lines.len(), 30);
    assert_eq!(lines[9], "09:00\t\t\t17:00");
    assert_eq!(lines[19], EMPTY_DAY_ROW);
}

#[test]
fn test_today_itself_is_computed() {
    let mut by_date: HashMap<String, Vec<TimeEntry>> = HashMap::new();
    by_date.insert(
        "2025-06-15".to_string(),
        vec![entry(local_ts(15, 8, 30), Some(local_ts(15, 16, 0)))],
    );

    let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
    let text = summarize_month(&by_date, 2025, 6, today);
    let lines: Vec<&str> = text.split('\n').collect();

    assert_eq!(lines[14], "08:30\t\t\t16:00");
}

#[test]
fn test_month_line_order_follows_calendar_not_insertion() {
    let mut by_date: HashMap<String, Vec<TimeEntry>> = HashMap::new();
    // Inserted out of order on purpose; HashMap iteration order is
    // arbitrary anyway, which is the point.
    for day in [25u32, 3, 17] {
        by_date.insert(
            format!("2025-06-{:02}", day),
            vec![entry(local_ts(day, 9, 0), Some(local_ts(day, 10, 0)))],
        );
    }

    let today = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
    let text = summarize_month(&by_date, 2025, 6, today);
    let lines: Vec<&str> = text.split('\n').collect();

    for (index, line) in lines.iter().enumerate() {
        let populated = matches!(index + 1, 3 | 17 | 25);
        assert_eq!(
            *line != EMPTY_DAY_ROW,
            populated,
            "line {} unexpected: {:?}",
            index + 1,
            line
        );
    }
}
