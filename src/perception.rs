//! Weekly perception aggregator.
//!
//! Joins the three normalized tables on the week label, producing one
//! canonical `WeeklyContext` per weekly-notes row. Output preserves the
//! weekly-notes row order. A week label that fails range parsing is a
//! documented gap, not an error: no context is produced for it and
//! aggregation continues.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::types::{
    AppUsage, CalendarEvent, CalendarSummary, ScreenTimeRecord, WeekCalendarSummary, WeeklyContext,
    WeeklyNote,
};
use crate::DEFAULT_YEAR;

/// Parse a week label like "Jun 23–29" into its inclusive date range.
///
/// Both the Greek/typographic dashes and the plain hyphen are accepted as
/// separators. The end day is taken within the start month (the sources
/// never produce a week label spanning a month boundary).
pub fn parse_week_range(week_label: &str, default_year: i32) -> Option<(NaiveDate, NaiveDate)> {
    let normalized = week_label
        .replace('\u{2013}', "-")
        .replace('\u{2014}', "-");
    let mut parts = normalized.splitn(2, '-');
    let start_token = parts.next()?.trim();
    let end_token = parts.next()?.trim();

    let start = NaiveDate::parse_from_str(&format!("{start_token} {default_year}"), "%b %d %Y")
        .ok()?;
    let end_day: u32 = end_token.parse().ok()?;
    let end = start.with_day(end_day)?;
    Some((start, end))
}

/// Summarize the calendar events whose start falls within `[start, end]`
/// inclusive.
pub fn summarize_calendar(
    events: &[CalendarEvent],
    start: NaiveDate,
    end: NaiveDate,
) -> CalendarSummary {
    let in_week: Vec<&CalendarEvent> = events
        .iter()
        .filter(|e| {
            let date = e.start.date();
            date >= start && date <= end
        })
        .collect();

    if in_week.is_empty() {
        return CalendarSummary::no_events();
    }

    let mut time_of_day_breakdown: BTreeMap<String, u32> = BTreeMap::new();
    let mut meeting_type_distribution: BTreeMap<String, u32> = BTreeMap::new();
    let mut total_minutes: u32 = 0;
    for event in &in_week {
        total_minutes += event.duration_min;
        *time_of_day_breakdown
            .entry(event.time_of_day.as_str().to_string())
            .or_insert(0) += 1;
        *meeting_type_distribution
            .entry(event.event_type.as_str().to_string())
            .or_insert(0) += 1;
    }

    CalendarSummary::Scheduled(WeekCalendarSummary {
        total_events: in_week.len() as u32,
        total_minutes,
        time_of_day_breakdown,
        meeting_type_distribution,
    })
}

/// Build one `WeeklyContext` per weekly-notes row.
///
/// Pure and deterministic: identical inputs always produce identical
/// output, in weekly-notes row order.
pub fn aggregate_weeks(
    weekly_notes: &[WeeklyNote],
    screen_time: &[ScreenTimeRecord],
    calendar: &[CalendarEvent],
) -> Vec<WeeklyContext> {
    let mut contexts = Vec::new();

    for note in weekly_notes {
        let Some((start, end)) = parse_week_range(&note.week, DEFAULT_YEAR) else {
            log::warn!("skipping week '{}': label failed range parsing", note.week);
            continue;
        };

        let usage: Vec<AppUsage> = screen_time
            .iter()
            .filter(|r| r.week == note.week)
            .map(|r| AppUsage {
                app_name: r.app_name.clone(),
                time: r.time.clone(),
            })
            .collect();

        contexts.push(WeeklyContext {
            week: note.week.clone(),
            work_highlights: note.work_highlights.clone().unwrap_or_default(),
            life_highlights: note.life_highlights.clone().unwrap_or_default(),
            raw_notes: note.raw_notes.clone().unwrap_or_default(),
            screen_time: usage,
            calendar_summary: summarize_calendar(calendar, start, end),
        });
    }

    contexts
}

/// Render one week's context as the plain-text snapshot handed to the
/// completion service.
pub fn render_weekly_snapshot(context: &WeeklyContext) -> String {
    let mut lines = vec![
        format!("Week: {}", context.week),
        format!("Work highlights: {}", context.work_highlights),
        format!("Life highlights: {}", context.life_highlights),
        format!("Weekly raw notes: {}", context.raw_notes),
        "Screen time:".to_string(),
    ];
    for usage in &context.screen_time {
        lines.push(format!("  - {}: {}", usage.app_name, usage.time));
    }
    lines.push(format!("Calendar summary: {}", context.calendar_summary));
    lines.join("\n")
}
