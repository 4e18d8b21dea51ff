//! Calendar normalizer.
//!
//! Turns the raw calendar CSV export (Start Date / Start Time / End Date /
//! End Time / Subject / Description / Private columns) into a compact
//! `CalendarEvent` table sorted by start time. Rows with unparseable
//! timestamps or an end before the start are dropped with a diagnostic,
//! never fatal to the batch.

use chrono::NaiveDateTime;

use crate::error::{Normalized, RowParseError};
use crate::parser::parse_csv;
use crate::types::{CalendarEvent, EventType, TimeOfDay};
use crate::util::clean_truncate;

const SUBJECT_MAX_CHARS: usize = 50;
const DESCRIPTION_MAX_CHARS: usize = 100;

/// Timestamp formats seen across export locales. Tried in order.
const DATETIME_FORMATS: &[&str] = &[
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
    "%m/%d/%Y %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M",
];

fn parse_datetime(date: &str, time: &str) -> Option<NaiveDateTime> {
    let combined = format!("{} {}", date.trim(), time.trim());
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&combined, fmt).ok())
}

/// Classify the event type by case-insensitive substring match on the
/// (already truncated) subject. Ordered, first match wins.
fn classify_type(subject: &str) -> EventType {
    let subject = subject.to_lowercase();
    if subject.contains("ooo") || subject.contains("out of office") {
        EventType::Ooo
    } else if subject.contains("1:1") || subject.contains("one-on-one") {
        EventType::OneOnOne
    } else if subject.contains("standup") {
        EventType::Standup
    } else if subject.contains("review") {
        EventType::Review
    } else if subject.contains("feedback") {
        EventType::Feedback
    } else {
        EventType::Meeting
    }
}

fn parse_bool(raw: &str) -> bool {
    matches!(raw.trim().to_lowercase().as_str(), "true" | "yes" | "1")
}

/// Parse and normalize a raw calendar CSV export.
///
/// Output events are sorted by start ascending. Column lookup is by
/// header name, so extra export columns are ignored.
pub fn normalize_calendar(csv_text: &str) -> Normalized<CalendarEvent> {
    let mut out = Normalized::default();

    let Some((header, rows)) = parse_csv(csv_text) else {
        out.failures
            .push(RowParseError::new("calendar", "empty export"));
        return out;
    };

    let col = |name: &str| header.iter().position(|h| h.eq_ignore_ascii_case(name));
    let (Some(start_date), Some(start_time), Some(end_date), Some(end_time), Some(subject_col)) = (
        col("Start Date"),
        col("Start Time"),
        col("End Date"),
        col("End Time"),
        col("Subject"),
    ) else {
        out.failures.push(RowParseError::new(
            "calendar",
            format!("missing required columns in header: {:?}", header),
        ));
        return out;
    };
    let description_col = col("Description");
    let private_col = col("Private");

    for (idx, row) in rows.iter().enumerate() {
        let field = |i: usize| row.get(i).map(String::as_str).unwrap_or("");
        let line = format!("calendar row {}", idx + 2); // 1-based, after header

        let Some(start) = parse_datetime(field(start_date), field(start_time)) else {
            out.failures.push(RowParseError::new(
                line,
                format!(
                    "unparseable start '{} {}'",
                    field(start_date),
                    field(start_time)
                ),
            ));
            continue;
        };
        let Some(end) = parse_datetime(field(end_date), field(end_time)) else {
            out.failures.push(RowParseError::new(
                line,
                format!("unparseable end '{} {}'", field(end_date), field(end_time)),
            ));
            continue;
        };

        let span = end.signed_duration_since(start);
        if span.num_seconds() < 0 {
            out.failures
                .push(RowParseError::new(line, "end precedes start"));
            continue;
        }
        let duration_min = (span.num_seconds() / 60) as u32;

        let subject = clean_truncate(field(subject_col), SUBJECT_MAX_CHARS);
        let description = description_col
            .map(|i| clean_truncate(field(i), DESCRIPTION_MAX_CHARS))
            .unwrap_or_default();
        let event_type = classify_type(&subject);

        out.rows.push(CalendarEvent {
            start,
            duration_min,
            time_of_day: TimeOfDay::from_hour(chrono::Timelike::hour(&start)),
            subject,
            event_type,
            private: private_col.map(|i| parse_bool(field(i))).unwrap_or(false),
            description,
        });
    }

    out.rows.sort_by_key(|e| e.start);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Subject,Start Date,Start Time,End Date,End Time,Description,Private";

    fn normalize(rows: &str) -> Normalized<CalendarEvent> {
        normalize_calendar(&format!("{HEADER}\n{rows}"))
    }

    #[test]
    fn test_duration_and_bucket() {
        let result = normalize("Team sync,6/23/2025,9:00:00 AM,6/23/2025,9:45:30 AM,,False");
        assert_eq!(result.rows.len(), 1);
        let event = &result.rows[0];
        // Truncated to whole minutes, never rounded up
        assert_eq!(event.duration_min, 45);
        assert_eq!(event.time_of_day, TimeOfDay::Morning);
        assert_eq!(event.event_type, EventType::Meeting);
        assert!(!event.private);
    }

    #[test]
    fn test_classification_order_first_match_wins() {
        let result = normalize(
            "OOO - review week,6/23/2025,9:00 AM,6/23/2025,10:00 AM,,False\n\
             1:1 with Maria,6/23/2025,1:00 PM,6/23/2025,1:30 PM,,True\n\
             Design review,6/23/2025,5:00 PM,6/23/2025,6:00 PM,,False\n\
             Daily standup,6/23/2025,11:00 PM,6/24/2025,12:00 AM,,False",
        );
        let types: Vec<_> = result.rows.iter().map(|e| e.event_type).collect();
        // sorted by start: OOO(9am), 1:1(1pm), Review(5pm), Standup(11pm)
        assert_eq!(
            types,
            vec![
                EventType::Ooo,
                EventType::OneOnOne,
                EventType::Review,
                EventType::Standup
            ]
        );
        assert_eq!(result.rows[0].time_of_day, TimeOfDay::Morning);
        assert_eq!(result.rows[1].time_of_day, TimeOfDay::Afternoon);
        assert_eq!(result.rows[2].time_of_day, TimeOfDay::Evening);
        assert_eq!(result.rows[3].time_of_day, TimeOfDay::Night);
        assert!(result.rows[1].private);
    }

    #[test]
    fn test_malformed_rows_dropped_not_fatal() {
        let result = normalize(
            "Good,6/23/2025,9:00 AM,6/23/2025,10:00 AM,,False\n\
             Bad time,garbage,9:00 AM,6/23/2025,10:00 AM,,False\n\
             Negative,6/23/2025,10:00 AM,6/23/2025,9:00 AM,,False",
        );
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.failures.len(), 2);
        assert_eq!(result.rows[0].subject, "Good");
    }

    #[test]
    fn test_truncation_and_newline_collapse() {
        let long_subject = "x".repeat(80);
        let result = normalize(&format!(
            "{long_subject},6/23/2025,9:00 AM,6/23/2025,10:00 AM,\"line one\nline two\",False"
        ));
        assert_eq!(result.rows[0].subject.chars().count(), 50);
        assert_eq!(result.rows[0].description, "line one line two");
    }

    #[test]
    fn test_sorted_by_start() {
        let result = normalize(
            "Later,6/24/2025,9:00 AM,6/24/2025,10:00 AM,,False\n\
             Earlier,6/23/2025,9:00 AM,6/23/2025,10:00 AM,,False",
        );
        assert_eq!(result.rows[0].subject, "Earlier");
        assert_eq!(result.rows[1].subject, "Later");
    }
}
