//! Screen-time normalizer.
//!
//! Turns one vision-transcribed screen-time report (CSV-ish plain text,
//! `week, app_name, time` rows) into `ScreenTimeRecord`s. The week label
//! is recovered from the source filename's `week_MM_DD` pattern when
//! present; the filename is authoritative because transcriptions get the
//! on-screen week wrong more often than files get renamed.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::error::{Normalized, RowParseError};
use crate::parser::{parse_csv, strip_code_fences};
use crate::types::ScreenTimeRecord;
use crate::util::week_label;
use crate::DEFAULT_YEAR;

fn filename_week_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"week_(\d{2})_(\d{2})").unwrap())
}

/// Derive a week label from a `week_MM_DD` filename, e.g.
/// `week_06_23.png` → "Jun 23–29". Returns `None` when the pattern (or
/// the encoded date) is invalid.
pub fn week_label_from_filename(filename: &str) -> Option<String> {
    let caps = filename_week_re().captures(filename)?;
    let month: u32 = caps[1].parse().ok()?;
    let day: u32 = caps[2].parse().ok()?;
    let start = NaiveDate::from_ymd_opt(DEFAULT_YEAR, month, day)?;
    Some(week_label(start))
}

/// Normalize one transcribed screen-time report.
///
/// Drops the occasional header row that the transcription duplicates as
/// data (all field values equal to the column names).
pub fn normalize_screen_time(raw_output: &str, source_file: &str) -> Normalized<ScreenTimeRecord> {
    let mut out = Normalized::default();
    let text = strip_code_fences(raw_output);

    let Some((header, rows)) = parse_csv(&text) else {
        out.failures
            .push(RowParseError::new(source_file, "empty transcription"));
        return out;
    };

    let derived_week = week_label_from_filename(source_file);

    for row in rows {
        if row.len() < 3 {
            out.failures.push(RowParseError::new(
                source_file,
                format!("short row: {:?}", row),
            ));
            continue;
        }

        // Header accidentally repeated as a data row
        if row.len() == header.len()
            && row
                .iter()
                .zip(&header)
                .all(|(a, b)| a.eq_ignore_ascii_case(b))
        {
            log::debug!("{source_file}: dropped duplicated header row");
            continue;
        }

        let week = derived_week.clone().unwrap_or_else(|| row[0].clone());
        if week.is_empty() {
            out.failures.push(RowParseError::new(
                source_file,
                format!("no week label for app '{}'", row[1]),
            ));
            continue;
        }

        out.rows.push(ScreenTimeRecord {
            week,
            app_name: row[1].clone(),
            time: row[2].clone(),
            source_file: source_file.to_string(),
        });
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_week_label_from_filename() {
        assert_eq!(
            week_label_from_filename("week_06_23.png").as_deref(),
            Some("Jun 23\u{2013}29")
        );
        assert_eq!(week_label_from_filename("notes.png"), None);
        // Month 13 encodes no real date
        assert_eq!(week_label_from_filename("week_13_01.png"), None);
    }

    #[test]
    fn test_filename_overrides_transcribed_week() {
        let raw = "week,app_name,time\nJun 23\u{2013}30,Instagram,2h 15m";
        let result = normalize_screen_time(raw, "week_06_23.png");
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0].week, "Jun 23\u{2013}29");
        assert_eq!(result.rows[0].app_name, "Instagram");
        assert_eq!(result.rows[0].source_file, "week_06_23.png");
    }

    #[test]
    fn test_duplicated_header_row_dropped() {
        let raw = "week,app_name,time\nweek,app_name,time\nJun 23\u{2013}29,Safari,45m";
        let result = normalize_screen_time(raw, "week_06_23.png");
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0].app_name, "Safari");
        assert!(result.failures.is_empty());
    }

    #[test]
    fn test_code_fences_tolerated() {
        let raw = "```\nweek,app_name,time\nJun 23\u{2013}29,Safari,45m\n```";
        let result = normalize_screen_time(raw, "week_06_23.png");
        assert_eq!(result.rows.len(), 1);
    }

    #[test]
    fn test_short_rows_isolated() {
        let raw = "week,app_name,time\nbroken row\nJun 23\u{2013}29,Safari,45m";
        let result = normalize_screen_time(raw, "week_06_23.png");
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.failures.len(), 1);
    }

    #[test]
    fn test_transcribed_week_kept_without_filename_pattern() {
        let raw = "week,app_name,time\nJun 23\u{2013}29,Safari,45m";
        let result = normalize_screen_time(raw, "export.png");
        assert_eq!(result.rows[0].week, "Jun 23\u{2013}29");
    }
}
