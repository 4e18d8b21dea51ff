//! Journal normalizer.
//!
//! Splits one transcribed journal document on `=== <date> ===` section
//! markers and resolves each date token into an ISO calendar date. The
//! journal is bilingual, so date tokens come in three notations, tried in
//! order with first match winning:
//!
//! 1. Greek: `27 Ιουλίου` (day + genitive month name)
//! 2. English: `5 May` (day + month name)
//! 3. Numeric: `24/2/95` (DD/MM/YY or DD/MM/YYYY)
//!
//! An unresolvable token drops that entry with a recorded failure; it
//! never aborts the rest of the document.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::error::{Normalized, RowParseError};
use crate::types::JournalEntry;
use crate::DEFAULT_YEAR;

/// Greek month names in the genitive form used after a day number.
const GREEK_MONTHS: [(&str, u32); 12] = [
    ("Ιανουαρίου", 1),
    ("Φεβρουαρίου", 2),
    ("Μαρτίου", 3),
    ("Απριλίου", 4),
    ("Μαΐου", 5),
    ("Ιουνίου", 6),
    ("Ιουλίου", 7),
    ("Αυγούστου", 8),
    ("Σεπτεμβρίου", 9),
    ("Οκτωβρίου", 10),
    ("Νοεμβρίου", 11),
    ("Δεκεμβρίου", 12),
];

fn greek_date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{1,2})\s+([\p{Greek}]+)").unwrap())
}

fn english_date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{1,2})\s+([A-Za-z]+)").unwrap())
}

fn numeric_date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{2,4})").unwrap())
}

fn section_marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"===\s*([^=\n]*?)\s*===").unwrap())
}

fn greek_month_number(name: &str) -> Option<u32> {
    let lowered = name.to_lowercase();
    GREEK_MONTHS
        .iter()
        .find(|(month, _)| month.to_lowercase() == lowered)
        .map(|&(_, number)| number)
}

/// Resolve a date token in any of the three supported notations.
///
/// Years are only present in the numeric notation; the other two assume
/// `default_year`. Two-digit years use a 1970 pivot (95 → 1995, 24 → 2024).
pub fn parse_flexible_date(raw: &str, default_year: i32) -> Option<NaiveDate> {
    let raw = raw.trim();

    if let Some(caps) = greek_date_re().captures(raw) {
        let day: u32 = caps[1].parse().ok()?;
        if let Some(month) = greek_month_number(&caps[2]) {
            return NaiveDate::from_ymd_opt(default_year, month, day);
        }
        // Greek letters but no month match; fall through to nothing,
        // the other notations cannot start with Greek script.
        return None;
    }

    if let Some(caps) = english_date_re().captures(raw) {
        let candidate = format!("{} {} {}", &caps[1], &caps[2], default_year);
        for fmt in ["%d %B %Y", "%d %b %Y"] {
            if let Ok(date) = NaiveDate::parse_from_str(&candidate, fmt) {
                return Some(date);
            }
        }
        return None;
    }

    if let Some(caps) = numeric_date_re().captures(raw) {
        let day: u32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let mut year: i32 = caps[3].parse().ok()?;
        if year < 100 {
            year += if year >= 70 { 1900 } else { 2000 };
        }
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    None
}

/// Parse a transcribed journal document into dated entries.
///
/// Entries keep document order. Content runs from each `=== date ===`
/// marker up to the next marker or end of document.
pub fn parse_journal_text(text: &str) -> Normalized<JournalEntry> {
    parse_journal_text_with_year(text, DEFAULT_YEAR)
}

pub fn parse_journal_text_with_year(text: &str, default_year: i32) -> Normalized<JournalEntry> {
    let mut out = Normalized::default();

    let markers: Vec<_> = section_marker_re().captures_iter(text).collect();
    for (i, caps) in markers.iter().enumerate() {
        let token = caps.get(1).map(|m| m.as_str()).unwrap_or("");
        let content_start = caps.get(0).map(|m| m.end()).unwrap_or(0);
        let content_end = markers
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map(|m| m.start())
            .unwrap_or(text.len());
        let content = text[content_start..content_end].trim();

        match parse_flexible_date(token, default_year) {
            Some(date) => out.rows.push(JournalEntry {
                date,
                content: content.to_string(),
            }),
            None => out.failures.push(RowParseError::new(
                format!("journal section '{token}'"),
                "unrecognized date format",
            )),
        }
    }

    out
}

/// Join the content of the `n` most recent entries, newest first. Used
/// to give prompts a bounded slice of long-term memory.
pub fn sample_recent(entries: &[JournalEntry], n: usize) -> String {
    let mut sorted: Vec<&JournalEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted
        .iter()
        .take(n)
        .map(|e| e.content.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_greek_date() {
        assert_eq!(
            parse_flexible_date("27 Ιουλίου", 2025),
            Some(date(2025, 7, 27))
        );
        // Case-insensitive month match
        assert_eq!(
            parse_flexible_date("6 ιανουαρίου", 2025),
            Some(date(2025, 1, 6))
        );
    }

    #[test]
    fn test_english_date() {
        assert_eq!(parse_flexible_date("5 May", 2025), Some(date(2025, 5, 5)));
        assert_eq!(parse_flexible_date("12 Sep", 2025), Some(date(2025, 9, 12)));
    }

    #[test]
    fn test_numeric_date_with_pivot() {
        assert_eq!(parse_flexible_date("24/2/95", 2025), Some(date(1995, 2, 24)));
        assert_eq!(parse_flexible_date("3/7/25", 2025), Some(date(2025, 7, 3)));
        assert_eq!(
            parse_flexible_date("24/02/1995", 2025),
            Some(date(1995, 2, 24))
        );
    }

    #[test]
    fn test_unrecognized_token() {
        assert_eq!(parse_flexible_date("N/A", 2025), None);
        assert_eq!(parse_flexible_date("27 Σαββάτου", 2025), None);
        assert_eq!(parse_flexible_date("", 2025), None);
    }

    #[test]
    fn test_parse_journal_sections_in_order() {
        let text = "=== 27 Ιουλίου ===\n\
                    Πήγα στο βουνό.\n\
                    === 5 May ===\nShipped the demo.\n";
        let result = parse_journal_text(text);
        assert_eq!(result.rows.len(), 2);
        assert_eq!(result.rows[0].date, date(2025, 7, 27));
        assert_eq!(result.rows[0].content, "Πήγα στο βουνό.");
        assert_eq!(result.rows[1].date, date(2025, 5, 5));
        assert_eq!(result.rows[1].content, "Shipped the demo.");
    }

    #[test]
    fn test_sample_recent_newest_first() {
        let entry = |d: u32, content: &str| JournalEntry {
            date: date(2025, 7, d),
            content: content.to_string(),
        };
        let entries = vec![entry(1, "old"), entry(20, "new"), entry(10, "mid")];
        assert_eq!(sample_recent(&entries, 2), "new\nmid");
    }

    #[test]
    fn test_bad_date_skips_entry_not_batch() {
        let text = "=== N/A ===\nlost entry\n=== 24/2/95 ===\nkept entry";
        let result = parse_journal_text(text);
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0].content, "kept entry");
        assert_eq!(result.failures.len(), 1);
        assert!(result.failures[0].source_hint.contains("N/A"));
    }
}
