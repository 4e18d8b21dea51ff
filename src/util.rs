//! Small shared helpers: duration grammar, week labels, text cleanup.

use std::sync::OnceLock;

use chrono::{Duration, NaiveDate};
use regex::Regex;

fn duration_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?:(\d+)\s*h)?\s*(?:(\d+)\s*m)?$").unwrap())
}

/// Parse a free-form duration string like "1h 30m", "2h", or "45m" into
/// minutes. Whitespace-insensitive. Returns `None` for anything outside
/// the grammar (including the empty string) and for values whose minute
/// count exceeds `u32`; callers treat unparseable durations as
/// unrankable, never fatal.
pub fn parse_duration_min(raw: &str) -> Option<u32> {
    let cleaned = raw.trim().to_lowercase();
    if cleaned.is_empty() {
        return None;
    }
    let caps = duration_re().captures(&cleaned)?;
    if caps.get(1).is_none() && caps.get(2).is_none() {
        return None;
    }
    // An absent component is zero; a present one that fails to parse
    // (larger than u32) makes the whole duration unparseable.
    let component = |i: usize| match caps.get(i) {
        Some(m) => m.as_str().parse::<u32>().ok(),
        None => Some(0),
    };
    let h = component(1)?;
    let m = component(2)?;
    h.checked_mul(60)?.checked_add(m)
}

/// Format a week label from its start date: "Jun 23–29" (en dash, week is
/// start plus six days). This is the join key across all sources.
pub fn week_label(start: NaiveDate) -> String {
    let end = start + Duration::days(6);
    format!("{} {}\u{2013}{}", start.format("%b"), start.format("%-d"), end.format("%-d"))
}

/// Collapse embedded line breaks to single spaces and truncate to
/// `max_chars` characters (not bytes; subjects can carry Greek text).
pub fn clean_truncate(raw: &str, max_chars: usize) -> String {
    let collapsed = raw
        .replace("\r\n", " ")
        .replace(['\r', '\n'], " ");
    collapsed.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration_forms() {
        assert_eq!(parse_duration_min("1h 30m"), Some(90));
        assert_eq!(parse_duration_min("2h"), Some(120));
        assert_eq!(parse_duration_min("45m"), Some(45));
        assert_eq!(parse_duration_min("  2H 5M "), Some(125));
        assert_eq!(parse_duration_min("1h30m"), Some(90));
    }

    #[test]
    fn test_parse_duration_round_trip() {
        for h in 0..4u32 {
            for m in [0u32, 1, 30, 59] {
                let formatted = format!("{}h {}m", h, m);
                assert_eq!(parse_duration_min(&formatted), Some(h * 60 + m));
            }
        }
    }

    #[test]
    fn test_parse_duration_rejects_garbage() {
        assert_eq!(parse_duration_min(""), None);
        assert_eq!(parse_duration_min("soon"), None);
        assert_eq!(parse_duration_min("1:30"), None);
        assert_eq!(parse_duration_min("h m"), None);
        // Minute count overflows u32
        assert_eq!(parse_duration_min("100000000h"), None);
        // Component itself exceeds u32; must not rank as zero minutes
        assert_eq!(parse_duration_min("99999999999h"), None);
        assert_eq!(parse_duration_min("4294967295h 59m"), None);
    }

    #[test]
    fn test_week_label() {
        let start = NaiveDate::from_ymd_opt(2025, 6, 23).unwrap();
        assert_eq!(week_label(start), "Jun 23\u{2013}29");
    }

    #[test]
    fn test_clean_truncate() {
        assert_eq!(clean_truncate("a\r\nb\nc", 10), "a b c");
        assert_eq!(clean_truncate("abcdef", 3), "abc");
        // Char-based, not byte-based
        assert_eq!(clean_truncate("αβγδ", 2), "αβ");
    }
}
