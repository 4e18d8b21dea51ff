//! Weekly-notes normalizer.
//!
//! Each handwritten weekly reflection page is transcribed by the vision
//! collaborator into structured JSON (`work_highlights` /
//! `life_highlights` / `raw_notes`). Transcriptions are best-effort:
//! code fences are stripped before parsing, and a totally malformed
//! response still yields a row: null highlight fields with the raw text
//! preserved for manual inspection.

use serde::Deserialize;

use crate::parser::strip_code_fences;
use crate::screen_time::week_label_from_filename;
use crate::types::WeeklyNote;

/// Week label used when the filename carries no `week_MM_DD` pattern.
pub const UNKNOWN_WEEK: &str = "Unknown";

#[derive(Debug, Deserialize)]
struct ReflectionJson {
    #[serde(default)]
    work_highlights: Option<String>,
    #[serde(default)]
    life_highlights: Option<String>,
    #[serde(default)]
    raw_notes: Option<String>,
}

/// Build one `WeeklyNote` from a transcription response.
///
/// Never fails: parse errors downgrade to a best-effort row.
pub fn parse_weekly_reflection(raw_output: &str, source_file: &str) -> WeeklyNote {
    let week = week_label_from_filename(source_file).unwrap_or_else(|| UNKNOWN_WEEK.to_string());
    let cleaned = strip_code_fences(raw_output);

    match serde_json::from_str::<ReflectionJson>(&cleaned) {
        Ok(parsed) => WeeklyNote {
            week,
            work_highlights: parsed.work_highlights,
            life_highlights: parsed.life_highlights,
            raw_notes: parsed.raw_notes,
            source_file: source_file.to_string(),
        },
        Err(e) => {
            log::warn!("{source_file}: reflection JSON unparseable ({e}); keeping raw text");
            WeeklyNote {
                week,
                work_highlights: None,
                life_highlights: None,
                raw_notes: Some(raw_output.trim().to_string()),
                source_file: source_file.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_json() {
        let raw = r#"{"work_highlights": "shipped v2", "life_highlights": "triathlon", "raw_notes": "full text"}"#;
        let note = parse_weekly_reflection(raw, "week_06_23.png");
        assert_eq!(note.week, "Jun 23\u{2013}29");
        assert_eq!(note.work_highlights.as_deref(), Some("shipped v2"));
        assert_eq!(note.life_highlights.as_deref(), Some("triathlon"));
    }

    #[test]
    fn test_fenced_json() {
        let raw = "```json\n{\"work_highlights\": \"demo\", \"raw_notes\": \"x\"}\n```";
        let note = parse_weekly_reflection(raw, "week_06_23.png");
        assert_eq!(note.work_highlights.as_deref(), Some("demo"));
        assert_eq!(note.life_highlights, None);
    }

    #[test]
    fn test_malformed_json_preserves_raw_text() {
        let raw = "the model rambled instead of returning JSON";
        let note = parse_weekly_reflection(raw, "week_06_23.png");
        assert_eq!(note.work_highlights, None);
        assert_eq!(note.life_highlights, None);
        assert_eq!(note.raw_notes.as_deref(), Some(raw));
    }

    #[test]
    fn test_unknown_week_without_filename_pattern() {
        let note = parse_weekly_reflection("{}", "scan_001.png");
        assert_eq!(note.week, UNKNOWN_WEEK);
    }
}
