//! Persisted intermediate tables.
//!
//! The normalized tables (calendar, screen-time, journal, weekly-notes,
//! weekly-perception) are cached between runs as row-oriented JSON
//! files, one file per table. Writes go through a temp file + rename so
//! a crash mid-write never leaves a half-table behind.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::PipelineError;

pub const CALENDAR_TABLE: &str = "calendar";
pub const SCREEN_TIME_TABLE: &str = "screen_time";
pub const JOURNAL_TABLE: &str = "journal";
pub const WEEKLY_NOTES_TABLE: &str = "weekly_notes";
pub const WEEKLY_PERCEPTION_TABLE: &str = "weekly_perception";

fn table_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.json"))
}

/// Atomically write `content` to `path` (temp file + rename).
fn atomic_write(path: &Path, content: &str) -> Result<(), PipelineError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, content)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Persist one table as pretty-printed JSON rows.
pub fn save_table<T: Serialize>(dir: &Path, name: &str, rows: &[T]) -> Result<(), PipelineError> {
    let content = serde_json::to_string_pretty(rows)?;
    atomic_write(&table_path(dir, name), &content)
}

/// Load one table. A missing file is an IO error; callers that treat the
/// cache as optional should check `table_exists` first.
pub fn load_table<T: DeserializeOwned>(dir: &Path, name: &str) -> Result<Vec<T>, PipelineError> {
    let content = fs::read_to_string(table_path(dir, name))?;
    Ok(serde_json::from_str(&content)?)
}

pub fn table_exists(dir: &Path, name: &str) -> bool {
    table_path(dir, name).exists()
}

/// Persist the combined journal transcript alongside the tables.
pub fn save_journal_text(dir: &Path, text: &str) -> Result<(), PipelineError> {
    if let Some(parent) = dir.join("journal.txt").parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(dir.join("journal.txt"), text)?;
    Ok(())
}

pub fn load_journal_text(dir: &Path) -> Result<String, PipelineError> {
    Ok(fs::read_to_string(dir.join("journal.txt"))?)
}

pub fn journal_text_exists(dir: &Path) -> bool {
    dir.join("journal.txt").exists()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{JournalEntry, ScreenTimeRecord};
    use chrono::NaiveDate;

    #[test]
    fn test_table_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let rows = vec![ScreenTimeRecord {
            week: "Jun 23\u{2013}29".to_string(),
            app_name: "Instagram".to_string(),
            time: "2h 15m".to_string(),
            source_file: "week_06_23.png".to_string(),
        }];
        save_table(dir.path(), SCREEN_TIME_TABLE, &rows).unwrap();
        assert!(table_exists(dir.path(), SCREEN_TIME_TABLE));

        let loaded: Vec<ScreenTimeRecord> = load_table(dir.path(), SCREEN_TIME_TABLE).unwrap();
        assert_eq!(loaded, rows);
    }

    #[test]
    fn test_journal_dates_survive_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let rows = vec![JournalEntry {
            date: NaiveDate::from_ymd_opt(2025, 7, 27).unwrap(),
            content: "Πήγα στο βουνό.".to_string(),
        }];
        save_table(dir.path(), JOURNAL_TABLE, &rows).unwrap();
        let loaded: Vec<JournalEntry> = load_table(dir.path(), JOURNAL_TABLE).unwrap();
        assert_eq!(loaded, rows);
    }

    #[test]
    fn test_missing_table_reported() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!table_exists(dir.path(), CALENDAR_TABLE));
        let result: Result<Vec<ScreenTimeRecord>, _> = load_table(dir.path(), CALENDAR_TABLE);
        assert!(matches!(result, Err(PipelineError::Io(_))));
    }

    #[test]
    fn test_journal_text_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        save_journal_text(dir.path(), "=== 5 May ===\nhello").unwrap();
        assert!(journal_text_exists(dir.path()));
        assert_eq!(load_journal_text(dir.path()).unwrap(), "=== 5 May ===\nhello");
    }
}
