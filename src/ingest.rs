//! Batch ingestion of raw artifacts.
//!
//! Walks each source directory in sorted filename order (so diagnostic
//! numbering stays stable across runs) and runs the matching normalizer
//! per file. Per-item isolation throughout: one unreadable image or
//! failed transcription is logged and recorded, and the batch moves on.

use std::path::{Path, PathBuf};

use crate::calendar;
use crate::config::Config;
use crate::error::{Normalized, PipelineError, RowParseError};
use crate::journal;
use crate::openai_api::OpenAiClient;
use crate::prompts;
use crate::screen_time;
use crate::types::{CalendarEvent, JournalEntry, ScreenTimeRecord, WeeklyNote};
use crate::weekly_notes;

/// Everything ingestion produces: the three normalized tables plus the
/// combined journal transcript and its dated entries.
#[derive(Debug, Default)]
pub struct IngestedData {
    pub weekly_notes: Vec<WeeklyNote>,
    pub screen_time: Normalized<ScreenTimeRecord>,
    pub calendar: Normalized<CalendarEvent>,
    pub journal_text: String,
    pub journal: Normalized<JournalEntry>,
}

/// PNG files in a directory, sorted by filename. A missing directory is
/// an empty batch, not an error.
fn png_files(dir: &Path) -> Result<Vec<PathBuf>, PipelineError> {
    if !dir.exists() {
        log::warn!("{}: directory missing, nothing to ingest", dir.display());
        return Ok(Vec::new());
    }
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .map(|ext| ext.eq_ignore_ascii_case("png"))
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    Ok(files)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Transcribe every screen-time screenshot in `dir` and normalize the rows.
pub async fn ingest_screen_time(
    client: &OpenAiClient,
    dir: &Path,
) -> Result<Normalized<ScreenTimeRecord>, PipelineError> {
    let mut out = Normalized::default();
    for path in png_files(dir)? {
        let name = file_name(&path);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                log::error!("{name}: unreadable ({e})");
                out.failures.push(RowParseError::new(&name, e.to_string()));
                continue;
            }
        };
        match client
            .transcribe_image(&bytes, prompts::SCREEN_TIME_TRANSCRIPTION_PROMPT)
            .await
        {
            Ok(raw) => {
                let batch = screen_time::normalize_screen_time(&raw, &name);
                out.rows.extend(batch.rows);
                out.failures.extend(batch.failures);
            }
            Err(e) => {
                log::error!("{name}: transcription failed ({e})");
                out.failures.push(RowParseError::new(&name, e.to_string()));
            }
        }
    }
    Ok(out)
}

/// Transcribe every weekly reflection page in `dir`.
///
/// Per-page JSON problems are already handled inside
/// `parse_weekly_reflection`; only transport failures skip a page here.
pub async fn ingest_weekly_notes(
    client: &OpenAiClient,
    dir: &Path,
) -> Result<Normalized<WeeklyNote>, PipelineError> {
    let mut out = Normalized::default();
    for path in png_files(dir)? {
        let name = file_name(&path);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                log::error!("{name}: unreadable ({e})");
                out.failures.push(RowParseError::new(&name, e.to_string()));
                continue;
            }
        };
        match client
            .transcribe_image(&bytes, prompts::WEEKLY_REFLECTION_TRANSCRIPTION_PROMPT)
            .await
        {
            Ok(raw) => out.rows.push(weekly_notes::parse_weekly_reflection(&raw, &name)),
            Err(e) => {
                log::error!("{name}: transcription failed ({e})");
                out.failures.push(RowParseError::new(&name, e.to_string()));
            }
        }
    }
    Ok(out)
}

/// Transcribe every journal page in `dir` into one combined transcript,
/// then split it into dated entries.
pub async fn ingest_journal(
    client: &OpenAiClient,
    dir: &Path,
) -> Result<(String, Normalized<JournalEntry>), PipelineError> {
    let mut pages = Vec::new();
    for path in png_files(dir)? {
        let name = file_name(&path);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                log::error!("{name}: unreadable ({e})");
                continue;
            }
        };
        match client
            .transcribe_image(&bytes, prompts::JOURNAL_TRANSCRIPTION_PROMPT)
            .await
        {
            Ok(text) => pages.push(text),
            Err(e) => log::error!("{name}: transcription failed ({e})"),
        }
    }
    let journal_text = pages.join("\n\n");
    let entries = journal::parse_journal_text(&journal_text);
    entries.log_failures("journal");
    Ok((journal_text, entries))
}

/// Read and normalize the calendar CSV export.
pub fn ingest_calendar(path: &Path) -> Result<Normalized<CalendarEvent>, PipelineError> {
    let text = std::fs::read_to_string(path)?;
    let batch = calendar::normalize_calendar(&text);
    batch.log_failures("calendar");
    Ok(batch)
}

/// Run all four ingestion batches against the configured data tree.
pub async fn ingest_all(
    config: &Config,
    client: &OpenAiClient,
) -> Result<IngestedData, PipelineError> {
    let weekly = ingest_weekly_notes(client, &config.weekly_notes_dir()).await?;
    weekly.log_failures("weekly_notes");
    let screen = ingest_screen_time(client, &config.screen_time_dir()).await?;
    screen.log_failures("screen_time");
    let calendar = ingest_calendar(&config.calendar_csv())?;
    let (journal_text, journal) = ingest_journal(client, &config.journal_dir()).await?;

    Ok(IngestedData {
        weekly_notes: weekly.rows,
        screen_time: screen,
        calendar,
        journal_text,
        journal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_png_files_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("week_07_07.png"), b"x").unwrap();
        fs::write(dir.path().join("week_06_23.PNG"), b"x").unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        let files = png_files(dir.path()).unwrap();
        let names: Vec<String> = files.iter().map(|p| file_name(p)).collect();
        assert_eq!(names, vec!["week_06_23.PNG", "week_07_07.png"]);
    }

    #[test]
    fn test_missing_directory_is_empty_batch() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(png_files(&missing).unwrap().is_empty());
    }

    #[test]
    fn test_ingest_calendar_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calendar.csv");
        fs::write(
            &path,
            "Subject,Start Date,Start Time,End Date,End Time,Description,Private\n\
             Sync,6/23/2025,9:00 AM,6/23/2025,10:00 AM,,False\n",
        )
        .unwrap();
        let batch = ingest_calendar(&path).unwrap();
        assert_eq!(batch.rows.len(), 1);
        assert!(batch.failures.is_empty());
    }
}
