//! Core data model for the weekly perception pipeline.
//!
//! Normalized rows (`CalendarEvent`, `ScreenTimeRecord`, `JournalEntry`,
//! `WeeklyNote`) are created once at normalization time and immutable
//! thereafter. `WeeklyContext` is the canonical per-week join product and
//! is read-only input to every downstream stage.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Calendar
// ============================================================================

/// Time-of-day bucket for a calendar event's start hour.
///
/// Buckets are total and non-overlapping over 0–23:
/// [5,12) Morning, [12,17) Afternoon, [17,22) Evening, else Night.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=11 => TimeOfDay::Morning,
            12..=16 => TimeOfDay::Afternoon,
            17..=21 => TimeOfDay::Evening,
            _ => TimeOfDay::Night,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeOfDay::Morning => "Morning",
            TimeOfDay::Afternoon => "Afternoon",
            TimeOfDay::Evening => "Evening",
            TimeOfDay::Night => "Night",
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event type inferred from the subject line by ordered keyword match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    #[serde(rename = "OOO")]
    Ooo,
    #[serde(rename = "1:1")]
    OneOnOne,
    Standup,
    Review,
    Feedback,
    Meeting,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Ooo => "OOO",
            EventType::OneOnOne => "1:1",
            EventType::Standup => "Standup",
            EventType::Review => "Review",
            EventType::Feedback => "Feedback",
            EventType::Meeting => "Meeting",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One normalized calendar event.
///
/// Invariant: `duration_min` is `(end - start)` truncated to whole minutes
/// and never negative; rows that would violate this are dropped during
/// normalization instead of constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub start: NaiveDateTime,
    pub duration_min: u32,
    pub time_of_day: TimeOfDay,
    /// Subject truncated to 50 chars, line breaks collapsed to spaces.
    pub subject: String,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub private: bool,
    /// Description truncated to 100 chars, line breaks collapsed to spaces.
    pub description: String,
}

// ============================================================================
// Screen time
// ============================================================================

/// One per-app usage row from a screen-time screenshot.
///
/// `time` stays in the source's free-form "Xh Ym" notation; it is parsed
/// to minutes only where ranking needs it (see `util::parse_duration_min`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenTimeRecord {
    /// Week label, e.g. "Jun 23–29". Recovered from `source_file` when
    /// the transcription omitted or mangled it.
    pub week: String,
    pub app_name: String,
    pub time: String,
    pub source_file: String,
}

// ============================================================================
// Journal
// ============================================================================

/// One dated journal entry extracted from the transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub date: NaiveDate,
    pub content: String,
}

// ============================================================================
// Weekly notes
// ============================================================================

/// One structured weekly-reflection row.
///
/// Highlight fields are `None` when the vision collaborator's JSON could
/// not be parsed; `raw_notes` then preserves whatever text came back so
/// nothing is lost to a bad transcription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyNote {
    pub week: String,
    pub work_highlights: Option<String>,
    pub life_highlights: Option<String>,
    pub raw_notes: Option<String>,
    pub source_file: String,
}

// ============================================================================
// Weekly perception
// ============================================================================

/// A (app, duration) pair inside a `WeeklyContext`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppUsage {
    pub app_name: String,
    pub time: String,
}

/// Aggregate calendar metrics for one week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekCalendarSummary {
    pub total_events: u32,
    pub total_minutes: u32,
    /// Frequency count keyed by time-of-day label.
    pub time_of_day_breakdown: BTreeMap<String, u32>,
    /// Frequency count keyed by event-type label.
    pub meeting_type_distribution: BTreeMap<String, u32>,
}

/// Calendar summary for one week: either aggregate metrics or the
/// sentinel for an empty week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CalendarSummary {
    Scheduled(WeekCalendarSummary),
    /// Serialized as the bare sentinel string so persisted tables stay
    /// readable ("No events scheduled.").
    NoEvents(String),
}

impl CalendarSummary {
    pub const NO_EVENTS: &'static str = "No events scheduled.";

    pub fn no_events() -> Self {
        CalendarSummary::NoEvents(Self::NO_EVENTS.to_string())
    }

    pub fn scheduled(&self) -> Option<&WeekCalendarSummary> {
        match self {
            CalendarSummary::Scheduled(s) => Some(s),
            CalendarSummary::NoEvents(_) => None,
        }
    }
}

impl fmt::Display for CalendarSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalendarSummary::NoEvents(s) => f.write_str(s),
            CalendarSummary::Scheduled(s) => write!(
                f,
                "{} events, {} minutes; by time of day: {:?}; by type: {:?}",
                s.total_events, s.total_minutes, s.time_of_day_breakdown, s.meeting_type_distribution
            ),
        }
    }
}

/// Canonical, read-only record of one week: highlights, screen time,
/// and calendar summary joined on the week label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyContext {
    /// Week label, unique key across sources (e.g. "Jun 23–29").
    pub week: String,
    pub work_highlights: String,
    pub life_highlights: String,
    pub raw_notes: String,
    pub screen_time: Vec<AppUsage>,
    pub calendar_summary: CalendarSummary,
}

// ============================================================================
// Pipeline state
// ============================================================================

/// Delivery record written by the Notify stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhisperStatus {
    pub status: String,
    pub sid: String,
    pub to: String,
    /// First 60 chars of the sent body, for run logs.
    pub preview: String,
}

/// State threaded through the orchestrator stages.
///
/// Each stage takes the state by value and returns a new state with only
/// its own designated field(s) populated; nothing mutates another stage's
/// output. One instance belongs to exactly one in-flight run; concurrent
/// runs need independent instances. Credentials deliberately live in
/// `config::Config`, not here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineState {
    pub run_id: Option<Uuid>,

    pub journal_text: Option<String>,
    pub weekly_perception_text: Option<String>,

    pub weekly_notes: Option<Vec<WeeklyNote>>,
    pub screen_time: Option<Vec<ScreenTimeRecord>>,
    pub calendar: Option<Vec<CalendarEvent>>,

    pub perception: Option<WeeklyContext>,
    pub interpretation: Option<String>,
    pub socratic_observation: Option<String>,

    pub whisper_status: Option<WhisperStatus>,
}

impl PipelineState {
    /// Fresh state for one run, tagged with a new run id.
    pub fn new() -> Self {
        PipelineState {
            run_id: Some(Uuid::new_v4()),
            ..Default::default()
        }
    }
}
