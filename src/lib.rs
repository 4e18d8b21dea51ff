pub mod calendar;
pub mod config;
mod error;
pub mod ingest;
pub mod interpretation;
pub mod journal;
pub mod openai_api;
mod parser;
pub mod perception;
pub mod pipeline;
pub mod prompts;
pub mod screen_time;
pub mod signals;
pub mod store;
pub mod themes;
pub mod twilio_api;
pub mod types;
pub mod util;
pub mod weekly_notes;

pub use error::{Normalized, PipelineError, RowParseError};

/// Default year assumed for undated artifacts (journal headers, week
/// labels, filename-encoded week starts). The sources carry no year.
pub const DEFAULT_YEAR: i32 = 2025;
