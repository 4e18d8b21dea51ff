//! Error types for the weekly reflection pipeline
//!
//! Errors are classified by blast radius:
//! - Row-level: a single source row/entry failed to parse. Dropped with
//!   a diagnostic; the batch continues.
//! - Run-fatal: a stage is missing a required input, or a collaborator
//!   call failed. The whole run aborts.

use thiserror::Error;

use crate::openai_api::OpenAiError;
use crate::pipeline::Stage;
use crate::twilio_api::TwilioError;

/// A single source row or entry that failed normalization.
///
/// Carried alongside successful rows so callers decide whether to log,
/// retry, or escalate; never raised.
#[derive(Debug, Clone, Error)]
#[error("{source_hint}: {reason}")]
pub struct RowParseError {
    /// Where the row came from (filename, date token, CSV line number).
    pub source_hint: String,
    pub reason: String,
}

impl RowParseError {
    pub fn new(source_hint: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            source_hint: source_hint.into(),
            reason: reason.into(),
        }
    }
}

/// Outcome of a batch normalization: the rows that parsed plus the rows
/// that did not. Failures never abort the batch.
#[derive(Debug, Clone)]
pub struct Normalized<T> {
    pub rows: Vec<T>,
    pub failures: Vec<RowParseError>,
}

// Manual impl: the derive would demand `T: Default`, which row types
// have no reason to implement.
impl<T> Default for Normalized<T> {
    fn default() -> Self {
        Normalized {
            rows: Vec::new(),
            failures: Vec::new(),
        }
    }
}

impl<T> Normalized<T> {
    /// Log every failure at warn level, tagged with the batch name.
    pub fn log_failures(&self, batch: &str) {
        for failure in &self.failures {
            log::warn!("{batch}: dropped row: {failure}");
        }
    }
}

/// Run-fatal pipeline errors.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{stage} stage requires `{field}` but it is missing from the pipeline state")]
    MissingInput { stage: Stage, field: &'static str },

    #[error("{stage} stage produced no output: {reason}")]
    EmptyOutput { stage: Stage, reason: String },

    #[error("Completion service: {0}")]
    Completion(#[from] OpenAiError),

    #[error("Messaging service: {0}")]
    Messaging(#[from] TwilioError),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PipelineError {
    /// The stage that triggered the failure, when one is attributable.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            PipelineError::MissingInput { stage, .. } => Some(*stage),
            PipelineError::EmptyOutput { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}
