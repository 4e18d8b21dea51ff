//! Weekly interpretation.
//!
//! Standalone enrichment operation: one `WeeklyContext` plus a sample of
//! recent journal entries → one reflective paragraph from the completion
//! service. Independently invocable; not part of the three-stage
//! orchestrator path.

use crate::journal::sample_recent;
use crate::openai_api::{OpenAiClient, OpenAiError, SamplingParams};
use crate::perception::render_weekly_snapshot;
use crate::prompts;
use crate::types::{JournalEntry, WeeklyContext};

/// How many recent journal entries back the interpretation prompt.
pub const JOURNAL_SAMPLE_SIZE: usize = 10;

/// Produce the interpretation paragraph for one week.
pub async fn interpret_week(
    client: &OpenAiClient,
    context: &WeeklyContext,
    journal: &[JournalEntry],
) -> Result<String, OpenAiError> {
    let snapshot = render_weekly_snapshot(context);
    let journal_sample = sample_recent(journal, JOURNAL_SAMPLE_SIZE);
    let prompt = prompts::interpretation_prompt(&snapshot, &journal_sample);

    client
        .complete(
            prompts::INTERPRETATION_SYSTEM,
            &prompt,
            SamplingParams::interpretation(),
        )
        .await
}
