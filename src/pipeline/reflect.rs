//! Reflect stage: journal + weekly snapshot in, Socratic observation out.
//!
//! Builds the grounding prompt and calls the completion service once.
//! No local retry: a transport or service failure is run-fatal.

use super::{require, Stage};
use crate::error::PipelineError;
use crate::openai_api::{OpenAiClient, SamplingParams};
use crate::prompts;
use crate::types::PipelineState;

pub async fn run(
    state: PipelineState,
    completion: &OpenAiClient,
) -> Result<PipelineState, PipelineError> {
    let journal_text = require(&state.journal_text, Stage::Reflect, "journal_text")?;
    let weekly_perception_text = require(
        &state.weekly_perception_text,
        Stage::Reflect,
        "weekly_perception_text",
    )?;

    let prompt = prompts::socratic_prompt(
        journal_text,
        weekly_perception_text,
        state.perception.as_ref(),
    );
    let observation = completion
        .complete(prompts::SOCRATIC_SYSTEM, &prompt, SamplingParams::socratic())
        .await?;

    Ok(PipelineState {
        socratic_observation: Some(observation),
        ..state
    })
}
