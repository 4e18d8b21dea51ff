//! Perceive stage: three normalized tables in, one `WeeklyContext` out.
//!
//! Requires the weekly-notes, screen-time, and calendar tables on the
//! state; any absence is run-fatal. Writes `perception` and the rendered
//! `weekly_perception_text`.

use super::{require, Stage};
use crate::error::PipelineError;
use crate::perception::{aggregate_weeks, render_weekly_snapshot};
use crate::types::PipelineState;

pub fn run(state: PipelineState) -> Result<PipelineState, PipelineError> {
    let weekly_notes = require(&state.weekly_notes, Stage::Perceive, "weekly_notes")?;
    let screen_time = require(&state.screen_time, Stage::Perceive, "screen_time")?;
    let calendar = require(&state.calendar, Stage::Perceive, "calendar")?;

    let mut contexts = aggregate_weeks(weekly_notes, screen_time, calendar);
    if contexts.is_empty() {
        return Err(PipelineError::EmptyOutput {
            stage: Stage::Perceive,
            reason: "aggregation produced no weeks".to_string(),
        });
    }

    // Single-week runs are the normal case. A multi-week batch keeps the
    // first row only (weekly-notes order); downstream stages reflect on
    // exactly one week per run.
    if contexts.len() > 1 {
        let discarded: Vec<&str> = contexts[1..].iter().map(|c| c.week.as_str()).collect();
        log::warn!(
            "perceive: {} weeks aggregated, keeping '{}', discarding [{}]",
            contexts.len(),
            contexts[0].week,
            discarded.join(", ")
        );
    }
    let perception = contexts.swap_remove(0);
    let snapshot = render_weekly_snapshot(&perception);

    Ok(PipelineState {
        perception: Some(perception),
        weekly_perception_text: Some(snapshot),
        ..state
    })
}
