//! Reflection orchestrator.
//!
//! A strictly linear three-stage machine: Perceive → Reflect → Notify.
//! Each stage takes the `PipelineState` by value and returns a new state
//! with only its own designated field(s) populated. Transitions are
//! unconditional; there is no branching, retry, or replay; a run is
//! all-or-nothing from the caller's perspective, though every stage is
//! independently invocable against a correctly populated state.
//!
//! Collaborator clients and credentials live on the `Pipeline` (scoped
//! to one constructor call), never on the state.

pub mod notify;
pub mod perceive;
pub mod reflect;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::PipelineError;
use crate::openai_api::OpenAiClient;
use crate::twilio_api::TwilioClient;
use crate::types::PipelineState;

/// One named step in the fixed-order pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Perceive,
    Reflect,
    Notify,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Perceive => "perceive",
            Stage::Reflect => "reflect",
            Stage::Notify => "notify",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pull a required field off the state or fail the stage.
pub(crate) fn require<'a, T>(
    field: &'a Option<T>,
    stage: Stage,
    name: &'static str,
) -> Result<&'a T, PipelineError> {
    field
        .as_ref()
        .ok_or(PipelineError::MissingInput { stage, field: name })
}

/// The assembled pipeline: collaborator clients bound for one run scope.
pub struct Pipeline {
    completion: OpenAiClient,
    messaging: TwilioClient,
}

impl Pipeline {
    pub fn new(completion: OpenAiClient, messaging: TwilioClient) -> Self {
        Pipeline {
            completion,
            messaging,
        }
    }

    /// Build clients from config; fails when secrets are absent.
    pub fn from_config(config: &Config) -> Result<Self, PipelineError> {
        Ok(Pipeline {
            completion: OpenAiClient::new(config.openai_key()?),
            messaging: TwilioClient::new(config.twilio()?),
        })
    }

    /// Run the full machine over one state instance.
    ///
    /// No stage starts before the previous one returns; the first error
    /// aborts the run and surfaces the triggering stage.
    pub async fn run(&self, state: PipelineState) -> Result<PipelineState, PipelineError> {
        let run_id = state
            .run_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "untagged".to_string());

        log::info!("run {run_id}: perceive");
        let state = perceive::run(state)?;

        log::info!("run {run_id}: reflect");
        let state = reflect::run(state, &self.completion).await?;

        log::info!("run {run_id}: notify");
        let state = notify::run(state, &self.messaging).await?;

        log::info!("run {run_id}: done");
        Ok(state)
    }
}
