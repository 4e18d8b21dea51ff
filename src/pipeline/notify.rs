//! Notify stage: Socratic observation in, delivery record out.
//!
//! Sends exactly one message. An empty observation is a run-fatal
//! missing input: nothing goes out, no `whisper_status` is written.

use super::{require, Stage};
use crate::error::PipelineError;
use crate::twilio_api::TwilioClient;
use crate::types::PipelineState;

pub async fn run(
    state: PipelineState,
    messaging: &TwilioClient,
) -> Result<PipelineState, PipelineError> {
    let observation = require(
        &state.socratic_observation,
        Stage::Notify,
        "socratic_observation",
    )?;
    if observation.trim().is_empty() {
        return Err(PipelineError::MissingInput {
            stage: Stage::Notify,
            field: "socratic_observation",
        });
    }

    let body = format!("\u{1f33f} Reflective Insight:\n{}\n", observation.trim());
    let delivery = messaging.send_message(&body).await?;
    log::info!(
        "notify: sent {} to {} (status {})",
        delivery.sid,
        delivery.to,
        delivery.status
    );

    Ok(PipelineState {
        whisper_status: Some(delivery),
        ..state
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::twilio_api::TwilioConfig;

    fn client() -> TwilioClient {
        TwilioClient::new(TwilioConfig {
            account_sid: "AC123".to_string(),
            auth_token: "token".to_string(),
            from_number: "+15550100".to_string(),
            to_number: "+15550101".to_string(),
        })
    }

    #[tokio::test]
    async fn test_absent_observation_is_fatal_and_writes_nothing() {
        let err = run(PipelineState::default(), &client()).await.unwrap_err();
        assert!(matches!(
            err,
            PipelineError::MissingInput {
                stage: Stage::Notify,
                field: "socratic_observation"
            }
        ));
    }

    #[tokio::test]
    async fn test_whitespace_observation_is_fatal() {
        let state = PipelineState {
            socratic_observation: Some("   \n".to_string()),
            ..Default::default()
        };
        let err = run(state, &client()).await.unwrap_err();
        assert!(matches!(
            err,
            PipelineError::MissingInput {
                stage: Stage::Notify,
                ..
            }
        ));
    }
}
