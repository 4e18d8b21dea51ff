//! Completion/vision collaborator client.
//!
//! Narrow request/response contract over the chat-completions HTTP API:
//! (system instruction, user prompt, sampling parameters) → one text
//! completion, plus an image variant for the vision-transcription
//! use cases. Deliberately no client-side retry or timeout: a transport
//! failure propagates to the caller, which decides whether it is
//! run-fatal (orchestrator stages) or downgradable (structured
//! extraction).
//!
//! Modules:
//! - completions: text completion call
//! - vision: image transcription call

pub mod completions;
pub mod vision;

use serde::{Deserialize, Serialize};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Model used for every completion and vision call.
pub const MODEL: &str = "gpt-4o";

#[derive(Debug, thiserror::Error)]
pub enum OpenAiError {
    #[error("HTTP: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },
    #[error("response contained no choices")]
    EmptyResponse,
}

/// Sampling parameters for one completion call.
#[derive(Debug, Clone, Serialize)]
pub struct SamplingParams {
    pub temperature: f64,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>,
}

impl SamplingParams {
    /// High-variance settings for the Socratic reflection.
    pub fn socratic() -> Self {
        SamplingParams {
            temperature: 0.9,
            max_tokens: 800,
            top_p: Some(0.95),
            presence_penalty: Some(0.6),
            frequency_penalty: Some(0.4),
        }
    }

    /// Measured settings for the weekly interpretation paragraph.
    pub fn interpretation() -> Self {
        SamplingParams {
            temperature: 0.7,
            max_tokens: 300,
            top_p: None,
            presence_penalty: None,
            frequency_penalty: None,
        }
    }

    /// Settings for theme extraction (JSON output).
    pub fn themes() -> Self {
        SamplingParams {
            temperature: 0.7,
            max_tokens: 700,
            top_p: None,
            presence_penalty: None,
            frequency_penalty: None,
        }
    }

    /// Low-temperature settings for vision transcription.
    pub fn transcription() -> Self {
        SamplingParams {
            temperature: 0.3,
            max_tokens: 1500,
            top_p: None,
            presence_penalty: None,
            frequency_penalty: None,
        }
    }
}

/// Typed client for the completion service.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    pub(crate) http: reqwest::Client,
    pub(crate) api_key: String,
    pub(crate) base_url: String,
}

impl OpenAiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        OpenAiClient {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the client at a different endpoint (test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

// ============================================================================
// Wire types shared by completions and vision
// ============================================================================

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest {
    pub model: &'static str,
    pub messages: Vec<ChatMessage>,
    #[serde(flatten)]
    pub sampling: SamplingParams,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatMessage {
    pub role: &'static str,
    pub content: MessageContent,
}

/// Message content: plain text for completions, content parts for vision.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(crate) enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub(crate) enum ContentPart {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
pub(crate) struct ImageUrl {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoice {
    pub message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponseMessage {
    #[serde(default)]
    pub content: String,
}

impl OpenAiClient {
    /// POST a chat request and pull out the first choice's text.
    pub(crate) async fn send_chat(&self, request: &ChatRequest) -> Result<String, OpenAiError> {
        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(OpenAiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_string())
            .ok_or(OpenAiError::EmptyResponse)
    }
}
