//! Text completion call: (system instruction, user prompt, sampling) → text.

use super::{ChatMessage, ChatRequest, MessageContent, OpenAiClient, OpenAiError, SamplingParams, MODEL};

impl OpenAiClient {
    /// Run one completion and return the raw text.
    pub async fn complete(
        &self,
        system: &str,
        prompt: &str,
        sampling: SamplingParams,
    ) -> Result<String, OpenAiError> {
        let request = ChatRequest {
            model: MODEL,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: MessageContent::Text(system.to_string()),
                },
                ChatMessage {
                    role: "user",
                    content: MessageContent::Text(prompt.to_string()),
                },
            ],
            sampling,
        };
        self.send_chat(&request).await
    }
}
