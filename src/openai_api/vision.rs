//! Image transcription call: (image bytes, instruction) → transcript text.
//!
//! Used for journal pages (→ sectioned plain text), weekly reflections
//! (→ structured JSON text), and screen-time screenshots (→ CSV rows).
//! The caller chooses what to do with the text; this layer only moves it.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use super::{
    ChatMessage, ChatRequest, ContentPart, ImageUrl, MessageContent, OpenAiClient, OpenAiError,
    SamplingParams, MODEL,
};

impl OpenAiClient {
    /// Transcribe one PNG image under the given instruction.
    pub async fn transcribe_image(
        &self,
        image_bytes: &[u8],
        instruction: &str,
    ) -> Result<String, OpenAiError> {
        let data_url = format!("data:image/png;base64,{}", BASE64.encode(image_bytes));
        let request = ChatRequest {
            model: MODEL,
            messages: vec![ChatMessage {
                role: "user",
                content: MessageContent::Parts(vec![
                    ContentPart::Text {
                        text: instruction.to_string(),
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl { url: data_url },
                    },
                ]),
            }],
            sampling: SamplingParams::transcription(),
        };
        self.send_chat(&request).await
    }
}
