//! Messaging collaborator client.
//!
//! Sends the reflective message through the Twilio Messages API: one
//! form-encoded POST, basic auth, delivery record back. Exactly one
//! message per pipeline run; a failure here is run-fatal upstream.

use serde::Deserialize;

use crate::types::WhisperStatus;

const DEFAULT_BASE_URL: &str = "https://api.twilio.com";

/// Preview length recorded in the delivery status.
pub const PREVIEW_CHARS: usize = 60;

#[derive(Debug, thiserror::Error)]
pub enum TwilioError {
    #[error("HTTP: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },
    #[error("no recipient configured")]
    MissingRecipient,
}

/// Messaging credentials plus the fixed sender/recipient pair.
#[derive(Debug, Clone)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: String,
    pub to_number: String,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    sid: String,
    #[serde(default)]
    to: String,
}

/// Typed client for the messaging service.
#[derive(Debug, Clone)]
pub struct TwilioClient {
    http: reqwest::Client,
    config: TwilioConfig,
    base_url: String,
}

impl TwilioClient {
    pub fn new(config: TwilioConfig) -> Self {
        TwilioClient {
            http: reqwest::Client::new(),
            config,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the client at a different endpoint (test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Send one message and return its delivery record.
    pub async fn send_message(&self, body: &str) -> Result<WhisperStatus, TwilioError> {
        if self.config.to_number.trim().is_empty() {
            return Err(TwilioError::MissingRecipient);
        }

        let url = format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.base_url, self.config.account_sid
        );
        let params = [
            ("Body", body),
            ("From", self.config.from_number.as_str()),
            ("To", self.config.to_number.as_str()),
        ];

        let response = self
            .http
            .post(url)
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(TwilioError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: MessageResponse = response.json().await?;
        Ok(WhisperStatus {
            status: parsed.status,
            sid: parsed.sid,
            to: parsed.to,
            preview: body.chars().take(PREVIEW_CHARS).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(to: &str) -> TwilioConfig {
        TwilioConfig {
            account_sid: "AC123".to_string(),
            auth_token: "token".to_string(),
            from_number: "+15550100".to_string(),
            to_number: to.to_string(),
        }
    }

    #[tokio::test]
    async fn test_missing_recipient_rejected_before_send() {
        let client = TwilioClient::new(config("  "));
        let err = client.send_message("hello").await.unwrap_err();
        assert!(matches!(err, TwilioError::MissingRecipient));
    }

    #[test]
    fn test_message_response_tolerates_missing_fields() {
        let parsed: MessageResponse = serde_json::from_str("{\"sid\": \"SM1\"}").unwrap();
        assert_eq!(parsed.sid, "SM1");
        assert_eq!(parsed.status, "");
    }
}
