//! Run configuration.
//!
//! Loaded once per run from `~/.reflectos/config.json`, with secrets
//! overridable from the environment (`OPENAI_KEY`, `TWILIO_ACCOUNT_SID`,
//! `TWILIO_AUTH_TOKEN`, `FROM_NUMBER`, `PHONE_NUMBER`). The config value
//! is handed into the pipeline constructor; nothing reads globals after
//! startup.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;
use crate::twilio_api::TwilioConfig;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Root of the data tree (calendar/, screen_time/, journal/,
    /// weekly_notes/, tables/). Defaults to `~/.reflectos/data`.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twilio_account_sid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twilio_auth_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_number: Option<String>,
}

fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".reflectos").join("config.json"))
}

fn env_override(current: &mut Option<String>, var: &str) {
    if let Ok(value) = std::env::var(var) {
        if !value.trim().is_empty() {
            *current = Some(value);
        }
    }
}

impl Config {
    /// Load the config file (absent file is fine) and apply env
    /// overrides for secrets.
    pub fn load() -> Result<Self, PipelineError> {
        let mut config = match config_path() {
            Some(path) if path.exists() => {
                let content = fs::read_to_string(&path)?;
                serde_json::from_str(&content).map_err(|e| {
                    PipelineError::Configuration(format!("{}: {e}", path.display()))
                })?
            }
            _ => Config::default(),
        };

        env_override(&mut config.openai_key, "OPENAI_KEY");
        env_override(&mut config.twilio_account_sid, "TWILIO_ACCOUNT_SID");
        env_override(&mut config.twilio_auth_token, "TWILIO_AUTH_TOKEN");
        env_override(&mut config.from_number, "FROM_NUMBER");
        env_override(&mut config.to_number, "PHONE_NUMBER");

        Ok(config)
    }

    pub fn openai_key(&self) -> Result<String, PipelineError> {
        self.openai_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                PipelineError::Configuration("completion-service key not configured".to_string())
            })
    }

    pub fn twilio(&self) -> Result<TwilioConfig, PipelineError> {
        let field = |value: &Option<String>, name: &str| {
            value
                .clone()
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| PipelineError::Configuration(format!("{name} not configured")))
        };
        Ok(TwilioConfig {
            account_sid: field(&self.twilio_account_sid, "twilio_account_sid")?,
            auth_token: field(&self.twilio_auth_token, "twilio_auth_token")?,
            from_number: field(&self.from_number, "from_number")?,
            to_number: field(&self.to_number, "to_number")?,
        })
    }

    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".reflectos")
                .join("data")
        })
    }

    pub fn calendar_csv(&self) -> PathBuf {
        self.data_dir().join("calendar").join("calendar.csv")
    }

    pub fn screen_time_dir(&self) -> PathBuf {
        self.data_dir().join("screen_time")
    }

    pub fn journal_dir(&self) -> PathBuf {
        self.data_dir().join("journal")
    }

    pub fn weekly_notes_dir(&self) -> PathBuf {
        self.data_dir().join("weekly_notes")
    }

    /// Cached normalized tables live here between runs.
    pub fn tables_dir(&self) -> PathBuf {
        self.data_dir().join("tables")
    }

    pub fn with_data_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.data_dir = Some(dir.as_ref().to_path_buf());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_secrets_are_configuration_errors() {
        let config = Config::default();
        assert!(matches!(
            config.openai_key(),
            Err(PipelineError::Configuration(_))
        ));
        assert!(matches!(config.twilio(), Err(PipelineError::Configuration(_))));
    }

    #[test]
    fn test_twilio_assembled_when_complete() {
        let config = Config {
            twilio_account_sid: Some("AC1".to_string()),
            twilio_auth_token: Some("tok".to_string()),
            from_number: Some("+1".to_string()),
            to_number: Some("+2".to_string()),
            ..Default::default()
        };
        let twilio = config.twilio().unwrap();
        assert_eq!(twilio.account_sid, "AC1");
        assert_eq!(twilio.to_number, "+2");
    }

    #[test]
    fn test_data_paths_hang_off_data_dir() {
        let config = Config::default().with_data_dir("/tmp/reflectos-data");
        assert_eq!(
            config.screen_time_dir(),
            PathBuf::from("/tmp/reflectos-data/screen_time")
        );
        assert_eq!(
            config.calendar_csv(),
            PathBuf::from("/tmp/reflectos-data/calendar/calendar.csv")
        );
    }
}
