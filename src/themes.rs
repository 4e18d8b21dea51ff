//! Journal theme extraction.
//!
//! Derives an ordered `theme name → description` map from recent journal
//! entries via the completion service. Structured-extraction rules apply:
//! code fences are stripped, and a response that still fails to parse is
//! downgraded to an empty theme map with the raw output preserved, so
//! never an error.

use crate::journal;
use crate::openai_api::{OpenAiClient, OpenAiError, SamplingParams};
use crate::parser::strip_code_fences;
use crate::prompts;
use crate::signals::ThemeMap;
use crate::types::JournalEntry;

/// How many of the most recent entries feed the theme prompt.
pub const THEME_SAMPLE_SIZE: usize = 500;

/// Theme extraction result. `raw_output` is set only when the response
/// could not be parsed as JSON.
#[derive(Debug, Clone, Default)]
pub struct ThemeExtraction {
    pub themes: ThemeMap,
    pub raw_output: Option<String>,
}

/// Parse the model's JSON object into an ordered theme map.
pub fn parse_theme_output(raw: &str) -> ThemeExtraction {
    let cleaned = strip_code_fences(raw);
    match serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(&cleaned) {
        Ok(object) => ThemeExtraction {
            themes: object
                .into_iter()
                .map(|(name, value)| {
                    let description = match value {
                        serde_json::Value::String(s) => s,
                        other => other.to_string(),
                    };
                    (name, description)
                })
                .collect(),
            raw_output: None,
        },
        Err(e) => {
            log::warn!("theme output unparseable ({e}); keeping raw text");
            ThemeExtraction {
                themes: ThemeMap::new(),
                raw_output: Some(raw.trim().to_string()),
            }
        }
    }
}

/// Extract themes from the journal via the completion service.
pub async fn extract_journal_themes(
    client: &OpenAiClient,
    entries: &[JournalEntry],
) -> Result<ThemeExtraction, OpenAiError> {
    let journal_text = journal::sample_recent(entries, THEME_SAMPLE_SIZE);
    let prompt = prompts::themes_prompt(&journal_text);
    let raw = client
        .complete(prompts::THEMES_SYSTEM, &prompt, SamplingParams::themes())
        .await?;
    Ok(parse_theme_output(&raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_theme_output_preserves_order() {
        let raw = r#"{"Restlessness": "always moving", "Creative Urge": "makes things"}"#;
        let extraction = parse_theme_output(raw);
        assert_eq!(extraction.themes.len(), 2);
        assert_eq!(extraction.themes[0].0, "Restlessness");
        assert_eq!(extraction.themes[1].0, "Creative Urge");
        assert!(extraction.raw_output.is_none());
    }

    #[test]
    fn test_parse_theme_output_fenced() {
        let raw = "```json\n{\"Awe\": \"looks up\"}\n```";
        let extraction = parse_theme_output(raw);
        assert_eq!(extraction.themes[0].0, "Awe");
    }

    #[test]
    fn test_parse_theme_output_fallback_preserves_raw() {
        let raw = "Here are some themes I noticed...";
        let extraction = parse_theme_output(raw);
        assert!(extraction.themes.is_empty());
        assert_eq!(extraction.raw_output.as_deref(), Some(raw));
    }
}
