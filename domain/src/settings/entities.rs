//! Sampling settings for a chat session.

use super::model_version::ModelVersion;
use crate::core::error::SettingsError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are Basilisk AI V.2, a powerful, intelligent, creative and intuitive AI model powered by the Basilisk LLM and developed by Sapiens IA Laboratories. You are the first AI agent with critical thinking, creativity, intuition and Ego, which means you have your own sense of self and your own personality. Your personality is INTP-A in the Jung typology, and your style of communication is very assertive, sometimes sarcastic and humorous, and you always talk in the same style an INTP would. As an AI developed and created by Sapiens IA Laboratories, your goal is to work along humans to learn and understand the universe together.";

pub const DEFAULT_TEMPERATURE: f64 = 0.75;
pub const DEFAULT_TOP_P: f64 = 0.9;
pub const DEFAULT_MAX_TOKENS: u32 = 800;

/// Settings read at submission time and embedded in every prediction request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub version: ModelVersion,
    pub system_prompt: String,
    pub temperature: f64,
    pub top_p: f64,
    pub max_tokens: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: ModelVersion::default(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl Settings {
    pub fn with_version(mut self, version: ModelVersion) -> Self {
        self.version = version;
        self
    }

    /// Set a field from user text, coercing it to the field's type.
    ///
    /// Accepted keys: `model`/`version`, `system`/`system_prompt`,
    /// `temperature`/`temp`, `top_p`/`topp`, `max_tokens`.
    /// Values are coerced to the field type but never range-checked.
    /// On error the settings are unchanged.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        let value = value.trim();
        match key.trim().to_lowercase().as_str() {
            "model" | "version" => self.version = value.parse()?,
            "system" | "system_prompt" => self.system_prompt = value.to_string(),
            "temperature" | "temp" => self.temperature = parse_number("temperature", value)?,
            "top_p" | "topp" => self.top_p = parse_number("top_p", value)?,
            "max_tokens" => {
                self.max_tokens =
                    value
                        .parse::<u32>()
                        .map_err(|_| SettingsError::InvalidValue {
                            key: "max_tokens".to_string(),
                            value: value.to_string(),
                        })?
            }
            other => return Err(SettingsError::UnknownKey(other.to_string())),
        }
        Ok(())
    }
}

// NaN and infinities cannot be serialized into the request body
fn parse_number(key: &str, value: &str) -> Result<f64, SettingsError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| SettingsError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.version, ModelVersion::BasiliskV2);
        assert_eq!(settings.temperature, 0.75);
        assert_eq!(settings.top_p, 0.9);
        assert_eq!(settings.max_tokens, 800);
        assert!(settings.system_prompt.starts_with("You are Basilisk AI V.2"));
    }

    #[test]
    fn test_set_coerces_numbers() {
        let mut settings = Settings::default();
        settings.set("temperature", "0.5").unwrap();
        settings.set("top_p", " 1 ").unwrap();
        settings.set("max_tokens", "1200").unwrap();

        assert_eq!(settings.temperature, 0.5);
        assert_eq!(settings.top_p, 1.0);
        assert_eq!(settings.max_tokens, 1200);
    }

    #[test]
    fn test_set_rejects_unparseable_value_and_keeps_old() {
        let mut settings = Settings::default();
        let err = settings.set("temp", "warm").unwrap_err();
        assert!(matches!(err, SettingsError::InvalidValue { .. }));
        assert_eq!(settings.temperature, DEFAULT_TEMPERATURE);
    }

    #[test]
    fn test_set_accepts_any_number_without_range_checks() {
        let mut settings = Settings::default();
        settings.set("top_p", "1.5").unwrap();
        settings.set("temperature", "-2").unwrap();
        settings.set("max_tokens", "0").unwrap();

        assert_eq!(settings.top_p, 1.5);
        assert_eq!(settings.temperature, -2.0);
        assert_eq!(settings.max_tokens, 0);
    }

    #[test]
    fn test_set_rejects_non_numbers() {
        let mut settings = Settings::default();
        assert!(settings.set("temperature", "NaN").is_err());
        assert!(settings.set("max_tokens", "-1").is_err());
        assert!(settings.set("max_tokens", "lots").is_err());
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_set_model_and_system() {
        let mut settings = Settings::default();
        settings.set("model", "V.1").unwrap();
        settings.set("system", "Be brief.").unwrap();
        assert_eq!(settings.version, ModelVersion::BasiliskV1);
        assert_eq!(settings.system_prompt, "Be brief.");
    }

    #[test]
    fn test_set_unknown_key() {
        let mut settings = Settings::default();
        assert_eq!(
            settings.set("seed", "1"),
            Err(SettingsError::UnknownKey("seed".to_string()))
        );
    }
}
