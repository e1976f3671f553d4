//! Model and sampling configuration from TOML (`[model]` section)

use basilisk_domain::settings::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, DEFAULT_TOP_P};
use basilisk_domain::{ConfigIssue, ConfigIssueCode, ModelVersion, Settings};
use serde::{Deserialize, Serialize};

/// Raw model configuration from TOML
///
/// # Example
///
/// ```toml
/// [model]
/// version = "V.2"            # "V.1", "VO1D", "V.2" or a 64-char version hash
/// system_prompt = "You are a helpful assistant."
/// temperature = 0.75
/// top_p = 0.9
/// max_tokens = 800
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModelConfig {
    pub version: String,
    /// Overrides the built-in system prompt when set
    pub system_prompt: Option<String>,
    pub temperature: f64,
    pub top_p: f64,
    pub max_tokens: u32,
}

impl Default for FileModelConfig {
    fn default() -> Self {
        Self {
            version: ModelVersion::default().short_name().to_string(),
            system_prompt: None,
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl FileModelConfig {
    /// Build session settings, replacing an unknown version or empty prompt
    /// with its default. Sampling numbers are passed through as written.
    pub fn to_settings(&self) -> (Settings, Vec<ConfigIssue>) {
        let mut issues = Vec::new();
        let mut settings = Settings::default();

        match self.version.parse::<ModelVersion>() {
            Ok(version) => settings.version = version,
            Err(_) => issues.push(ConfigIssue::warning(
                ConfigIssueCode::InvalidEnumValue {
                    field: "model.version".to_string(),
                    value: self.version.clone(),
                    valid_values: ModelVersion::catalog()
                        .iter()
                        .map(|v| v.short_name().to_string())
                        .collect(),
                },
                format!(
                    "model.version: unknown value '{}', falling back to '{}'",
                    self.version,
                    settings.version.short_name()
                ),
            )),
        }

        if let Some(prompt) = &self.system_prompt {
            if prompt.trim().is_empty() {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::EmptyValue {
                        field: "model.system_prompt".to_string(),
                    },
                    "model.system_prompt is empty, using the built-in prompt",
                ));
            } else {
                settings.system_prompt = prompt.clone();
            }
        }

        settings.temperature = self.temperature;
        settings.top_p = self.top_p;
        settings.max_tokens = self.max_tokens;

        (settings, issues)
    }
}
