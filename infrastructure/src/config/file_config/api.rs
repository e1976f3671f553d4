//! Backend endpoint configuration from TOML (`[api]` section)

use basilisk_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_PREDICTIONS_PATH: &str = "/api/predictions";

/// Raw API configuration from TOML
///
/// # Example
///
/// ```toml
/// [api]
/// base_url = "https://chat.example.com"
/// predictions_path = "/api/predictions"
/// api_token = "r8_..."
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileApiConfig {
    /// Origin of the chat backend
    pub base_url: String,
    /// Path of the prediction-creation endpoint, relative to `base_url`
    pub predictions_path: String,
    /// Optional bearer token sent with every request
    pub api_token: Option<String>,
}

impl Default for FileApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            predictions_path: DEFAULT_PREDICTIONS_PATH.to_string(),
            api_token: None,
        }
    }
}

impl FileApiConfig {
    /// Base URL with a blank value replaced by the default.
    pub fn parse_base_url(&self) -> (String, Vec<ConfigIssue>) {
        let trimmed = self.base_url.trim();
        if trimmed.is_empty() {
            let issue = ConfigIssue::warning(
                ConfigIssueCode::EmptyValue {
                    field: "api.base_url".to_string(),
                },
                format!("api.base_url is empty, falling back to '{DEFAULT_BASE_URL}'"),
            );
            return (DEFAULT_BASE_URL.to_string(), vec![issue]);
        }
        (trimmed.trim_end_matches('/').to_string(), vec![])
    }

    /// Token, ignoring blank values (an empty env var must not send `Bearer `).
    pub fn token(&self) -> Option<&str> {
        self.api_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}
