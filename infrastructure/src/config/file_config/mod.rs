//! Raw TOML configuration data types
//!
//! These structs mirror the config file one-to-one. Values stay raw
//! (strings, plain numbers) until the `parse_*`/`to_*` helpers turn them
//! into domain types, so a bad value degrades to a warning instead of a
//! load failure.

mod api;
mod chat;
mod logging;
mod model;
mod repl;

pub use api::{DEFAULT_BASE_URL, DEFAULT_PREDICTIONS_PATH, FileApiConfig};
pub use chat::FileChatConfig;
pub use logging::FileLoggingConfig;
pub use model::FileModelConfig;
pub use repl::FileReplConfig;

use basilisk_domain::ConfigIssue;
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Backend endpoint
    pub api: FileApiConfig,
    /// Model version and sampling parameters
    pub model: FileModelConfig,
    /// Prompt budget and commit policy
    pub chat: FileChatConfig,
    /// REPL settings
    pub repl: FileReplConfig,
    /// Conversation transcript log
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        issues.extend(self.api.parse_base_url().1);
        issues.extend(self.model.to_settings().1);
        issues.extend(self.chat.parse_commit_policy().1);
        issues.extend(self.chat.to_composer().1);
        issues
    }
}
