//! Conversation configuration from TOML (`[chat]` section)

use basilisk_domain::{CommitPolicy, ConfigIssue, ConfigIssueCode, MAX_TOKENS, PromptComposer};
use serde::{Deserialize, Serialize};

/// Raw chat configuration from TOML
///
/// # Example
///
/// ```toml
/// [chat]
/// max_prompt_tokens = 4096
/// commit = "eager"           # "eager" or "lazy"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileChatConfig {
    /// Prompt token budget
    pub max_prompt_tokens: usize,
    /// When a streamed answer joins the history
    pub commit: String,
}

impl Default for FileChatConfig {
    fn default() -> Self {
        Self {
            max_prompt_tokens: MAX_TOKENS,
            commit: CommitPolicy::default().to_string(),
        }
    }
}

impl FileChatConfig {
    pub fn parse_commit_policy(&self) -> (CommitPolicy, Vec<ConfigIssue>) {
        match self.commit.parse::<CommitPolicy>() {
            Ok(policy) => (policy, vec![]),
            Err(_) => {
                let fallback = CommitPolicy::default();
                let issue = ConfigIssue::warning(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "chat.commit".to_string(),
                        value: self.commit.clone(),
                        valid_values: vec!["eager".to_string(), "lazy".to_string()],
                    },
                    format!(
                        "chat.commit: unknown value '{}', falling back to '{fallback}'",
                        self.commit
                    ),
                );
                (fallback, vec![issue])
            }
        }
    }

    pub fn to_composer(&self) -> (PromptComposer, Vec<ConfigIssue>) {
        if self.max_prompt_tokens == 0 {
            let issue = ConfigIssue::warning(
                ConfigIssueCode::OutOfRange {
                    field: "chat.max_prompt_tokens".to_string(),
                },
                format!("chat.max_prompt_tokens must be positive, falling back to {MAX_TOKENS}"),
            );
            return (PromptComposer::default(), vec![issue]);
        }
        (PromptComposer::new(self.max_prompt_tokens), vec![])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FileChatConfig::default();
        assert_eq!(config.parse_commit_policy().0, CommitPolicy::Eager);
        assert_eq!(config.to_composer().0.max_tokens(), 4096);
    }

    #[test]
    fn test_lazy_policy() {
        let config = FileChatConfig {
            commit: "Lazy".to_string(),
            ..Default::default()
        };
        let (policy, issues) = config.parse_commit_policy();
        assert_eq!(policy, CommitPolicy::Lazy);
        assert!(issues.is_empty());
    }

    #[test]
    fn test_unknown_policy_warns() {
        let config = FileChatConfig {
            commit: "sometimes".to_string(),
            ..Default::default()
        };
        let (policy, issues) = config.parse_commit_policy();
        assert_eq!(policy, CommitPolicy::Eager);
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn test_zero_budget_warns() {
        let config = FileChatConfig {
            max_prompt_tokens: 0,
            ..Default::default()
        };
        let (composer, issues) = config.to_composer();
        assert_eq!(composer.max_tokens(), 4096);
        assert_eq!(issues.len(), 1);
    }
}
