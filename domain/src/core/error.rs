//! Domain error types

use thiserror::Error;

/// Errors raised while composing a prompt from the conversation history.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComposeError {
    /// The prompt is still over budget and no further turns can be dropped.
    ///
    /// Carries the message the user typed so callers can hand it back
    /// instead of losing it.
    #[error("Your message is too long. Please try again with a shorter message.")]
    MessageTooLong {
        message: String,
        estimated_tokens: usize,
        max_tokens: usize,
    },
}

impl ComposeError {
    /// The user text that was rejected.
    pub fn rejected_message(&self) -> &str {
        match self {
            ComposeError::MessageTooLong { message, .. } => message,
        }
    }
}

/// Errors raised while editing chat settings.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SettingsError {
    #[error("Unknown model version: {0}")]
    UnknownVersion(String),

    #[error("Unknown setting: {0}")]
    UnknownKey(String),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}
