//! Domain layer for basilisk-chat
//!
//! This crate contains the core chat logic: the conversation transcript,
//! token-budgeted prompt composition, the streaming answer buffer and the
//! session settings. It has no dependencies on infrastructure or
//! presentation concerns.
//!
//! # Core Concepts
//!
//! ## Prompt composition
//!
//! Every submission renders the whole transcript into one instruction-style
//! prompt. When the estimate exceeds the budget, the second and third turns
//! are dropped (the first turn anchors the conversation) and a
//! `<!-- snip -->` marker is prepended.
//!
//! ## Streaming
//!
//! Answers arrive as `output` fragments and finish with `done` or `error`.
//! The [`StreamingBuffer`] accumulates fragments and freezes them into a
//! [`Turn`] at most once.

pub mod config;
pub mod conversation;
pub mod core;
pub mod prompt;
pub mod settings;
pub mod stream;
pub mod util;

// Re-export commonly used types
pub use config::{CommitPolicy, ConfigIssue, ConfigIssueCode, Severity};
pub use conversation::{
    buffer::{BufferState, StreamingBuffer},
    entities::{ConversationHistory, Turn},
};
pub use core::error::{ComposeError, SettingsError};
pub use prompt::{
    ComposedPrompt, Composition, MAX_TOKENS, PromptComposer, SNIP_MARKER,
    approximate_token_count,
};
pub use settings::{ModelVersion, Settings};
pub use stream::StreamEvent;
