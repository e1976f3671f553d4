//! Presentation layer for basilisk-chat
//!
//! This crate contains the CLI definition, the interactive chat REPL,
//! console formatting and the waiting spinner.

pub mod chat;
pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use chat::{AskError, ChatRepl, ask_once};
pub use cli::commands::Cli;
pub use output::console::ConsoleFormatter;
pub use progress::reporter::ResponseSpinner;
