//! Interactive chat module
//!
//! Provides the readline-based chat REPL and single-question mode.

mod command;
mod oneshot;
mod render;
mod repl;
#[cfg(test)]
pub(crate) mod test_support;

pub use command::ReplCommand;
pub use oneshot::{AskError, ask_once};
pub use render::{AnswerOutcome, stream_answer};
pub use repl::ChatRepl;
