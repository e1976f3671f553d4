//! Single-question mode: ask, stream the answer, exit.

use super::render::{AnswerOutcome, stream_answer};
use crate::progress::reporter::ResponseSpinner;
use basilisk_application::{ChatError, ChatSession};
use std::io::Write;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AskError {
    #[error(transparent)]
    Submit(#[from] ChatError),

    #[error("{0}")]
    Stream(String),

    #[error("Interrupted")]
    Interrupted,

    #[error("Failed to write answer: {0}")]
    Output(#[from] std::io::Error),
}

/// Submit `prompt` and stream the answer to `out`.
pub async fn ask_once<W: Write>(
    session: &mut ChatSession,
    prompt: &str,
    out: &mut W,
    show_progress: bool,
) -> Result<(), AskError> {
    let spinner = ResponseSpinner::start("Thinking...", show_progress);
    session.submit(prompt).await?;

    match stream_answer(session, out, spinner).await? {
        AnswerOutcome::Completed => Ok(()),
        AnswerOutcome::Failed(message) => Err(AskError::Stream(message)),
        AnswerOutcome::Interrupted => Err(AskError::Interrupted),
    }
}
