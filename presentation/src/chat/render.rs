//! Streams an answer to the terminal as it arrives.

use crate::progress::reporter::ResponseSpinner;
use basilisk_application::{ChatSession, ChatUpdate};
use std::io::{self, Write};

/// How a streamed answer ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerOutcome {
    Completed,
    Failed(String),
    /// Ctrl-C while streaming; the partial answer stays in the session
    Interrupted,
}

/// Write fragments of the open prediction to `out` until it ends.
///
/// The spinner is cleared on the first fragment or when the stream ends.
pub async fn stream_answer<W: Write>(
    session: &mut ChatSession,
    out: &mut W,
    mut spinner: ResponseSpinner,
) -> io::Result<AnswerOutcome> {
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        let update = tokio::select! {
            update = session.next_update() => update,
            _ = &mut ctrl_c => None,
        };

        let Some(update) = update else {
            spinner.clear();
            session.close();
            writeln!(out)?;
            return Ok(AnswerOutcome::Interrupted);
        };

        match update {
            ChatUpdate::Fragment { text, first } => {
                if first {
                    spinner.clear();
                }
                write!(out, "{text}")?;
                out.flush()?;
            }
            ChatUpdate::Completed { .. } => {
                spinner.clear();
                writeln!(out)?;
                return Ok(AnswerOutcome::Completed);
            }
            ChatUpdate::Failed { message } => {
                spinner.clear();
                writeln!(out)?;
                return Ok(AnswerOutcome::Failed(message));
            }
        }
    }
}
