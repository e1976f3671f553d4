//! Transcript port.
//!
//! The chat session reports what happens to the conversation (turns entering
//! history, predictions being opened, streams failing) as typed
//! [`ConversationEvent`]s. Diagnostics stay on `tracing`; this port is the
//! record of the conversation itself.

use basilisk_domain::Turn;
use serde::Serialize;

/// Something that happened to the conversation.
///
/// Serializes internally tagged, e.g.
/// `{"event":"user_turn","text":"hi"}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ConversationEvent {
    /// A user message entered history.
    UserTurn { text: String },
    /// An answer (complete or abandoned part) entered history.
    AssistantTurn { text: String },
    /// The composed prompt had to drop its oldest turns to fit the budget.
    PromptTruncated {
        passes: usize,
        kept_turns: usize,
        total_turns: usize,
    },
    /// The backend accepted a prediction and its stream is open.
    PredictionCreated {
        id: Option<String>,
        stream_url: String,
        version: String,
        prompt_tokens: usize,
    },
    /// The stream ended with an error; `partial_chars` of answer were shown.
    StreamError { message: String, partial_chars: usize },
}

impl ConversationEvent {
    /// The event for a turn being appended to history.
    pub fn turn(turn: &Turn) -> Self {
        let text = turn.text().to_string();
        if turn.is_user() {
            Self::UserTurn { text }
        } else {
            Self::AssistantTurn { text }
        }
    }
}

/// Sink for conversation events.
///
/// `log` is synchronous and infallible; implementations swallow their own
/// write failures so a broken transcript never interrupts a chat.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// Drops every event. Used when no transcript is configured.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
