//! Streaming events for prediction output.
//!
//! [`StreamEvent`] is what the transport hands to the chat session for every
//! server-sent event it receives on a prediction stream.

/// An event on a prediction stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// A text fragment to append to the answer (SSE `output`).
    Output(String),
    /// The prediction finished successfully (SSE `done`).
    Done,
    /// The prediction failed (SSE `error`, or a transport failure).
    Error(String),
}

impl StreamEvent {
    /// Returns true if this event signals the end of the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Done | StreamEvent::Error(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_is_not_terminal() {
        assert!(!StreamEvent::Output("hello".to_string()).is_terminal());
    }

    #[test]
    fn done_and_error_are_terminal() {
        assert!(StreamEvent::Done.is_terminal());
        assert!(StreamEvent::Error("oops".to_string()).is_terminal());
    }
}
