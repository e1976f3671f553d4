//! Live buffer for the assistant turn currently being streamed.

use super::entities::Turn;
use serde::{Deserialize, Serialize};

/// Lifecycle of a [`StreamingBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BufferState {
    /// Nothing has been requested yet.
    #[default]
    Idle,
    /// A prediction stream is open and fragments may still arrive.
    Streaming,
    /// The stream ended with `done`; the text is a finished answer.
    Completed,
    /// The stream was closed by a newer submission before `done`.
    Interrupted,
    /// The stream ended with `error`; the text is kept for display only.
    Failed,
    /// The text has already been frozen into a history turn.
    Committed,
}

/// Accumulates fragments of the in-flight assistant answer.
///
/// Fragments are only accepted while [`BufferState::Streaming`]. Once the
/// text has been turned into a [`Turn`] the buffer refuses to do it again,
/// so an answer can never be committed twice.
#[derive(Debug, Clone, Default)]
pub struct StreamingBuffer {
    text: String,
    state: BufferState,
    fragments: usize,
}

impl StreamingBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset to an empty buffer for a new prediction.
    pub fn begin(&mut self) {
        self.text.clear();
        self.fragments = 0;
        self.state = BufferState::Streaming;
    }

    /// Append a fragment. Returns `false` when the buffer is not streaming.
    pub fn append(&mut self, fragment: &str) -> bool {
        if self.state != BufferState::Streaming {
            return false;
        }
        self.text.push_str(fragment);
        self.fragments += 1;
        true
    }

    pub fn complete(&mut self) {
        if self.state == BufferState::Streaming {
            self.state = BufferState::Completed;
        }
    }

    pub fn interrupt(&mut self) {
        if self.state == BufferState::Streaming {
            self.state = BufferState::Interrupted;
        }
    }

    pub fn fail(&mut self) {
        if self.state == BufferState::Streaming {
            self.state = BufferState::Failed;
        }
    }

    /// Whether the buffer holds an answer that belongs in the history.
    pub fn is_committable(&self) -> bool {
        matches!(
            self.state,
            BufferState::Completed | BufferState::Interrupted
        ) && !self.text.is_empty()
    }

    /// Freeze the text into an assistant turn, at most once.
    pub fn take_turn(&mut self) -> Option<Turn> {
        if !self.is_committable() {
            return None;
        }
        self.state = BufferState::Committed;
        Some(Turn::assistant(self.text.clone()))
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn state(&self) -> BufferState {
        self.state
    }

    pub fn is_streaming(&self) -> bool {
        self.state == BufferState::Streaming
    }

    /// Number of fragments received since the last [`begin`](Self::begin).
    pub fn fragment_count(&self) -> usize {
        self.fragments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragments_are_appended_in_order() {
        let mut buffer = StreamingBuffer::new();
        buffer.begin();
        assert!(buffer.append("Hel"));
        assert!(buffer.append("lo"));
        buffer.complete();

        assert_eq!(buffer.text(), "Hello");
        assert_eq!(buffer.fragment_count(), 2);
        assert_eq!(buffer.take_turn(), Some(Turn::assistant("Hello")));
    }

    #[test]
    fn idle_buffer_rejects_fragments() {
        let mut buffer = StreamingBuffer::new();
        assert!(!buffer.append("late"));
        assert_eq!(buffer.text(), "");
    }

    #[test]
    fn turn_is_taken_only_once() {
        let mut buffer = StreamingBuffer::new();
        buffer.begin();
        buffer.append("answer");
        buffer.complete();

        assert!(buffer.take_turn().is_some());
        assert!(buffer.take_turn().is_none());
        assert_eq!(buffer.state(), BufferState::Committed);
        // Text stays visible after commit
        assert_eq!(buffer.text(), "answer");
    }

    #[test]
    fn failed_buffer_keeps_text_but_is_not_committable() {
        let mut buffer = StreamingBuffer::new();
        buffer.begin();
        buffer.append("partial");
        buffer.fail();

        assert_eq!(buffer.text(), "partial");
        assert!(!buffer.is_committable());
        assert!(buffer.take_turn().is_none());
        assert!(!buffer.append("more"));
    }

    #[test]
    fn interrupted_buffer_is_committable() {
        let mut buffer = StreamingBuffer::new();
        buffer.begin();
        buffer.append("half an ans");
        buffer.interrupt();

        assert_eq!(buffer.take_turn(), Some(Turn::assistant("half an ans")));
    }

    #[test]
    fn empty_completed_buffer_is_not_committable() {
        let mut buffer = StreamingBuffer::new();
        buffer.begin();
        buffer.complete();
        assert!(buffer.take_turn().is_none());
    }

    #[test]
    fn begin_resets_previous_answer() {
        let mut buffer = StreamingBuffer::new();
        buffer.begin();
        buffer.append("old");
        buffer.complete();
        buffer.begin();

        assert_eq!(buffer.text(), "");
        assert_eq!(buffer.fragment_count(), 0);
        assert!(buffer.is_streaming());
    }
}
