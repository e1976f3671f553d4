//! Conversation domain.
//!
//! - [`entities::Turn`]: a single user or assistant message
//! - [`entities::ConversationHistory`]: the ordered transcript of a session
//! - [`buffer::StreamingBuffer`]: the assistant answer while it streams in

pub mod buffer;
pub mod entities;
