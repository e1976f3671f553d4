//! Application layer for basilisk-chat
//!
//! This crate contains the chat session use case and the port definitions
//! that infrastructure adapters implement. It depends only on the domain
//! layer.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    prediction_gateway::{
        GatewayError, PredictionGateway, PredictionHandle, PredictionRequest, StreamSink,
        StreamSubscription,
    },
};
pub use use_cases::chat_session::{ChatError, ChatSession, ChatUpdate, Submission};
