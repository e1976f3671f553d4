//! Infrastructure layer for basilisk-chat
//!
//! Adapters for the application ports: the HTTP/SSE prediction gateway and
//! the JSONL transcript logger, plus configuration file loading.

pub mod config;
pub mod logging;
pub mod prediction;

// Re-export commonly used types
pub use config::{
    ConfigError, ConfigLoader, FileApiConfig, FileChatConfig, FileConfig, FileLoggingConfig,
    FileModelConfig, FileReplConfig,
};
pub use logging::JsonlConversationLogger;
pub use prediction::HttpPredictionGateway;
