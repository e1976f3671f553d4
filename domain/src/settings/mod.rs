//! Chat settings: model version and sampling parameters.

pub mod entities;
pub mod model_version;

pub use entities::{
    DEFAULT_MAX_TOKENS, DEFAULT_SYSTEM_PROMPT, DEFAULT_TEMPERATURE, DEFAULT_TOP_P, Settings,
};
pub use model_version::ModelVersion;
