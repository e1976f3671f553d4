//! Configuration file loading for basilisk-chat
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `BASILISK_*` environment variables (`BASILISK_MODEL__TEMPERATURE=0.3`)
//! 2. `--config <path>` specified file
//! 3. Project root: `./basilisk.toml` or `./.basilisk.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/basilisk-chat/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    DEFAULT_BASE_URL, DEFAULT_PREDICTIONS_PATH, FileApiConfig, FileChatConfig, FileConfig,
    FileLoggingConfig, FileModelConfig, FileReplConfig,
};
pub use loader::{ConfigError, ConfigLoader};
