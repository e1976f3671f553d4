//! CLI command definitions

use basilisk_domain::{Settings, SettingsError};
use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for basilisk-chat
#[derive(Parser, Debug)]
#[command(name = "basilisk-chat")]
#[command(author, version, about = "Chat with Basilisk models from the terminal")]
#[command(long_about = r#"
basilisk-chat sends your conversation to a prediction backend and streams the
answer back as it is generated. Long conversations are trimmed automatically
to fit the model's prompt budget.

Configuration files are loaded from (in priority order):
1. BASILISK_* environment variables   e.g. BASILISK_API__BASE_URL
2. --config <path>                     Explicit config file
3. ./basilisk.toml                     Project-level config
4. ~/.config/basilisk-chat/config.toml Global config

Example:
  basilisk-chat "Explain ownership in one paragraph"
  basilisk-chat -m V.1 --temperature 0.3
  basilisk-chat --api-url https://chat.example.com
"#)]
pub struct Cli {
    /// Ask a single question and exit (starts the interactive chat when omitted)
    pub prompt: Option<String>,

    /// Model version: V.1, VO1D, V.2 or a version hash
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// System prompt sent with every request
    #[arg(long, value_name = "TEXT")]
    pub system: Option<String>,

    /// Sampling temperature (0-5)
    #[arg(long, value_name = "F")]
    pub temperature: Option<f64>,

    /// Nucleus sampling threshold (0-1)
    #[arg(long, value_name = "F")]
    pub top_p: Option<f64>,

    /// Maximum number of tokens to generate
    #[arg(long, value_name = "N")]
    pub max_tokens: Option<u32>,

    /// Base URL of the chat backend
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Also write diagnostics as JSON to a daily-rotated file in DIR
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Append the conversation transcript (JSONL) to PATH
    #[arg(long, value_name = "PATH")]
    pub conversation_log: Option<PathBuf>,
}

impl Cli {
    /// Apply command-line overrides on top of configured settings.
    ///
    /// Values go through the same coercion as `/set` in the REPL.
    pub fn apply_overrides(&self, settings: &mut Settings) -> Result<(), SettingsError> {
        if let Some(model) = &self.model {
            settings.set("model", model)?;
        }
        if let Some(system) = &self.system {
            settings.set("system", system)?;
        }
        if let Some(temperature) = self.temperature {
            settings.set("temperature", &temperature.to_string())?;
        }
        if let Some(top_p) = self.top_p {
            settings.set("top_p", &top_p.to_string())?;
        }
        if let Some(max_tokens) = self.max_tokens {
            settings.set("max_tokens", &max_tokens.to_string())?;
        }
        Ok(())
    }
}
