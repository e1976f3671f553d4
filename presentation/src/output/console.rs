//! Console formatting for the chat REPL

use basilisk_domain::util::preview;
use basilisk_domain::{CommitPolicy, ConversationHistory, ModelVersion, Settings};
use colored::Colorize;

const HISTORY_PREVIEW_CHARS: usize = 100;
const SYSTEM_PREVIEW_CHARS: usize = 60;

/// Formats session state and messages for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    pub fn welcome(settings: &Settings) -> String {
        let mut output = String::new();
        output.push('\n');
        output.push_str("╭─────────────────────────────────────────────╮\n");
        output.push_str("│              Basilisk Chat                  │\n");
        output.push_str("╰─────────────────────────────────────────────╯\n");
        output.push('\n');
        output.push_str(&format!(
            "{} {}\n",
            "Model:".cyan().bold(),
            settings.version.name()
        ));
        output.push_str(&format!(
            "Type {} for commands, {} to leave.\n",
            "/help".yellow(),
            "/quit".yellow()
        ));
        output
    }

    pub fn help() -> String {
        let mut output = String::new();
        output.push('\n');
        output.push_str(&format!("{}\n", "Commands:".cyan().bold()));
        for (command, description) in [
            ("/help, /h, /?", "Show this help"),
            ("/settings", "Show the current settings"),
            ("/models", "List available models"),
            ("/model <name>", "Switch model (V.1, VO1D, V.2 or a version hash)"),
            ("/set <key> <value>", "Change temperature, top_p or max_tokens"),
            ("/system [text]", "Show or replace the system prompt"),
            ("/history", "Show the conversation so far"),
            ("/quit, /exit, /q", "Exit chat"),
        ] {
            output.push_str(&format!("  {:<20} - {}\n", command, description));
        }
        output
    }

    pub fn settings(settings: &Settings, commit_policy: CommitPolicy, token_budget: usize) -> String {
        let rows = [
            ("model", format!("{} ({})", settings.version.name(), settings.version.version_id())),
            ("temperature", settings.temperature.to_string()),
            ("top_p", settings.top_p.to_string()),
            ("max_tokens", settings.max_tokens.to_string()),
            ("system", preview(&settings.system_prompt, SYSTEM_PREVIEW_CHARS)),
            ("commit", commit_policy.to_string()),
            ("prompt budget", format!("{token_budget} tokens")),
        ];

        let mut output = format!("\n{}\n", "Settings:".cyan().bold());
        for (key, value) in rows {
            output.push_str(&format!("  {:<14} {}\n", key.bold(), value));
        }
        output
    }

    pub fn models(current: &ModelVersion) -> String {
        let mut output = format!("\n{}\n", "Available models:".cyan().bold());
        for model in ModelVersion::catalog() {
            let marker = if &model == current { "*".green().bold() } else { " ".normal() };
            output.push_str(&format!(
                "{} {:<6} {}\n",
                marker,
                model.short_name(),
                model.name()
            ));
        }
        if let ModelVersion::Custom(hash) = current {
            output.push_str(&format!("{} custom {}\n", "*".green().bold(), hash));
        }
        output
    }

    pub fn history(history: &ConversationHistory) -> String {
        if history.is_empty() {
            return format!("{}\n", "No messages yet.".dimmed());
        }

        let mut output = format!("\n{}\n", "Conversation:".cyan().bold());
        for (index, turn) in history.iter().enumerate() {
            let speaker = if turn.is_user() {
                "you".yellow().bold()
            } else {
                "basilisk".green().bold()
            };
            output.push_str(&format!(
                "{:>3}. {}: {}\n",
                index + 1,
                speaker,
                preview(turn.text(), HISTORY_PREVIEW_CHARS)
            ));
        }
        output
    }

    pub fn prompt(settings: &Settings) -> String {
        format!("[{}] >>> ", settings.version.short_name())
    }

    pub fn error(message: &str) -> String {
        format!("{} {}", "Error:".red().bold(), message)
    }

    pub fn warning(message: &str) -> String {
        format!("{} {}", "Warning:".yellow().bold(), message)
    }

    pub fn info(message: &str) -> String {
        format!("{} {}", "->".cyan(), message)
    }
}
