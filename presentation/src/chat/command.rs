//! Slash commands understood by the REPL

/// A parsed `/command` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Help,
    Settings,
    Models,
    Model(String),
    Set { key: String, value: String },
    /// `None` shows the current system prompt
    System(Option<String>),
    History,
    Quit,
    /// Known command with missing arguments; carries the usage line
    Usage(&'static str),
    Unknown(String),
}

impl ReplCommand {
    /// Parse a line, or `None` if it is a chat message rather than a command.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let rest = line.strip_prefix('/')?;
        let (name, args) = match rest.split_once(char::is_whitespace) {
            Some((name, args)) => (name, args.trim()),
            None => (rest, ""),
        };

        let command = match name.to_lowercase().as_str() {
            "help" | "h" | "?" => ReplCommand::Help,
            "settings" => ReplCommand::Settings,
            "models" => ReplCommand::Models,
            "model" if args.is_empty() => ReplCommand::Usage("/model <name>"),
            "model" => ReplCommand::Model(args.to_string()),
            "set" => match args.split_once(char::is_whitespace) {
                Some((key, value)) if !value.trim().is_empty() => ReplCommand::Set {
                    key: key.to_string(),
                    value: value.trim().to_string(),
                },
                _ => ReplCommand::Usage("/set <temperature|top_p|max_tokens> <value>"),
            },
            "system" if args.is_empty() => ReplCommand::System(None),
            "system" => ReplCommand::System(Some(args.to_string())),
            "history" => ReplCommand::History,
            "quit" | "exit" | "q" => ReplCommand::Quit,
            _ => ReplCommand::Unknown(line.to_string()),
        };
        Some(command)
    }
}
