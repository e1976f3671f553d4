//! REPL (Read-Eval-Print Loop) for interactive chat

use super::command::ReplCommand;
use super::render::{AnswerOutcome, stream_answer};
use crate::ConsoleFormatter;
use crate::progress::reporter::ResponseSpinner;
use basilisk_application::{ChatError, ChatSession};
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::io;
use std::path::PathBuf;
use tracing::debug;

/// Interactive chat REPL
pub struct ChatRepl {
    session: ChatSession,
    show_progress: bool,
    history_path: Option<PathBuf>,
}

impl ChatRepl {
    pub fn new(session: ChatSession) -> Self {
        Self {
            session,
            show_progress: true,
            history_path: None,
        }
    }

    /// Set whether to show the waiting spinner
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Persist line-editor history to this file
    pub fn with_history_file(mut self, path: Option<PathBuf>) -> Self {
        self.history_path = path;
        self
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        if let Some(path) = &self.history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        println!("{}", ConsoleFormatter::welcome(self.session.settings()));

        // Text of a message rejected as too long, offered again for editing
        let mut carry_over: Option<String> = None;

        loop {
            let prompt = ConsoleFormatter::prompt(self.session.settings());
            let readline = match carry_over.take() {
                Some(text) => rl.readline_with_initial(&prompt, (text.as_str(), "")),
                None => rl.readline(&prompt),
            };

            match readline {
                Ok(line) => {
                    let line = line.trim();

                    if line.is_empty() {
                        continue;
                    }

                    if let Some(command) = ReplCommand::parse(line) {
                        if self.handle_command(command) {
                            break;
                        }
                        continue;
                    }

                    let _ = rl.add_history_entry(line);
                    carry_over = self.process_message(line).await;
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("{}", ConsoleFormatter::error(&format!("{err:?}")));
                    break;
                }
            }
        }

        self.session.close();

        if let Some(path) = &self.history_path {
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    /// Handle slash commands. Returns true if should exit.
    fn handle_command(&mut self, command: ReplCommand) -> bool {
        match command {
            ReplCommand::Quit => {
                println!("Bye!");
                return true;
            }
            ReplCommand::Help => println!("{}", ConsoleFormatter::help()),
            ReplCommand::Settings => println!(
                "{}",
                ConsoleFormatter::settings(
                    self.session.settings(),
                    self.session.commit_policy(),
                    self.session.composer().max_tokens(),
                )
            ),
            ReplCommand::Models => {
                println!("{}", ConsoleFormatter::models(&self.session.settings().version))
            }
            ReplCommand::History => {
                println!("{}", ConsoleFormatter::history(self.session.history()))
            }
            ReplCommand::System(None) => println!("\n{}\n", self.session.settings().system_prompt),
            ReplCommand::Model(name) => self.apply_setting("model", &name),
            ReplCommand::System(Some(text)) => self.apply_setting("system", &text),
            ReplCommand::Set { key, value } => self.apply_setting(&key, &value),
            ReplCommand::Usage(usage) => println!("Usage: {usage}"),
            ReplCommand::Unknown(line) => {
                println!("Unknown command: {line}");
                println!("Type /help for available commands");
            }
        }
        false
    }

    fn apply_setting(&mut self, key: &str, value: &str) {
        match self.session.settings_mut().set(key, value) {
            Ok(()) => {
                let settings = self.session.settings();
                let shown = match key {
                    "model" => settings.version.name().to_string(),
                    "system" => "updated".to_string(),
                    _ => value.to_string(),
                };
                println!("{}", ConsoleFormatter::info(&format!("{key}: {shown}")));
            }
            Err(e) => eprintln!("{}", ConsoleFormatter::error(&e.to_string())),
        }
    }

    /// Send one message and stream its answer. Returns the message text when
    /// it was rejected as too long, so it can be offered again.
    async fn process_message(&mut self, message: &str) -> Option<String> {
        println!();
        let spinner = ResponseSpinner::start("Thinking...", self.show_progress);

        match self.session.submit(message).await {
            Ok(submission) => {
                if submission.prompt.truncated() {
                    debug!(
                        "Older turns left out of the prompt ({} passes)",
                        submission.prompt.passes
                    );
                }
            }
            Err(ChatError::MessageTooLong(e)) => {
                drop(spinner);
                eprintln!("{}", ConsoleFormatter::error(&e.to_string()));
                return Some(e.rejected_message().to_string());
            }
            Err(e) => {
                drop(spinner);
                eprintln!("{}", ConsoleFormatter::error(&e.to_string()));
                println!();
                return None;
            }
        }

        let mut stdout = io::stdout();
        match stream_answer(&mut self.session, &mut stdout, spinner).await {
            Ok(AnswerOutcome::Completed) => {}
            Ok(AnswerOutcome::Failed(message)) => {
                eprintln!("{}", ConsoleFormatter::error(&message))
            }
            Ok(AnswerOutcome::Interrupted) => {
                println!("{}", ConsoleFormatter::info("Answer interrupted"))
            }
            Err(e) => eprintln!("{}", ConsoleFormatter::error(&e.to_string())),
        }
        println!();
        None
    }
}
