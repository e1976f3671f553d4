//! CLI entrypoint for basilisk-chat
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result};
use basilisk_application::ChatSession;
use basilisk_domain::ConfigIssue;
use basilisk_infrastructure::{
    ConfigLoader, FileConfig, HttpPredictionGateway, JsonlConversationLogger,
};
use basilisk_presentation::{ChatRepl, Cli, ConsoleFormatter, ask_once};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.log_dir.as_deref());

    info!("Starting basilisk-chat {}", env!("CARGO_PKG_VERSION"));

    if cli.show_config {
        for line in ConfigLoader::config_sources(cli.config.as_deref()) {
            println!("{line}");
        }
        return Ok(());
    }

    // === Configuration ===
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())?
    };
    report_issues(&config.validate());

    let (mut settings, _) = config.model.to_settings();
    cli.apply_overrides(&mut settings)
        .context("Invalid command-line setting")?;
    let (composer, _) = config.chat.to_composer();
    let (commit_policy, _) = config.chat.parse_commit_policy();

    // === Dependency Injection ===
    let mut api = config.api.clone();
    if let Some(url) = &cli.api_url {
        api.base_url = url.clone();
    }
    let gateway = HttpPredictionGateway::from_config(&api)?;
    info!("Prediction endpoint: {}", gateway.endpoint());

    let mut session = ChatSession::new(Arc::new(gateway), settings)
        .with_composer(composer)
        .with_commit_policy(commit_policy);

    let transcript = cli
        .conversation_log
        .clone()
        .or_else(|| config.logging.conversation_log_path());
    if let Some(path) = transcript
        && let Some(logger) = JsonlConversationLogger::open(&path)
    {
        info!("Conversation log: {}", logger.path().display());
        session = session.with_conversation_logger(Arc::new(logger));
    }

    let show_progress = !cli.quiet && config.repl.show_progress;

    // Single question mode
    if let Some(prompt) = &cli.prompt {
        let mut stdout = std::io::stdout();
        ask_once(&mut session, prompt, &mut stdout, show_progress).await?;
        return Ok(());
    }

    // Chat mode
    let mut repl = ChatRepl::new(session)
        .with_progress(show_progress)
        .with_history_file(history_path(&config));
    repl.run().await?;

    Ok(())
}

/// Console diagnostics go to stderr so streamed answers on stdout stay clean.
/// With `--log-dir`, the same events are also written as JSON to a
/// daily-rotated file.
fn init_logging(verbose: u8, log_dir: Option<&Path>) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let file_layer = log_dir.and_then(|dir| {
        let appender = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix("basilisk-chat")
            .filename_suffix("log")
            .build(dir);
        match appender {
            Ok(appender) => Some(fmt::layer().json().with_writer(appender).with_ansi(false)),
            Err(e) => {
                eprintln!(
                    "{}",
                    ConsoleFormatter::warning(&format!(
                        "cannot write logs to {}: {e}",
                        dir.display()
                    ))
                );
                None
            }
        }
    });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();
}

fn report_issues(issues: &[ConfigIssue]) {
    for issue in issues {
        debug!("Config issue: {:?}", issue.code);
        eprintln!("{}", ConsoleFormatter::warning(&issue.message));
    }
}

fn history_path(config: &FileConfig) -> Option<PathBuf> {
    config
        .repl
        .history_path()
        .or_else(ConfigLoader::default_history_path)
}
