//! CLI entrypoint for streamchat
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use streamchat_application::{
    ChatSession, ChatTransport, ConversationLogger, NoConversationLogger, TurnOutcome,
};
use streamchat_infrastructure::{ConfigLoader, FileConfig, HttpChatTransport, JsonlConversationLogger};
use streamchat_presentation::{ChatRepl, Cli, ConsoleFormatter, TerminalView};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let _log_guard = init_tracing(cli.verbose, cli.log_file.as_deref())?;

    info!("Starting streamchat");

    // === Configuration ===
    let config_path = cli.config.as_deref();
    if cli.show_config {
        ConfigLoader::print_config_sources(config_path);
    }

    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(config_path)
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?
    };
    apply_cli_overrides(&mut config, &cli);

    if cli.show_config {
        println!();
        println!("{}", config.to_toml_string()?);
        return Ok(ExitCode::SUCCESS);
    }

    config.validate().context("Invalid configuration")?;
    if !config.output.color {
        colored::control::set_override(false);
    }

    // === Dependency Injection ===
    let transport = Arc::new(HttpChatTransport::new(config.server.base_url.clone())?);

    if cli.health {
        let health = transport
            .health()
            .await
            .with_context(|| format!("Health check against {} failed", transport.base_url()))?;
        println!("{}", ConsoleFormatter::format_health(transport.base_url(), &health));
        return Ok(if health.is_healthy() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    let params = config.generation.to_params();
    let logger = conversation_logger(&config);

    // Chat mode
    if cli.chat {
        let view = TerminalView::stdout().with_echo_user(false);
        let session = ChatSession::new(transport, view, params).with_conversation_logger(logger);
        let history_file = config
            .repl
            .history_file
            .as_deref()
            .map(expand_home)
            .or_else(ConfigLoader::default_history_path);

        ChatRepl::new(session)
            .with_history_file(history_file)
            .with_streaming(!cli.no_stream)
            .run()
            .await?;
        return Ok(ExitCode::SUCCESS);
    }

    // Single message mode - message is required
    let Some(question) = cli.question else {
        bail!("A message is required. Use --chat for interactive mode.");
    };

    let view = TerminalView::stdout()
        .with_echo_user(false)
        .with_labels(false);
    let mut session = ChatSession::new(transport, view, params).with_conversation_logger(logger);

    let outcome = if cli.no_stream {
        session.send_message_unary(&question).await
    } else {
        session.submit(&question).await
    };

    match outcome {
        TurnOutcome::Completed { .. } => Ok(ExitCode::SUCCESS),
        TurnOutcome::Ignored => bail!("Message is empty"),
        // Already rendered in place of the reply
        TurnOutcome::TransportFailed(_) => Ok(ExitCode::FAILURE),
        TurnOutcome::ReadFailed(e) => {
            eprintln!("{}", ConsoleFormatter::format_error(&e.to_string()));
            Ok(ExitCode::FAILURE)
        }
        TurnOutcome::Cancelled => Ok(ExitCode::FAILURE),
    }
}

/// Initialize logging based on verbosity level.
///
/// `RUST_LOG` wins over `-v` when set. Logs go to stderr and, with
/// `--log-file`, to that file as well.
fn init_tracing(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let default_filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let directory = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let file_name = path
                .file_name()
                .with_context(|| format!("Log file path has no file name: {}", path.display()))?;
            std::fs::create_dir_all(directory)
                .with_context(|| format!("Could not create {}", directory.display()))?;

            let appender = tracing_appender::rolling::never(directory, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    Ok(guard)
}

/// Command-line flags take precedence over every config source.
fn apply_cli_overrides(config: &mut FileConfig, cli: &Cli) {
    if let Some(endpoint) = &cli.endpoint {
        config.server.base_url = endpoint.clone();
    }
    if let Some(model) = &cli.model {
        config.generation.model = model.clone();
    }
    if let Some(max_tokens) = cli.max_tokens {
        config.generation.max_tokens = max_tokens;
    }
    if let Some(temperature) = cli.temperature {
        config.generation.temperature = temperature;
    }
    if cli.no_color {
        config.output.color = false;
    }
    if let Some(path) = &cli.conversation_log {
        config.logging.conversation_log = Some(path.to_string_lossy().into_owned());
    }
}

fn conversation_logger(config: &FileConfig) -> Arc<dyn ConversationLogger> {
    let Some(path) = config.logging.conversation_log.as_deref() else {
        return Arc::new(NoConversationLogger);
    };
    match JsonlConversationLogger::open(expand_home(path)) {
        Some(logger) => {
            info!("Conversation log: {}", logger.path().display());
            Arc::new(logger)
        }
        None => {
            warn!("Conversation logging disabled");
            Arc::new(NoConversationLogger)
        }
    }
}

/// Expand a leading `~/` to the home directory.
fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
