//! CLI entrypoint for llm-switchboard
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Result, anyhow, bail};
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use switchboard_application::{
    AggregateStrategy, ChatSession, ConversationLogger, DispatchError, DispatchService,
    NoConversationLogger,
};
use switchboard_domain::{DisplayMessage, OutputFormat, Query, TargetMode};
use switchboard_infrastructure::{
    ConfigLoader, FileConfig, HttpChatGateway, JsonlConversationLogger,
};
use switchboard_presentation::{ChatRepl, Cli, ConsoleFormatter, ConsoleProgress, ReplConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Fold command line overrides into the loaded configuration
fn apply_cli_overrides(config: &mut FileConfig, cli: &Cli) {
    if let Some(url) = &cli.api_url {
        config.backend.base_url = url.clone();
    }
    if cli.fan_out {
        config.dispatch.aggregate = AggregateStrategy::FanOut;
    }
    if let Some(path) = &cli.log_file {
        config.logging.conversation_log = Some(path.to_string_lossy().into_owned());
    }
    if let Some(format) = cli.output {
        config.output.format = Some(format.into());
    }
}

fn resolve_target(cli: &Cli, config: &FileConfig) -> TargetMode {
    cli.model.unwrap_or_else(|| {
        config.dispatch.parse_target().unwrap_or_else(|e| {
            warn!("{}; asking all models", e);
            TargetMode::All
        })
    })
}

fn conversation_logger(config: &FileConfig) -> Arc<dyn ConversationLogger> {
    match config
        .logging
        .conversation_log_path()
        .and_then(JsonlConversationLogger::new)
    {
        Some(logger) => {
            info!("Writing conversation log to {}", logger.path().display());
            Arc::new(logger)
        }
        None => Arc::new(NoConversationLogger),
    }
}

/// A one-shot question fails only when no reply succeeded
fn all_failed(messages: &[DisplayMessage]) -> bool {
    !messages.is_empty() && messages.iter().all(|m| m.is_error)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(ExitCode::SUCCESS);
    }

    info!("Starting llm-switchboard");

    // === Configuration ===
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };
    apply_cli_overrides(&mut config, &cli);

    for issue in config.validate() {
        warn!("Config: {}", issue);
    }

    let target = resolve_target(&cli, &config);
    let format = config.output.resolved_format();
    ConsoleFormatter::set_color(config.output.color);

    // === Dependency Injection ===
    let gateway = Arc::new(HttpChatGateway::from_config(config.transport_config())?);
    info!("Backend: {}", gateway.transport().base_url());

    let dispatch = DispatchService::new(gateway)
        .with_params(config.dispatch.to_params())
        .with_logger(conversation_logger(&config));
    let session = Arc::new(ChatSession::new(dispatch));

    // Chat mode
    if cli.chat {
        let repl_config = ReplConfig {
            show_progress: config.repl.progress_enabled(cli.quiet),
            history_file: config.repl.history_file_path(),
        };
        let mut repl = ChatRepl::new(session, target).with_config(&repl_config);

        repl.run().await?;
        return Ok(ExitCode::SUCCESS);
    }

    // Single question mode - question is required
    let question = match cli.question {
        Some(q) => q,
        None => bail!("Question is required. Use --chat for interactive mode."),
    };
    let query = Query::try_new(&question, target)?;

    let show_progress = !cli.quiet && config.output.allows_progress();
    if show_progress {
        println!();
        println!("Question: {}", query.text());
        println!("Target: {}", target);
        println!();
    }

    let progress = ConsoleProgress::new(show_progress);

    let submit = session.submit(query, &progress);
    tokio::pin!(submit);
    let outcome = tokio::select! {
        outcome = &mut submit => outcome,
        _ = tokio::signal::ctrl_c() => {
            session.cancel();
            submit.await
        }
    };

    let replies = match outcome {
        Ok(replies) => replies,
        Err(DispatchError::Cancelled) => bail!("Cancelled"),
    };

    // Output results: the JSON form carries the whole turn, user message included
    let output = match format {
        OutputFormat::Text => ConsoleFormatter::render(&replies, format),
        OutputFormat::Json => ConsoleFormatter::render(&session.messages(), format),
    };
    println!("{}", output);

    if all_failed(&replies) {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
