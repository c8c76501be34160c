//! Promptcast - command-line client for a local AI assistant server
//!
//! Main entry point for the `promptcast` binary.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use colored::Colorize;
use promptcast::cli::{Cli, Commands};
use promptcast::commands;
use promptcast::commands::send::SendArgs;
use promptcast::config::Config;
use promptcast::error::{is_connection_refused, Result};

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        report_error(&err);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Load configuration
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| Config::default_path().to_string_lossy().to_string());
    let config = Config::load(&config_path, &cli)?;

    config.validate()?;
    tracing::debug!(endpoint = %config.endpoint(), "Configuration loaded");

    match cli.command {
        Commands::Send {
            message,
            new,
            session,
            latest,
            provider,
            model,
        } => {
            tracing::info!("Sending prompt");
            let args = SendArgs {
                message,
                new,
                session,
                latest,
                provider,
                model,
            };
            commands::send::run_send(&config, args).await
        }
        Commands::Session { command } => {
            tracing::info!("Starting session management command");
            commands::sessions::handle_session(&config, command).await
        }
        Commands::Cache { command } => {
            tracing::info!("Starting cache management command");
            commands::cache::handle_cache(&config, command)
        }
    }
}

/// Logs go to stderr so replies on stdout stay pipeable
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "promptcast=debug"
    } else {
        "promptcast=warn"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn report_error(err: &anyhow::Error) {
    let label = if is_connection_refused(err) {
        "Server unreachable:"
    } else {
        "Error:"
    };
    eprintln!("{} {:#}", label.red().bold(), err);
}
