//! outresolve - Bazel artifact resolver
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use outresolve::cli::{Cli, Commands, LogFormat};
use outresolve::config::ConfigManager;
use outresolve::error::ResolveResult;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> ResolveResult<()> {
    let cli = Cli::parse();

    // Canonicalization needs no configuration
    if let Commands::Canonicalize(args) = cli.command {
        init_logging(cli.verbose, cli.log_format.unwrap_or(LogFormat::Text));
        return outresolve::cli::commands::canonicalize(args).await;
    }

    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let config = config_manager.load().await?;

    let log_format = cli
        .log_format
        .unwrap_or_else(|| LogFormat::from_config(&config.general.log_format));
    init_logging(cli.verbose, log_format);
    debug!("Using config {}", config_manager.path().display());

    match cli.command {
        Commands::Canonicalize(_) => unreachable!("Canonicalize handled above"),
        Commands::Resolve(args) => outresolve::cli::commands::resolve(args, &config).await,
        Commands::ResolveOne(args) => outresolve::cli::commands::resolve_one(args, &config).await,
        Commands::Config(args) => {
            outresolve::cli::commands::config(args, &config, &config_manager).await
        }
    }
}

/// Initialize logging: 0 = warn, 1 = info, 2+ = debug. Logs go to stderr so
/// stdout stays machine readable.
fn init_logging(verbose: u8, format: LogFormat) {
    let filter = match verbose {
        0 => EnvFilter::new("outresolve=warn"),
        1 => EnvFilter::new("outresolve=info"),
        _ => EnvFilter::new("outresolve=debug"),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    match format {
        LogFormat::Text => builder.without_time().init(),
        LogFormat::Json => builder.json().init(),
    }
}
