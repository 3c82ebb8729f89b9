//! ccscan - compliance document scanner
//!
//! This is the main entry point for the CLI application.

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ccscan::cli::{self, exit_codes, Cli, Commands};
use ccscan::error::{CcError, ConfigError};

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // help and version are not errors
            let code = if e.use_stderr() {
                exit_codes::INVALID_ARGS
            } else {
                exit_codes::SUCCESS
            };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    setup_logging(cli.verbose);

    if let Some(dir) = &cli.directory {
        if let Err(e) = std::env::set_current_dir(dir) {
            eprintln!(
                "{} Cannot change directory to '{}': {}",
                "Error:".red().bold(),
                dir.display(),
                e
            );
            std::process::exit(exit_codes::INVALID_ARGS);
        }
    }

    load_dotenv();
    let result = run(cli).await;

    match result {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            std::process::exit(exit_code_for(&e));
        }
    }
}

async fn run(cli: Cli) -> Result<i32, CcError> {
    let verbose = cli.verbose > 0;
    match cli.command {
        Commands::Init(args) => cli::commands::init::execute(args).await,
        Commands::Scan(args) => {
            let config = cli::load_config(cli.config.as_deref())?;
            cli::commands::scan::execute(args, config, verbose).await
        }
        Commands::History(args) => {
            let config = cli::load_config(cli.config.as_deref())?;
            cli::commands::history::execute(args, config).await
        }
    }
}

fn exit_code_for(error: &CcError) -> i32 {
    match error {
        CcError::Persistence(_) => exit_codes::PERSISTENCE_FAILED,
        CcError::Config(ConfigError::AlreadyExists(_)) => exit_codes::INVALID_ARGS,
        _ => exit_codes::ERROR,
    }
}

/// Load a local `.env` for API keys. CI provides its own environment.
fn load_dotenv() {
    if std::env::var("GITHUB_ACTIONS").as_deref() == Ok("true") {
        return;
    }
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "Loaded environment file");
    }
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}
