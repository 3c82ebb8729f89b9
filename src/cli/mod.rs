//! # CLI Module
//!
//! Command-line interface for ccscan using `clap`.
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `scan` | Scan the input documents against one regime's rules |
//! | `history` | Query the audit log |
//! | `init` | Write a configuration file and the bundled rule sets |
//!
//! ## Global Options
//!
//! - `-v, --verbose` - Increase verbosity level (use multiple times: -v, -vv, -vvv)
//! - `-c, --config <FILE>` - Path to configuration file
//! - `-C, --directory <DIR>` - Working directory (defaults to current directory)
//!
//! ## Examples
//!
//! ```bash
//! # Scaffold .ccscan.toml and rules/
//! ccscan init
//!
//! # Scan data/docs against the GDPR rules, augmenting documents with no hits
//! ccscan scan --regime GDPR --ai
//!
//! # Last ten SOC2 events as JSON
//! ccscan history --regime SOC2 -n 10 --format json
//! ```

pub mod commands;
pub mod exit_codes;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::CcError;
use commands::{HistoryArgs, InitArgs, ScanArgs};

/// ccscan - Scan business documents for GDPR and SOC2 compliance signals
#[derive(Parser, Debug)]
#[command(name = "ccscan")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "FILE", env = "CCSCAN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Working directory (defaults to current directory)
    #[arg(short = 'C', long, global = true, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan input documents against a regime's rule set
    Scan(ScanArgs),

    /// Show findings recorded in the audit log
    History(HistoryArgs),

    /// Initialize a configuration file and the default rule sets
    Init(InitArgs),
}

/// Load the configuration named on the command line, or `.ccscan.toml`
/// when present, or the defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config, CcError> {
    match path {
        Some(path) => Config::load_from_file(path),
        None => Config::load_or_default(),
    }
}
