//! CLI commands module

pub mod history;
pub mod init;
pub mod scan;

use clap::Args;

use crate::rules::Regime;

/// Arguments for the scan command
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Regulatory regime whose rule set is applied
    #[arg(short, long, value_enum, ignore_case = true)]
    pub regime: Regime,

    /// Augment documents with no rule hits (heuristics, or a model when configured)
    #[arg(long)]
    pub ai: bool,
}

/// Arguments for the history command
#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Only events of this regime
    #[arg(short, long, value_enum, ignore_case = true)]
    pub regime: Option<Regime>,

    /// Only events of this rule id
    #[arg(long, value_name = "RULE_ID")]
    pub rule: Option<String>,

    /// Only events of this document
    #[arg(long, value_name = "DOC")]
    pub doc: Option<String>,

    /// Only events of this run
    #[arg(long, value_name = "RUN_ID")]
    pub run: Option<String>,

    /// Only events at or after this timestamp (e.g. 2024-05-01)
    #[arg(long, value_name = "TIMESTAMP")]
    pub since: Option<String>,

    /// Maximum number of events listed
    #[arg(short = 'n', long, default_value_t = 20)]
    pub limit: usize,

    /// Output format
    #[arg(short, long, value_enum, default_value = "terminal")]
    pub format: HistoryFormat,
}

/// Output format for the history command
#[derive(Debug, Clone, PartialEq, Eq, clap::ValueEnum)]
pub enum HistoryFormat {
    Terminal,
    Json,
}

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite existing configuration and rule files
    #[arg(short, long)]
    pub force: bool,
}
