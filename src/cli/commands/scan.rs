//! Scan command - run one regime over the input documents
//!
//! Prints the results summary, appends findings to the audit log and writes
//! the CSV/JSON exports. A failed audit append does not stop the exports;
//! it only changes the exit code.

use colored::Colorize;
use tracing::{error, info};

use super::ScanArgs;
use crate::audit::{AuditStore, Run};
use crate::augment::build_augmenter;
use crate::cli::exit_codes;
use crate::cli::output::TerminalOutput;
use crate::config::Config;
use crate::error::CcError;
use crate::export::write_exports;
use crate::pipeline::Pipeline;
use crate::utils::{RunTiming, Timer};

/// Execute the scan command
///
/// # Returns
///
/// `SUCCESS` whether or not anything was found, `PERSISTENCE_FAILED` when
/// the audit log could not be written.
///
/// # Errors
///
/// Rule-set, configuration and export failures.
pub async fn execute(args: ScanArgs, config: Config, verbose: bool) -> Result<i32, CcError> {
    let output = TerminalOutput::new();
    let mut timing = RunTiming::new();
    let run = Run::new(args.regime, env!("CARGO_PKG_VERSION"));
    info!(run_id = %run.run_id, regime = %run.regime, "Run started");

    let mut pipeline = Pipeline::new(config.clone());
    if args.ai {
        pipeline.set_augmenter(build_augmenter(&config.augment)?);
    }

    let timer = Timer::start();
    let report = pipeline.run(args.regime).await?;
    timing.record("scan", &timer);

    println!("{}", output.render_scan(&report));

    let findings = report.findings();
    if findings.is_empty() {
        println!("{}", output.render_artifacts(None, &run.run_id.to_string(), None));
        return Ok(exit_codes::SUCCESS);
    }

    let timer = Timer::start();
    let receipt = match AuditStore::open(&config.paths.audit_db)
        .and_then(|mut store| store.append_run(&run, findings))
    {
        Ok(receipt) => Some(receipt),
        Err(e) => {
            error!(error = %e, "Audit log write failed");
            eprintln!("{} {}", "Error:".red().bold(), e);
            None
        }
    };
    timing.record("audit", &timer);

    let timer = Timer::start();
    let exports = write_exports(findings, args.regime, &config.paths.outputs, run.started_at)?;
    timing.record("export", &timer);

    println!(
        "{}",
        output.render_artifacts(receipt.as_ref(), &run.run_id.to_string(), Some(&exports))
    );
    if verbose {
        println!("{}", output.render_timing(&timing));
    }

    if receipt.is_none() {
        return Ok(exit_codes::PERSISTENCE_FAILED);
    }
    Ok(exit_codes::SUCCESS)
}
