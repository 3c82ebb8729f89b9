//! Export module - per-run CSV and JSON artifacts
//!
//! Both files share a stem built from the regime and the capture time:
//! `findings_<regime>_<YYYYMMDD-HHMMSS>.{csv,json}`.

pub mod csv;
pub mod json;

use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::ExportError;
use crate::rules::{Finding, Regime};

/// Locations of the files written for one run
#[derive(Debug, Clone, PartialEq)]
pub struct ExportPaths {
    pub csv: PathBuf,
    pub json: PathBuf,
}

/// File stem for a run's exports
pub fn export_stem(regime: Regime, captured_at: DateTime<Utc>) -> String {
    format!(
        "findings_{}_{}",
        regime.slug(),
        captured_at.format("%Y%m%d-%H%M%S")
    )
}

/// Write the CSV and JSON exports into `out_dir`, creating it if needed
pub fn write_exports(
    findings: &[Finding],
    regime: Regime,
    out_dir: &Path,
    captured_at: DateTime<Utc>,
) -> Result<ExportPaths, ExportError> {
    fs::create_dir_all(out_dir).map_err(|source| ExportError::CreateDir {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let stem = export_stem(regime, captured_at);
    let paths = ExportPaths {
        csv: out_dir.join(format!("{stem}.csv")),
        json: out_dir.join(format!("{stem}.json")),
    };

    self::csv::write_csv(&paths.csv, findings)?;
    self::json::write_json(&paths.json, findings)?;

    debug!(
        csv = %paths.csv.display(),
        json = %paths.json.display(),
        count = findings.len(),
        "Exports written"
    );
    Ok(paths)
}
