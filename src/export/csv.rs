//! CSV export

use std::path::Path;

use crate::error::ExportError;
use crate::rules::Finding;

/// Column order of the CSV export
pub const CSV_HEADER: [&str; 7] = ["doc", "rule_id", "label", "severity", "start", "end", "snippet"];

/// Write findings as CSV with one header row.
///
/// Absent offsets (augmented findings) become empty cells.
pub fn write_csv(path: &Path, findings: &[Finding]) -> Result<(), ExportError> {
    let csv_err = |source| ExportError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
    writer.write_record(CSV_HEADER).map_err(csv_err)?;

    for f in findings {
        let start = f.start.map(|v| v.to_string()).unwrap_or_default();
        let end = f.end.map(|v| v.to_string()).unwrap_or_default();
        writer
            .write_record([
                f.doc.as_str(),
                f.rule_id.as_str(),
                f.label.as_str(),
                f.severity.as_str(),
                start.as_str(),
                end.as_str(),
                f.snippet.as_str(),
            ])
            .map_err(csv_err)?;
    }

    writer.flush().map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}
