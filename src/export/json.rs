//! JSON export

use std::fs;
use std::path::Path;

use crate::error::ExportError;
use crate::rules::Finding;

/// Pretty-printed array of complete finding objects
pub fn render_json(findings: &[Finding]) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(findings)?)
}

pub fn write_json(path: &Path, findings: &[Finding]) -> Result<(), ExportError> {
    let content = render_json(findings)?;
    fs::write(path, content).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}
