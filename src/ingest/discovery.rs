//! Input document discovery

use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Extensions accepted as input documents
pub const ACCEPTED_EXTENSIONS: &[&str] = &["txt", "pdf", "docx"];

/// A discovered input document
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct InputDocument {
    /// Absolute (canonical) path on disk
    pub path: PathBuf,
    /// Path relative to the input root, `/`-separated
    pub name: String,
}

/// Check if a path has an accepted extension (case-insensitive)
pub fn is_accepted(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| ACCEPTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Recursively enumerate accepted files under `root`, sorted by path.
///
/// A missing root yields no documents. Directories are never returned and
/// unreadable entries are skipped with a warning.
pub fn discover(root: &Path) -> Vec<InputDocument> {
    if !root.is_dir() {
        debug!(root = %root.display(), "Input root does not exist");
        return Vec::new();
    }

    let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
    let mut documents = Vec::new();

    for entry in WalkDir::new(&root).follow_links(true) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!(error = %e, "Skipping unreadable entry during discovery");
                continue;
            }
        };

        if !entry.file_type().is_file() || !is_accepted(entry.path()) {
            continue;
        }

        let name = relative_name(&root, entry.path());
        documents.push(InputDocument {
            path: entry.into_path(),
            name,
        });
    }

    documents.sort();
    documents
}

fn relative_name(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
