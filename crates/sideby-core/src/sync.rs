use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::naming::is_output_name;

/// Output paths written, or kept as already present, during this run.
#[derive(Debug, Default, Clone)]
pub struct ProcessedFileSet {
    paths: HashSet<PathBuf>,
}

impl ProcessedFileSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: PathBuf) {
        self.paths.insert(path);
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.paths.contains(path)
    }
}

/// Outcome of a clean or mirror pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub deleted: u64,
    pub failed: u64,
}

/// Composites (`sideby-*.jpg`) directly inside `dir`. Other files are never listed.
pub fn existing_outputs(dir: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Cannot list {}: {}", dir.display(), e);
            return Vec::new();
        }
    };
    let mut found: Vec<PathBuf> = entries
        .flatten()
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter(|entry| is_output_name(&entry.file_name().to_string_lossy()))
        .map(|entry| entry.path())
        .collect();
    found.sort();
    found
}

/// Delete every existing composite before pairing starts.
pub fn clean(dir: &Path) -> SyncReport {
    let report = delete_all(existing_outputs(dir));
    info!("Deleted {} existing composite(s) from {}", report.deleted, dir.display());
    report
}

/// Delete composites that this run neither wrote nor kept.
pub fn mirror(dir: &Path, processed: &ProcessedFileSet) -> SyncReport {
    let stale: Vec<PathBuf> = existing_outputs(dir)
        .into_iter()
        .filter(|p| !processed.contains(p))
        .collect();
    let report = delete_all(stale);
    info!("Mirror: removed {} stale composite(s)", report.deleted);
    report
}

fn delete_all(paths: Vec<PathBuf>) -> SyncReport {
    let mut report = SyncReport::default();
    for path in paths {
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!("Deleted {}", path.display());
                report.deleted += 1;
            }
            Err(e) => {
                warn!("Cannot delete {}: {}", path.display(), e);
                report.failed += 1;
            }
        }
    }
    report
}
