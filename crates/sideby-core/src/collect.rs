use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::CollectError;

/// `.jpg` / `.jpeg`, any case.
pub fn is_jpeg(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("jpg") || e.eq_ignore_ascii_case("jpeg"))
        .unwrap_or(false)
}

/// Gather candidate JPEG paths from directories and an optional file list.
/// Fails only when a source cannot be read or nothing was found.
pub fn collect_candidates(
    directories: &[PathBuf],
    file_list: Option<&Path>,
    recursive: bool,
) -> Result<Vec<PathBuf>, CollectError> {
    let mut seen: HashSet<PathBuf> = HashSet::new();
    let mut candidates = Vec::new();
    let mut push = |path: PathBuf| {
        if seen.insert(path.clone()) {
            candidates.push(path);
        }
    };

    for dir in directories {
        for path in scan_directory(dir, recursive)? {
            push(path);
        }
    }

    if let Some(list) = file_list {
        for path in read_file_list(list)? {
            push(path);
        }
    }

    if candidates.is_empty() {
        return Err(CollectError::NoCandidates);
    }
    info!("{} candidate file(s) to inspect", candidates.len());
    Ok(candidates)
}

fn scan_directory(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>, CollectError> {
    let read_err = |source: std::io::Error| CollectError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };
    let mut found = Vec::new();

    if recursive {
        for entry in WalkDir::new(dir).follow_links(true) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(read_err(e.into_io_error().unwrap_or_else(|| {
                        std::io::Error::other("filesystem loop")
                    })))
                }
                Err(e) => {
                    warn!("Skipping unreadable entry under {}: {}", dir.display(), e);
                    continue;
                }
            };
            if entry.file_type().is_file() && is_jpeg(entry.path()) {
                found.push(entry.into_path());
            }
        }
    } else {
        for entry in fs::read_dir(dir).map_err(read_err)?.flatten() {
            let path = entry.path();
            if path.is_file() && is_jpeg(&path) {
                found.push(path);
            }
        }
    }

    found.sort();
    debug!("{}: {} JPEG file(s)", dir.display(), found.len());
    Ok(found)
}

/// One path per line; blank lines ignored, missing files logged and skipped.
fn read_file_list(list: &Path) -> Result<Vec<PathBuf>, CollectError> {
    let text = fs::read_to_string(list).map_err(|source| CollectError::FileList {
        path: list.to_path_buf(),
        source,
    })?;

    let mut found = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let path = PathBuf::from(line);
        if !path.is_file() {
            warn!("Listed file not found: {}", path.display());
            continue;
        }
        if !is_jpeg(&path) {
            debug!("Listed file is not a JPEG: {}", path.display());
            continue;
        }
        found.push(path);
    }
    Ok(found)
}
