pub mod date;

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::imaging::Imaging;
use crate::media::ImageRecord;
use crate::ThrottledProgress;

/// Why a candidate file did not become an [`ImageRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    Unreadable(String),
    ZeroDimension,
    NotPortrait { width: u32, height: u32 },
    NoDate,
}

/// Reads dimensions, orientation and capture date for candidate files.
pub struct MetadataCollector<'a, B: Imaging> {
    backend: &'a B,
}

impl<'a, B: Imaging> MetadataCollector<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// Inspect a single file; only upright-portrait images are accepted.
    pub fn inspect(&self, path: &Path) -> Result<ImageRecord, Rejection> {
        let (stored_w, stored_h) = self
            .backend
            .probe(path)
            .map_err(|e| Rejection::Unreadable(e.to_string()))?;
        if stored_w == 0 || stored_h == 0 {
            return Err(Rejection::ZeroDimension);
        }

        let orientation = self.backend.orientation(path);
        let (width, height) = orientation.corrected(stored_w, stored_h);
        if width >= height {
            return Err(Rejection::NotPortrait { width, height });
        }

        let (creation_date, _) = date::resolve_creation_date(path).ok_or(Rejection::NoDate)?;
        Ok(ImageRecord::new(path.to_path_buf(), width, height, creation_date))
    }

    /// Inspect every candidate, logging each rejection. Returns accepted records
    /// and the number rejected.
    pub fn collect(&self, candidates: &[PathBuf], progress: &ThrottledProgress) -> (Vec<ImageRecord>, u64) {
        let total = candidates.len() as u64;
        let mut records = Vec::with_capacity(candidates.len());
        let mut rejected = 0u64;

        for (i, path) in candidates.iter().enumerate() {
            match self.inspect(path) {
                Ok(record) => {
                    debug!(
                        "Accepted {} ({}x{}, {})",
                        path.display(),
                        record.width,
                        record.height,
                        record.creation_date
                    );
                    records.push(record);
                }
                Err(reason) => {
                    rejected += 1;
                    match reason {
                        Rejection::Unreadable(e) => debug!("Skipping {}: {}", path.display(), e),
                        Rejection::ZeroDimension => {
                            debug!("Skipping {}: image reports zero size", path.display())
                        }
                        Rejection::NotPortrait { width, height } => debug!(
                            "Skipping {}: not portrait ({}x{})",
                            path.display(),
                            width,
                            height
                        ),
                        Rejection::NoDate => {
                            debug!("Skipping {}: no capture date available", path.display())
                        }
                    }
                }
            }
            progress.report("scan", i as u64, total, "Reading image metadata");
        }

        info!("{} images found", records.len());
        (records, rejected)
    }
}
