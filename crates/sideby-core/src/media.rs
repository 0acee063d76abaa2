use std::path::PathBuf;

use chrono::NaiveDateTime;

/// A portrait source photo accepted for pairing.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRecord {
    /// Absolute or caller-supplied path to the file
    pub full_path: PathBuf,
    /// Just the filename
    pub file_name: String,
    /// Orientation-corrected width
    pub width: u32,
    /// Orientation-corrected height
    pub height: u32,
    /// Capture date (local time, EXIF or filesystem fallback)
    pub creation_date: NaiveDateTime,
}

impl ImageRecord {
    pub fn new(full_path: PathBuf, width: u32, height: u32, creation_date: NaiveDateTime) -> Self {
        let file_name = full_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            full_path,
            file_name,
            width,
            height,
            creation_date,
        }
    }
}
