use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Rejected frame geometry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("frame width and height must be positive (got {width}x{height})")]
    ZeroDimension { width: u32, height: u32 },

    #[error("frame must be landscape: width {width} is not greater than height {height}")]
    NotLandscape { width: u32, height: u32 },

    #[error("middle bar width {bar} exceeds frame width {width}")]
    BarTooWide { bar: u32, width: u32 },
}

/// Invalid input to output filename generation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NamingError {
    #[error("source filename must not be empty")]
    EmptyName,

    #[error("cannot pair {0} with itself")]
    SameName(String),
}

/// Failures from the bitmap backend.
#[derive(Error, Debug)]
pub enum ImagingError {
    #[error("cannot open {path}: {source}")]
    Open { path: PathBuf, source: io::Error },

    #[error("cannot decode {path}: {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("cannot encode {path}: {source}")]
    Encode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("I/O error on {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
}

/// Failures while gathering candidate images.
#[derive(Error, Debug)]
pub enum CollectError {
    #[error("cannot read directory {path}: {source}")]
    ReadDir { path: PathBuf, source: io::Error },

    #[error("cannot read file list {path}: {source}")]
    FileList { path: PathBuf, source: io::Error },

    #[error("no candidate JPEG images found")]
    NoCandidates,
}
