use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Target display geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameConfig {
    frame_width: u32,
    frame_height: u32,
    middle_bar_width: u32,
}

impl FrameConfig {
    pub fn new(frame_width: u32, frame_height: u32, middle_bar_width: u32) -> Result<Self, ConfigError> {
        if frame_width == 0 || frame_height == 0 {
            return Err(ConfigError::ZeroDimension {
                width: frame_width,
                height: frame_height,
            });
        }
        if frame_width <= frame_height {
            return Err(ConfigError::NotLandscape {
                width: frame_width,
                height: frame_height,
            });
        }
        if middle_bar_width > frame_width {
            return Err(ConfigError::BarTooWide {
                bar: middle_bar_width,
                width: frame_width,
            });
        }
        Ok(Self {
            frame_width,
            frame_height,
            middle_bar_width,
        })
    }

    pub fn width(&self) -> u32 {
        self.frame_width
    }

    pub fn height(&self) -> u32 {
        self.frame_height
    }

    pub fn middle_bar_width(&self) -> u32 {
        self.middle_bar_width
    }

    /// Width of each padded half. When the frame width is odd the last column belongs to neither half.
    pub fn half_width(&self) -> u32 {
        self.frame_width / 2
    }
}

fn default_frame_width() -> u32 {
    1920
}

fn default_frame_height() -> u32 {
    1080
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessOptions {
    /// Directories to search for JPEG images
    #[serde(default)]
    pub inputs: Vec<PathBuf>,
    /// Text file with one image path per line
    #[serde(default)]
    pub file_list: Option<PathBuf>,
    pub output: PathBuf,
    #[serde(default = "default_frame_width")]
    pub frame_width: u32,
    #[serde(default = "default_frame_height")]
    pub frame_height: u32,
    #[serde(default)]
    pub middle_bar_width: u32,
    #[serde(default)]
    pub overwrite_existing: bool,
    #[serde(default)]
    pub delete_existing: bool,
    #[serde(default)]
    pub randomise_sorting: bool,
    #[serde(default)]
    pub recursive: bool,
    #[serde(default)]
    pub mirror_mode: bool,
}

impl ProcessOptions {
    pub fn new(output: PathBuf) -> Self {
        Self {
            inputs: Vec::new(),
            file_list: None,
            output,
            frame_width: default_frame_width(),
            frame_height: default_frame_height(),
            middle_bar_width: 0,
            overwrite_existing: false,
            delete_existing: false,
            randomise_sorting: false,
            recursive: false,
            mirror_mode: false,
        }
    }

    pub fn frame(&self) -> Result<FrameConfig, ConfigError> {
        FrameConfig::new(self.frame_width, self.frame_height, self.middle_bar_width)
    }
}
