use std::path::Path;

use chrono::{Local, NaiveDateTime};
use filetime::FileTime;
use tracing::warn;

use crate::config::FrameConfig;
use crate::error::ImagingError;
use crate::imaging::Imaging;
use crate::media::ImageRecord;

pub const JPEG_QUALITY: u8 = 80;

/// Builds the side-by-side landscape canvas for one pair.
pub struct Compositor<'a, B: Imaging> {
    backend: &'a B,
    frame: FrameConfig,
    stamp_times: bool,
}

impl<'a, B: Imaging> Compositor<'a, B> {
    /// `stamp_times` is off in shuffle mode, where "earlier" has no meaning for a pair.
    pub fn new(backend: &'a B, frame: FrameConfig, stamp_times: bool) -> Self {
        Self {
            backend,
            frame,
            stamp_times,
        }
    }

    /// Write the composite of `left` and `right` to `output`.
    pub fn composite(&self, left: &ImageRecord, right: &ImageRecord, output: &Path) -> Result<(), ImagingError> {
        let canvas = self.render(&left.full_path, &right.full_path)?;
        self.backend.encode_jpeg(&canvas, output, JPEG_QUALITY)?;

        if self.stamp_times {
            let date = left.creation_date.min(right.creation_date);
            if let Err(e) = set_file_times(output, date) {
                warn!("Cannot set timestamps on {}: {}", output.display(), e);
            }
        }
        Ok(())
    }

    /// Assemble the frame-sized canvas without writing it.
    pub fn render(&self, left: &Path, right: &Path) -> Result<B::Bitmap, ImagingError> {
        let half_left = self.padded_half(left)?;
        let half_right = self.padded_half(right)?;

        let mut canvas = self.backend.blank(self.frame.width(), self.frame.height());
        self.backend.draw(&mut canvas, &half_left, 0, 0);
        self.backend
            .draw(&mut canvas, &half_right, self.frame.half_width() as i64, 0);

        let bar = self.frame.middle_bar_width();
        if bar > 0 {
            let x = (self.frame.width() - bar) / 2;
            self.backend
                .fill_black(&mut canvas, x, 0, bar, self.frame.height());
        }
        Ok(canvas)
    }

    /// Decode, orient, scale to frame height, and centre on a black half-width canvas.
    fn padded_half(&self, path: &Path) -> Result<B::Bitmap, ImagingError> {
        let orientation = self.backend.orientation(path);
        let bitmap = self.backend.decode(path)?;
        let upright = self.backend.orient(bitmap, orientation);

        let (w, h) = self.backend.dimensions(&upright);
        let height = self.frame.height();
        let width = scaled_width(w, h, height);
        let resized = self.backend.resize(&upright, width, height);
        drop(upright);

        let half = self.frame.half_width();
        let mut padded = self.backend.blank(half, height);
        let x = (half as i64 - width as i64) / 2;
        self.backend.draw(&mut padded, &resized, x, 0);
        Ok(padded)
    }
}

/// `round(width * target_height / height)`, at least one pixel.
pub fn scaled_width(width: u32, height: u32, target_height: u32) -> u32 {
    let scaled = (width as f64 * target_height as f64 / height as f64).round() as u32;
    scaled.max(1)
}

/// Set modification time (and creation time where the platform allows) to `date`, read as local time.
fn set_file_times(path: &Path, date: NaiveDateTime) -> std::io::Result<()> {
    let Some(local) = date.and_local_timezone(Local).earliest() else {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("{} does not exist in the local time zone", date),
        ));
    };
    let ft = FileTime::from_unix_time(local.timestamp(), local.timestamp_subsec_nanos());
    filetime::set_file_times(path, ft, ft)?;
    set_created(path, local.into())
}

#[cfg(windows)]
fn set_created(path: &Path, time: std::time::SystemTime) -> std::io::Result<()> {
    use std::fs::{FileTimes, OpenOptions};
    use std::os::windows::fs::FileTimesExt;

    let file = OpenOptions::new().write(true).open(path)?;
    file.set_times(FileTimes::new().set_created(time).set_modified(time))
}

#[cfg(not(windows))]
fn set_created(path: &Path, _time: std::time::SystemTime) -> std::io::Result<()> {
    tracing::debug!("{}: creation time is not settable on this platform", path.display());
    Ok(())
}
