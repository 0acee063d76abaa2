use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{ImageReader, Rgb, RgbImage};

use crate::error::ImagingError;

const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

/// EXIF orientation (tag 0x0112), values 1..=8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Normal,
    FlipHorizontal,
    Rotate180,
    FlipVertical,
    Transpose,
    Rotate90,
    Transverse,
    Rotate270,
}

impl Orientation {
    /// Unknown values map to `Normal`.
    pub fn from_exif(value: u32) -> Self {
        match value {
            2 => Self::FlipHorizontal,
            3 => Self::Rotate180,
            4 => Self::FlipVertical,
            5 => Self::Transpose,
            6 => Self::Rotate90,
            7 => Self::Transverse,
            8 => Self::Rotate270,
            _ => Self::Normal,
        }
    }

    /// True when the stored pixel grid must be turned a quarter to display upright.
    pub fn swaps_dimensions(self) -> bool {
        matches!(
            self,
            Self::Transpose | Self::Rotate90 | Self::Transverse | Self::Rotate270
        )
    }

    /// Display dimensions for a stored `width` x `height`.
    pub fn corrected(self, width: u32, height: u32) -> (u32, u32) {
        if self.swaps_dimensions() {
            (height, width)
        } else {
            (width, height)
        }
    }
}

/// Read the orientation tag, `Normal` when absent or unreadable.
pub fn read_orientation(path: &Path) -> Orientation {
    let Ok(file) = File::open(path) else {
        return Orientation::Normal;
    };
    let mut reader = BufReader::new(file);
    let Ok(data) = exif::Reader::new().read_from_container(&mut reader) else {
        return Orientation::Normal;
    };
    data.get_field(exif::Tag::Orientation, exif::In::PRIMARY)
        .and_then(|field| field.value.get_uint(0))
        .map(Orientation::from_exif)
        .unwrap_or_default()
}

/// Bitmap operations the compositor needs, kept narrow so the backend can be swapped.
pub trait Imaging {
    type Bitmap;

    /// Stored pixel dimensions, read from the header without a full decode.
    fn probe(&self, path: &Path) -> Result<(u32, u32), ImagingError>;

    fn orientation(&self, path: &Path) -> Orientation;

    fn decode(&self, path: &Path) -> Result<Self::Bitmap, ImagingError>;

    fn dimensions(&self, bitmap: &Self::Bitmap) -> (u32, u32);

    fn orient(&self, bitmap: Self::Bitmap, orientation: Orientation) -> Self::Bitmap;

    fn resize(&self, bitmap: &Self::Bitmap, width: u32, height: u32) -> Self::Bitmap;

    /// A black canvas.
    fn blank(&self, width: u32, height: u32) -> Self::Bitmap;

    /// Draw `source` onto `canvas` at (x, y); parts outside the canvas are clipped.
    fn draw(&self, canvas: &mut Self::Bitmap, source: &Self::Bitmap, x: i64, y: i64);

    fn fill_black(&self, canvas: &mut Self::Bitmap, x: u32, y: u32, width: u32, height: u32);

    fn encode_jpeg(&self, bitmap: &Self::Bitmap, path: &Path, quality: u8) -> Result<(), ImagingError>;
}

/// Backend built on the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageBackend;

impl Imaging for ImageBackend {
    type Bitmap = RgbImage;

    fn probe(&self, path: &Path) -> Result<(u32, u32), ImagingError> {
        ImageReader::open(path)
            .and_then(|reader| reader.with_guessed_format())
            .map_err(|source| ImagingError::Open {
                path: path.to_path_buf(),
                source,
            })?
            .into_dimensions()
            .map_err(|source| ImagingError::Decode {
                path: path.to_path_buf(),
                source,
            })
    }

    fn orientation(&self, path: &Path) -> Orientation {
        read_orientation(path)
    }

    fn decode(&self, path: &Path) -> Result<RgbImage, ImagingError> {
        let image = ImageReader::open(path)
            .and_then(|reader| reader.with_guessed_format())
            .map_err(|source| ImagingError::Open {
                path: path.to_path_buf(),
                source,
            })?
            .decode()
            .map_err(|source| ImagingError::Decode {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(image.to_rgb8())
    }

    fn dimensions(&self, bitmap: &RgbImage) -> (u32, u32) {
        bitmap.dimensions()
    }

    fn orient(&self, bitmap: RgbImage, orientation: Orientation) -> RgbImage {
        match orientation {
            Orientation::Normal => bitmap,
            Orientation::FlipHorizontal => imageops::flip_horizontal(&bitmap),
            Orientation::Rotate180 => imageops::rotate180(&bitmap),
            Orientation::FlipVertical => imageops::flip_vertical(&bitmap),
            Orientation::Transpose => imageops::flip_horizontal(&imageops::rotate90(&bitmap)),
            Orientation::Rotate90 => imageops::rotate90(&bitmap),
            Orientation::Transverse => imageops::flip_horizontal(&imageops::rotate270(&bitmap)),
            Orientation::Rotate270 => imageops::rotate270(&bitmap),
        }
    }

    fn resize(&self, bitmap: &RgbImage, width: u32, height: u32) -> RgbImage {
        imageops::resize(bitmap, width, height, FilterType::CatmullRom)
    }

    fn blank(&self, width: u32, height: u32) -> RgbImage {
        RgbImage::from_pixel(width, height, BLACK)
    }

    fn draw(&self, canvas: &mut RgbImage, source: &RgbImage, x: i64, y: i64) {
        imageops::overlay(canvas, source, x, y);
    }

    fn fill_black(&self, canvas: &mut RgbImage, x: u32, y: u32, width: u32, height: u32) {
        let x_end = x.saturating_add(width).min(canvas.width());
        let y_end = y.saturating_add(height).min(canvas.height());
        for py in y..y_end {
            for px in x..x_end {
                canvas.put_pixel(px, py, BLACK);
            }
        }
    }

    fn encode_jpeg(&self, bitmap: &RgbImage, path: &Path, quality: u8) -> Result<(), ImagingError> {
        let io_err = |source: std::io::Error| ImagingError::Io {
            path: path.to_path_buf(),
            source,
        };
        let mut out = BufWriter::new(File::create(path).map_err(io_err)?);
        JpegEncoder::new_with_quality(&mut out, quality)
            .encode_image(bitmap)
            .map_err(|source| ImagingError::Encode {
                path: path.to_path_buf(),
                source,
            })?;
        out.flush().map_err(io_err)
    }
}
