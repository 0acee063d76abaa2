//! Fixture builders shared by the unit tests.

use std::fs;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::{Rgb, RgbImage};

/// Write a solid grey JPEG with no EXIF block.
pub fn write_jpeg(path: &Path, width: u32, height: u32) {
    write_jpeg_colored(path, width, height, [128, 128, 128]);
}

pub fn write_jpeg_colored(path: &Path, width: u32, height: u32, color: [u8; 3]) {
    fs::write(path, encode(width, height, color)).unwrap();
}

/// Write a JPEG carrying an EXIF Orientation and/or date-taken
/// (`DateTimeOriginal`) tag.
pub fn write_jpeg_with_exif(
    path: &Path,
    width: u32,
    height: u32,
    orientation: Option<u16>,
    date_taken: Option<&str>,
) {
    write_with_tiff(path, width, height, tiff_block(orientation, date_taken, None));
}

/// Write a JPEG with an optional date-taken tag and an optional IFD0
/// `DateTime` (last-edited) tag.
pub fn write_jpeg_with_dates(
    path: &Path,
    width: u32,
    height: u32,
    date_taken: Option<&str>,
    modified: Option<&str>,
) {
    write_with_tiff(path, width, height, tiff_block(None, date_taken, modified));
}

fn write_with_tiff(path: &Path, width: u32, height: u32, tiff: Vec<u8>) {
    let jpeg = encode(width, height, [128, 128, 128]);

    let mut out = Vec::with_capacity(jpeg.len() + tiff.len() + 10);
    out.extend_from_slice(&jpeg[..2]); // SOI
    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&((2 + 6 + tiff.len()) as u16).to_be_bytes());
    out.extend_from_slice(b"Exif\0\0");
    out.extend_from_slice(&tiff);
    out.extend_from_slice(&jpeg[2..]);
    fs::write(path, out).unwrap();
}

fn encode(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb(color));
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, 90)
        .encode_image(&img)
        .unwrap();
    buf
}

fn ascii(text: &str) -> Vec<u8> {
    let mut bytes = text.as_bytes().to_vec();
    bytes.push(0);
    bytes
}

fn push_entry(out: &mut Vec<u8>, tag: u16, kind: u16, count: u32, value: [u8; 4]) {
    out.extend_from_slice(&tag.to_le_bytes());
    out.extend_from_slice(&kind.to_le_bytes());
    out.extend_from_slice(&count.to_le_bytes());
    out.extend_from_slice(&value);
}

const SHORT: u16 = 3;
const ASCII: u16 = 2;
const LONG: u16 = 4;

/// Little-endian TIFF: IFD0 (Orientation, DateTime, ExifIFDPointer) followed by
/// its value area, then an Exif sub-IFD holding DateTimeOriginal.
fn tiff_block(orientation: Option<u16>, date_taken: Option<&str>, modified: Option<&str>) -> Vec<u8> {
    let modified = modified.map(ascii);
    let date_taken = date_taken.map(ascii);

    let count = orientation.is_some() as u16 + modified.is_some() as u16 + date_taken.is_some() as u16;
    let ifd0_end = 8 + 2 + 12 * count as u32 + 4;
    let exif_ifd = ifd0_end + modified.as_ref().map_or(0, |m| m.len() as u32);

    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"II");
    tiff.extend_from_slice(&42u16.to_le_bytes());
    tiff.extend_from_slice(&8u32.to_le_bytes());
    tiff.extend_from_slice(&count.to_le_bytes());

    // IFD entries must be sorted by tag
    if let Some(value) = orientation {
        let v = value.to_le_bytes();
        push_entry(&mut tiff, 0x0112, SHORT, 1, [v[0], v[1], 0, 0]);
    }
    if let Some(text) = &modified {
        push_entry(&mut tiff, 0x0132, ASCII, text.len() as u32, ifd0_end.to_le_bytes());
    }
    if date_taken.is_some() {
        push_entry(&mut tiff, 0x8769, LONG, 1, exif_ifd.to_le_bytes());
    }
    tiff.extend_from_slice(&0u32.to_le_bytes()); // no next IFD
    if let Some(text) = &modified {
        tiff.extend_from_slice(text);
    }

    if let Some(text) = &date_taken {
        tiff.extend_from_slice(&1u16.to_le_bytes());
        push_entry(&mut tiff, 0x9003, ASCII, text.len() as u32, (exif_ifd + 18).to_le_bytes());
        tiff.extend_from_slice(&0u32.to_le_bytes());
        tiff.extend_from_slice(text);
    }
    tiff
}
