use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, Local, NaiveDateTime};
use exif::{In, Reader, Tag};
use tracing::debug;

/// Where a capture date came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSource {
    Exif,
    FileSystem,
}

/// Capture date for `path`: the EXIF "date taken" when readable, else the
/// earlier of the filesystem creation and modification times.
pub fn resolve_creation_date(path: &Path) -> Option<(NaiveDateTime, DateSource)> {
    match extract_exif_date(path) {
        Ok(Some(date)) => return Some((date, DateSource::Exif)),
        Ok(None) => debug!("{}: no usable EXIF date, using file times", path.display()),
        Err(e) => debug!("{}: EXIF unreadable ({}), using file times", path.display(), e),
    }
    let date = filesystem_date(path);
    if date.is_none() {
        debug!("{}: no file times available", path.display());
    }
    date.map(|d| (d, DateSource::FileSystem))
}

/// `DateTimeOriginal` from the Exif sub-IFD. IFD0 `DateTime` is the last-edited
/// time and is never used as a capture date.
/// EXIF datetimes have no timezone info - they are local time as-is.
/// `Ok(None)` means the block was read but held no parseable date.
pub fn extract_exif_date(path: &Path) -> Result<Option<NaiveDateTime>, exif::Error> {
    let file = File::open(path)?;
    let reader = Reader::new().read_from_container(&mut BufReader::new(file))?;

    Ok(reader
        .get_field(Tag::DateTimeOriginal, In::PRIMARY)
        .and_then(|field| parse_exif_datetime(&field.display_value().to_string())))
}

fn parse_exif_datetime(s: &str) -> Option<NaiveDateTime> {
    let cleaned = s
        .trim()
        .replace('-', ":")
        .replace('/', ":")
        .replace('\\', ":")
        .replace('.', ":");

    if let Ok(dt) = NaiveDateTime::parse_from_str(&cleaned, "%Y:%m:%d %H:%M:%S") {
        return Some(dt);
    }

    if let Ok(d) = chrono::NaiveDate::parse_from_str(cleaned.split(' ').next()?, "%Y:%m:%d") {
        return d.and_hms_opt(0, 0, 0);
    }

    None
}

/// Earlier of creation and modification time, in local time.
fn filesystem_date(path: &Path) -> Option<NaiveDateTime> {
    let meta = fs::metadata(path).ok()?;
    let earliest: SystemTime = match (meta.created().ok(), meta.modified().ok()) {
        (Some(c), Some(m)) => c.min(m),
        (Some(t), None) | (None, Some(t)) => t,
        (None, None) => return None,
    };
    Some(DateTime::<Local>::from(earliest).naive_local())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{write_jpeg, write_jpeg_with_dates, write_jpeg_with_exif};
    use chrono::NaiveDate;
    use filetime::FileTime;
    use tempfile::tempdir;

    #[test]
    fn test_parse_exif_datetime() {
        let expected = NaiveDate::from_ymd_opt(2013, 1, 1)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        assert_eq!(parse_exif_datetime("2013:01:01 10:30:00"), Some(expected));
        assert_eq!(parse_exif_datetime("2013-01-01 10:30:00"), Some(expected));
        assert!(parse_exif_datetime("0000:00:00 00:00:00").is_none());
        assert!(parse_exif_datetime("garbage").is_none());
    }

    #[test]
    fn test_exif_date_preferred() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dated.jpg");
        write_jpeg_with_exif(&path, 30, 40, None, Some("2013:01:02 08:00:00"));

        let (date, source) = resolve_creation_date(&path).unwrap();
        assert_eq!(source, DateSource::Exif);
        assert_eq!(
            date,
            NaiveDate::from_ymd_opt(2013, 1, 2).unwrap().and_hms_opt(8, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_corrupt_exif_date_falls_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.jpg");
        write_jpeg_with_exif(&path, 30, 40, Some(1), Some("not a date at all!!"));

        let (_, source) = resolve_creation_date(&path).unwrap();
        assert_eq!(source, DateSource::FileSystem);
    }

    #[test]
    fn test_filesystem_fallback_uses_earliest_time() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("plain.jpg");
        write_jpeg(&path, 30, 40);

        // 2001-09-09 01:46:40 UTC, far earlier than any creation time of a fresh file
        filetime::set_file_mtime(&path, FileTime::from_unix_time(1_000_000_000, 0)).unwrap();

        let (date, source) = resolve_creation_date(&path).unwrap();
        assert_eq!(source, DateSource::FileSystem);
        let expected = DateTime::<Local>::from(
            SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(1_000_000_000),
        )
        .naive_local();
        assert_eq!(date, expected);
    }

    #[test]
    fn test_date_taken_wins_over_modify_date() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("edited.jpg");
        write_jpeg_with_dates(&path, 30, 40, Some("2013:01:02 08:00:00"), Some("2020:06:01 12:00:00"));

        let (date, source) = resolve_creation_date(&path).unwrap();
        assert_eq!(source, DateSource::Exif);
        assert_eq!(
            date,
            NaiveDate::from_ymd_opt(2013, 1, 2).unwrap().and_hms_opt(8, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_modify_date_alone_falls_back_to_file_times() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("edited.jpg");
        write_jpeg_with_dates(&path, 30, 40, None, Some("2020:06:01 00:00:00"));
        filetime::set_file_mtime(&path, FileTime::from_unix_time(1_000_000_000, 0)).unwrap();

        let (date, source) = resolve_creation_date(&path).unwrap();
        assert_eq!(source, DateSource::FileSystem);
        let expected = DateTime::<Local>::from(
            SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(1_000_000_000),
        )
        .naive_local();
        assert_eq!(date, expected);
    }
}
