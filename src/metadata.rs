//! `.meta` cache records.
//!
//! A record sits next to its audio file (`track.flac` -> `track.flac.meta`)
//! and holds exactly two lines: the BPM, then the key in any supported
//! notation. Records are written with the standard notation.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::TrackError;
use crate::key;
use crate::track::TrackMetadata;

pub const META_EXTENSION: &str = ".meta";

/// `track.flac` -> `track.flac.meta`
#[must_use]
pub fn metadata_filename(audio_filename: &str) -> String {
    format!("{audio_filename}{META_EXTENSION}")
}

/// `track.flac.meta` -> `track.flac`
#[must_use]
pub fn audio_filename(metadata_filename: &str) -> &str {
    metadata_filename
        .strip_suffix(META_EXTENSION)
        .unwrap_or(metadata_filename)
}

#[must_use]
pub fn is_meta_file(filename: &str) -> bool {
    filename.ends_with(META_EXTENSION)
}

#[must_use]
pub fn has_cached_metadata(audio_filename: &str) -> bool {
    Path::new(&metadata_filename(audio_filename)).is_file()
}

/// A tempo usable in a track: finite and above zero.
#[must_use]
pub fn is_valid_bpm(bpm: f64) -> bool {
    bpm.is_finite() && bpm > 0.0
}

/// Parse the contents of a cache record.
///
/// # Errors
///
/// Any line count other than two, an unparseable BPM, or an unknown key
/// notation is a [`TrackError::MalformedMetaFile`].
pub fn parse_metadata(metadata_filename: &str, contents: &str) -> Result<TrackMetadata, TrackError> {
    let lines: Vec<&str> = contents.lines().map(str::trim).collect();
    let [bpm, key] = lines.as_slice() else {
        return Err(TrackError::malformed(
            metadata_filename,
            format!("{} lines in metadata file (expected 2)", lines.len()),
        ));
    };

    let bpm: f64 = bpm
        .parse()
        .map_err(|_| TrackError::malformed(metadata_filename, format!("invalid BPM `{bpm}'")))?;
    if !is_valid_bpm(bpm) {
        return Err(TrackError::malformed(
            metadata_filename,
            format!("BPM out of range: {bpm}"),
        ));
    }
    let key = key::lookup(key).map_err(|error| TrackError::malformed(metadata_filename, error))?;

    Ok(TrackMetadata { bpm, key })
}

/// Read and parse the cache record at `metadata_filename`.
///
/// # Errors
///
/// Unreadable or malformed records yield [`TrackError::MalformedMetaFile`].
pub fn read_metadata(metadata_filename: &str) -> Result<TrackMetadata, TrackError> {
    let contents = fs::read_to_string(metadata_filename)
        .map_err(|error| TrackError::malformed(metadata_filename, error))?;
    parse_metadata(metadata_filename, &contents)
}

#[must_use]
pub fn format_metadata(metadata: &TrackMetadata) -> String {
    format!("{}\n{}\n", metadata.bpm, metadata.key)
}

/// Persist `metadata` so the next run skips analysis.
///
/// # Errors
///
/// Propagates the underlying I/O error.
pub fn write_metadata(metadata_filename: &str, metadata: &TrackMetadata) -> io::Result<()> {
    fs::write(metadata_filename, format_metadata(metadata))?;
    log::trace!("Cached metadata in `{metadata_filename}'");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filenames_map_both_ways() {
        assert_eq!(metadata_filename("dir/a.flac"), "dir/a.flac.meta");
        assert_eq!(audio_filename("dir/a.flac.meta"), "dir/a.flac");
        assert_eq!(audio_filename("dir/a.flac"), "dir/a.flac");
        assert!(is_meta_file("a.flac.meta"));
        assert!(!is_meta_file("a.flac"));
    }

    #[test]
    fn parses_two_line_record_in_any_notation() {
        for notation in ["Amin", "Am", "8A", "1m"] {
            let metadata = parse_metadata("a.meta", &format!("124.5\n{notation}\n")).unwrap();
            assert_eq!(metadata.bpm, 124.5);
            assert_eq!(metadata.key.standard, "Amin");
        }
        let metadata = parse_metadata("a.meta", "  98 \r\n Bbm").unwrap();
        assert_eq!(metadata.key.camelot, "3A");
    }

    #[test]
    fn wrong_line_count_is_malformed() {
        let three = parse_metadata("a.meta", "120\n8A\nextra\n").unwrap_err();
        assert!(three.is_malformed_meta_file());
        assert!(three.to_string().contains("3 lines"));
        assert!(parse_metadata("a.meta", "120\n").is_err());
        assert!(parse_metadata("a.meta", "").is_err());
    }

    #[test]
    fn bad_fields_are_malformed() {
        assert!(parse_metadata("a.meta", "fast\n8A\n").unwrap_err().is_malformed_meta_file());
        assert!(parse_metadata("a.meta", "120\nH#\n").unwrap_err().is_malformed_meta_file());
        assert!(parse_metadata("a.meta", "-5\n8A\n").is_err());
        assert!(parse_metadata("a.meta", "NaN\n8A\n").is_err());
    }

    #[test]
    fn written_record_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.flac.meta");
        let path = path.to_string_lossy();
        let metadata = TrackMetadata {
            bpm: 127.25,
            key: key::lookup("Gb").unwrap(),
        };

        write_metadata(&path, &metadata).unwrap();
        assert_eq!(fs::read_to_string(&*path).unwrap(), "127.25\nF#maj\n");
        assert_eq!(read_metadata(&path).unwrap(), metadata);
    }

    #[test]
    fn missing_record_is_malformed() {
        let error = read_metadata("/nonexistent/a.flac.meta").unwrap_err();
        assert!(error.is_malformed_meta_file());
    }
}
