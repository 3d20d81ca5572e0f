//! Error taxonomy for loading tracks and generating playlists.
//!
//! Per-file failures ([`TrackError`]) are collected by the library and never
//! abort a load. [`NotEnoughTracksError`] is the only condition that stops
//! playlist generation.

use thiserror::Error;

/// The external analysis tools failed, or their output could not be parsed.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("audio analysis failed for `{filename}': {reason}")]
pub struct AnalysisError {
    pub filename: String,
    pub reason: String,
}

impl AnalysisError {
    pub fn new(filename: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            reason: reason.into(),
        }
    }
}

/// A key notation that matches none of the 96 lookup entries, even after
/// enharmonic respelling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid key notation: `{0}'")]
pub struct InvalidNotation(pub String);

/// Why a single file could not become a track.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrackError {
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    /// The `.meta` cache record breaks the two-line contract.
    #[error("malformed metadata file `{filename}': {reason}")]
    MalformedMetaFile { filename: String, reason: String },
}

impl TrackError {
    pub fn malformed(filename: impl Into<String>, reason: impl ToString) -> Self {
        Self::MalformedMetaFile {
            filename: filename.into(),
            reason: reason.to_string(),
        }
    }

    #[must_use]
    pub const fn is_malformed_meta_file(&self) -> bool {
        matches!(self, Self::MalformedMetaFile { .. })
    }
}

/// Fewer than two tracks survived loading; no playlist can be searched for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("less than two tracks could be added to the library ({found} loaded)")]
pub struct NotEnoughTracksError {
    pub found: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analysis_error_converts_into_track_error() {
        let error: TrackError = AnalysisError::new("a.flac", "no BPM").into();
        assert!(!error.is_malformed_meta_file());
        assert_eq!(
            error.to_string(),
            "audio analysis failed for `a.flac': no BPM"
        );
    }

    #[test]
    fn malformed_meta_file_message_names_the_record() {
        let error = TrackError::malformed("a.flac.meta", "3 lines (expected 2)");
        assert!(error.is_malformed_meta_file());
        assert!(error.to_string().contains("a.flac.meta"));
    }
}
