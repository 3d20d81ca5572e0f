use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::key::{self, Key};

/// What analysis tells us about a track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackMetadata {
    pub bpm: f64,
    pub key: Key,
}

/// An audio file with its metadata.
/// Two tracks are the same track when they share a filename.
#[derive(Debug, Clone)]
pub struct Track {
    pub filename: String,
    /// Where the metadata is (or will be) cached.
    pub metadata_filename: String,
    pub metadata: TrackMetadata,
}

impl Track {
    pub fn new(
        filename: impl Into<String>,
        metadata_filename: impl Into<String>,
        metadata: TrackMetadata,
    ) -> Self {
        Self {
            filename: filename.into(),
            metadata_filename: metadata_filename.into(),
            metadata,
        }
    }

    #[must_use]
    pub fn bpm(&self) -> f64 {
        self.metadata.bpm
    }

    #[must_use]
    pub fn key(&self) -> Key {
        self.metadata.key
    }

    /// True when both keys are equal, relative, or one wheel step apart.
    #[must_use]
    pub fn is_neighbour(&self, other: &Track) -> bool {
        key::is_neighbour(&self.metadata.key, &other.metadata.key)
    }

    /// Tempo distance to `other`, `|bpm - other.bpm| / 100`.
    /// Lower is better; two tracks at the same tempo score zero.
    #[must_use]
    pub fn score_for(&self, other: &Track) -> f64 {
        let score = (self.metadata.bpm - other.metadata.bpm).abs() / 100.0;
        log::trace!("Scored `{}' -> `{}': {score}", self.filename, other.filename);
        score
    }
}

impl PartialEq for Track {
    fn eq(&self, other: &Self) -> bool {
        self.filename == other.filename
    }
}

impl Eq for Track {}

impl Hash for Track {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.filename.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(filename: &str, bpm: f64, notation: &str) -> Track {
        let key = key::lookup(notation).expect("valid notation");
        Track::new(filename, format!("{filename}.meta"), TrackMetadata { bpm, key })
    }

    #[test]
    fn identity_is_the_filename() {
        let a = track("a.flac", 120.0, "8A");
        let same_file = track("a.flac", 90.0, "3B");
        assert_eq!(a, same_file);
        assert_ne!(a, track("b.flac", 120.0, "8A"));
    }

    #[test]
    fn neighbours_follow_the_wheel() {
        let a = track("a.flac", 120.0, "8A");
        assert!(a.is_neighbour(&track("b.flac", 120.0, "9A")));
        assert!(a.is_neighbour(&track("c.flac", 120.0, "8B")));
        assert!(a.is_neighbour(&track("d.flac", 120.0, "Am")));
        assert!(!a.is_neighbour(&track("e.flac", 120.0, "3A")));
    }

    #[test]
    fn score_is_normalised_tempo_distance() {
        let a = track("a.flac", 120.0, "8A");
        let b = track("b.flac", 126.0, "8A");
        assert!((a.score_for(&b) - 0.06).abs() < 1e-12);
        assert_eq!(a.score_for(&b), b.score_for(&a));
        assert_eq!(a.score_for(&a), 0.0);
    }
}
