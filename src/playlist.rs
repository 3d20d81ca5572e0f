//! Ordered, duplicate-free track sequences and their m3u rendering.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::track::Track;

/// A mix sequence. No track appears twice; order is the play order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Playlist {
    tracks: Vec<Arc<Track>>,
}

impl Playlist {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a playlist from `tracks`, keeping only the first occurrence of
    /// each track.
    pub fn from_tracks(tracks: impl IntoIterator<Item = Arc<Track>>) -> Self {
        let mut playlist = Self::new();
        for track in tracks {
            playlist.push(track);
        }
        playlist
    }

    /// Append `track` unless it is already in the playlist.
    /// Returns whether the track was added.
    pub fn push(&mut self, track: Arc<Track>) -> bool {
        if self.contains(&track) {
            return false;
        }
        self.tracks.push(track);
        true
    }

    #[must_use]
    pub fn contains(&self, track: &Track) -> bool {
        self.tracks.iter().any(|t| **t == *track)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    #[must_use]
    pub fn tracks(&self) -> &[Arc<Track>] {
        &self.tracks
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Track>> {
        self.tracks.iter()
    }

    /// Render as m3u: a `# <key> @ <bpm>` comment line then the filename,
    /// for each track. BPM is rounded half to even.
    #[must_use]
    pub fn to_m3u(&self) -> String {
        self.tracks
            .iter()
            .map(|track| {
                format!(
                    "# {} @ {}\n{}\n",
                    track.metadata.key,
                    track.metadata.bpm.round_ties_even(),
                    track.filename
                )
            })
            .collect()
    }

    /// Write the playlist to `path` in m3u format.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be written.
    pub fn write_m3u(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_m3u())
            .with_context(|| format!("Could not write playlist file {}", path.display()))?;
        log::info!("Wrote {} tracks to {}", self.len(), path.display());
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Playlist {
    type Item = &'a Arc<Track>;
    type IntoIter = std::slice::Iter<'a, Arc<Track>>;

    fn into_iter(self) -> Self::IntoIter {
        self.tracks.iter()
    }
}
