//! High-level facade tying the library, a strategy and the output together.
//!
//! ```no_run
//! use std::path::{Path, PathBuf};
//! use std::sync::Arc;
//! use autotracks::config::Config;
//! use autotracks::generator::PlaylistGenerator;
//! use autotracks::scorer::ByBpm;
//! use autotracks::strategy::Dfs;
//!
//! let generator = PlaylistGenerator::from_paths(&[PathBuf::from("music")], &Config::default())?;
//! let strategy = Dfs::new(Arc::new(ByBpm));
//! let playlist = generator.run(&strategy)?;
//! generator.write_playlist(&playlist, Path::new("mix.m3u"))?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use crate::analysis::{Analyser, ExternalTools};
use crate::config::Config;
use crate::error::{NotEnoughTracksError, TrackError};
use crate::library::Library;
use crate::playlist::Playlist;
use crate::scan;
use crate::scorer::{ByBpm, Scorer};
use crate::strategy::Strategy;
use crate::track::Track;

/// The search is undefined below this many tracks.
pub const MIN_TRACKS: usize = 2;

#[derive(Debug)]
pub struct PlaylistGenerator {
    library: Library,
}

impl PlaylistGenerator {
    #[must_use]
    pub fn new(library: Library) -> Self {
        Self { library }
    }

    /// Scan `paths` and load them with the external analysis tools and
    /// tempo scoring.
    ///
    /// # Errors
    ///
    /// Fails when a directory cannot be scanned or the analysis pool
    /// cannot start.
    pub fn from_paths(paths: &[PathBuf], config: &Config) -> Result<Self> {
        let analyser = ExternalTools::from_config(config);
        Self::load(paths, config, &analyser, Arc::new(ByBpm))
    }

    /// Like [`PlaylistGenerator::from_paths`] with an explicit analyser and
    /// scorer.
    ///
    /// # Errors
    ///
    /// Fails when a directory cannot be scanned or the analysis pool
    /// cannot start.
    pub fn load(
        paths: &[PathBuf],
        config: &Config,
        analyser: &dyn Analyser,
        scorer: Arc<dyn Scorer>,
    ) -> Result<Self> {
        let filenames = scan::collect_filenames(paths, config.recursive)?;
        let library = Library::load(&filenames, analyser, scorer, config.load_options())?;
        Ok(Self::new(library))
    }

    /// All candidate playlists according to `strategy`.
    ///
    /// # Errors
    ///
    /// [`NotEnoughTracksError`] when fewer than two tracks were loaded.
    pub fn generate_playlists(
        &self,
        strategy: &dyn Strategy,
    ) -> Result<Vec<Playlist>, NotEnoughTracksError> {
        let found = self.library.count();
        if found < MIN_TRACKS {
            return Err(NotEnoughTracksError { found });
        }
        Ok(strategy.generate_playlists(&self.library))
    }

    #[must_use]
    pub fn select_playlist(&self, strategy: &dyn Strategy, playlists: Vec<Playlist>) -> Playlist {
        strategy.select_playlist(playlists)
    }

    #[must_use]
    pub fn score_playlist(&self, scorer: &dyn Scorer, playlist: &Playlist) -> f64 {
        scorer.score_playlist(playlist)
    }

    /// Generate and select in one go.
    ///
    /// # Errors
    ///
    /// [`NotEnoughTracksError`] when fewer than two tracks were loaded.
    pub fn run(&self, strategy: &dyn Strategy) -> Result<Playlist, NotEnoughTracksError> {
        let playlists = self.generate_playlists(strategy)?;
        let selected = self.select_playlist(strategy, playlists);
        log::info!(
            "Selected a playlist of {} tracks (score {})",
            selected.len(),
            strategy.score_playlist(&selected)
        );
        Ok(selected)
    }

    /// # Errors
    ///
    /// Fails when the file cannot be written.
    pub fn write_playlist(&self, playlist: &Playlist, path: &Path) -> Result<()> {
        playlist.write_m3u(path)
    }

    /// Library tracks left out of `playlist`, in filename order.
    #[must_use]
    pub fn unused_tracks(&self, playlist: &Playlist) -> Vec<Arc<Track>> {
        let used: HashSet<&str> = playlist.iter().map(|t| t.filename.as_str()).collect();
        self.library
            .tracks()
            .filter(|track| !used.contains(track.filename.as_str()))
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn errors(&self) -> &BTreeMap<String, TrackError> {
        self.library.errors()
    }

    #[must_use]
    pub fn library(&self) -> &Library {
        &self.library
    }
}
