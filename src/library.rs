//! The track library and its harmonic neighbour graph.
//!
//! Loading never aborts on a bad file: every candidate ends up either as a
//! track or as an entry in the error map, keyed by its audio filename.
//! Maps are ordered by filename so iteration, successor lists and therefore
//! playlist generation are reproducible.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::Arc;

use anyhow::{Context, Result};
use rayon::prelude::*;

use crate::analysis::Analyser;
use crate::error::{AnalysisError, TrackError};
use crate::key;
use crate::metadata;
use crate::progress;
use crate::scan;
use crate::scorer::Scorer;
use crate::track::{Track, TrackMetadata};

/// An edge of the neighbour graph, seen from its source track.
#[derive(Debug, Clone)]
pub struct Successor {
    /// Transition score from the source track, lower is better.
    pub score: f64,
    pub track: Arc<Track>,
}

#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    /// Analysis threads; 0 lets rayon decide.
    pub workers: usize,
    pub show_progress: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            workers: 0,
            show_progress: true,
        }
    }
}

pub struct Library {
    tracks: BTreeMap<String, Arc<Track>>,
    neighbours: BTreeMap<String, Vec<Successor>>,
    errors: BTreeMap<String, TrackError>,
    scorer: Arc<dyn Scorer>,
}

impl fmt::Debug for Library {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Library")
            .field("tracks", &self.tracks.len())
            .field("errors", &self.errors.len())
            .finish_non_exhaustive()
    }
}

impl Library {
    /// An empty library whose graph will be weighted by `scorer`.
    #[must_use]
    pub fn new(scorer: Arc<dyn Scorer>) -> Self {
        Self {
            tracks: BTreeMap::new(),
            neighbours: BTreeMap::new(),
            errors: BTreeMap::new(),
            scorer,
        }
    }

    /// Build a library from already-known tracks.
    pub fn from_tracks(tracks: impl IntoIterator<Item = Track>, scorer: Arc<dyn Scorer>) -> Self {
        let mut library = Self::new(scorer);
        for track in tracks {
            library.tracks.insert(track.filename.clone(), Arc::new(track));
        }
        library.find_neighbours();
        library
    }

    /// Load every audio file and cache record among `filenames`.
    ///
    /// Audio files with a `.meta` record next to them are read from cache.
    /// The rest go through `analyser` in parallel and get a record written.
    /// Records given without their audio file load under the audio name.
    /// Anything else is ignored.
    ///
    /// # Errors
    ///
    /// Only fails when the analysis thread pool cannot be started; per-file
    /// problems land in [`Library::errors`].
    pub fn load(
        filenames: &[String],
        analyser: &dyn Analyser,
        scorer: Arc<dyn Scorer>,
        options: LoadOptions,
    ) -> Result<Self> {
        let mut library = Self::new(scorer);

        let (audio, meta) = scan::partition_candidates(filenames);
        let (cached, fresh): (Vec<&String>, Vec<&String>) = audio
            .iter()
            .partition(|filename| metadata::has_cached_metadata(filename));
        log::info!(
            "{} audio files: {} cached, {} to analyse",
            audio.len(),
            cached.len(),
            fresh.len()
        );

        for (filename, result) in analyse_all(&fresh, analyser, options)? {
            library.record(filename, result);
        }

        for filename in cached {
            let result = load_cached(filename, &metadata::metadata_filename(filename));
            library.record(filename.clone(), result);
        }

        let audio_set: HashSet<&str> = audio.iter().map(String::as_str).collect();
        for meta_filename in &meta {
            let audio_filename = metadata::audio_filename(meta_filename);
            if !audio_set.contains(audio_filename) {
                log::debug!("Loading orphan metadata file `{meta_filename}'");
                let result = load_cached(audio_filename, meta_filename);
                library.record(audio_filename.to_string(), result);
            }
        }

        library.find_neighbours();
        log::info!(
            "Library loaded: {} tracks, {} errors",
            library.count(),
            library.errors.len()
        );
        Ok(library)
    }

    fn record(&mut self, filename: String, result: Result<Track, TrackError>) {
        match result {
            Ok(track) => {
                self.errors.remove(&filename);
                self.tracks.insert(filename, Arc::new(track));
            }
            Err(error) => {
                log::warn!("{error}");
                self.tracks.remove(&filename);
                self.errors.insert(filename, error);
            }
        }
    }

    /// Rebuild the neighbour graph from scratch over every unordered pair.
    fn find_neighbours(&mut self) {
        let tracks: Vec<Arc<Track>> = self.tracks.values().cloned().collect();
        let mut neighbours: BTreeMap<String, Vec<Successor>> = tracks
            .iter()
            .map(|track| (track.filename.clone(), Vec::new()))
            .collect();

        for (i, a) in tracks.iter().enumerate() {
            for b in &tracks[i + 1..] {
                if !a.is_neighbour(b) {
                    continue;
                }
                let forward = self.successor(a, b);
                let backward = self.successor(b, a);
                if let Some(list) = neighbours.get_mut(&a.filename) {
                    list.push(forward);
                }
                if let Some(list) = neighbours.get_mut(&b.filename) {
                    list.push(backward);
                }
            }
        }

        self.neighbours = neighbours;
    }

    fn successor(&self, from: &Track, to: &Arc<Track>) -> Successor {
        Successor {
            score: self.scorer.score_transition(from, to),
            track: Arc::clone(to),
        }
    }

    /// Insert or replace `track`, linking it into the graph.
    pub fn add(&mut self, track: Track) -> Arc<Track> {
        self.remove(&track.filename);
        let track = Arc::new(track);

        let mut own = Vec::new();
        for other in self.tracks.values() {
            if !track.is_neighbour(other) {
                continue;
            }
            own.push(self.successor(&track, other));
            let back = self.successor(other, &track);
            if let Some(list) = self.neighbours.get_mut(&other.filename) {
                let at = list.partition_point(|s| s.track.filename < track.filename);
                list.insert(at, back);
            }
        }

        self.errors.remove(&track.filename);
        self.neighbours.insert(track.filename.clone(), own);
        self.tracks.insert(track.filename.clone(), Arc::clone(&track));
        track
    }

    /// Drop a track and every edge touching it.
    pub fn remove(&mut self, filename: &str) -> Option<Arc<Track>> {
        let track = self.tracks.remove(filename)?;
        if let Some(successors) = self.neighbours.remove(filename) {
            for successor in successors {
                if let Some(list) = self.neighbours.get_mut(&successor.track.filename) {
                    list.retain(|s| s.track.filename != filename);
                }
            }
        }
        Some(track)
    }

    /// Neighbours of `track` with their transition scores, in filename order.
    #[must_use]
    pub fn successors_of(&self, track: &Track) -> &[Successor] {
        self.neighbours
            .get(&track.filename)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.tracks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Tracks in filename order.
    pub fn tracks(&self) -> impl Iterator<Item = &Arc<Track>> + '_ {
        self.tracks.values()
    }

    #[must_use]
    pub fn get(&self, filename: &str) -> Option<&Arc<Track>> {
        self.tracks.get(filename)
    }

    #[must_use]
    pub fn errors(&self) -> &BTreeMap<String, TrackError> {
        &self.errors
    }

    #[must_use]
    pub fn scorer(&self) -> &dyn Scorer {
        self.scorer.as_ref()
    }
}

fn analyse_all(
    filenames: &[&String],
    analyser: &dyn Analyser,
    options: LoadOptions,
) -> Result<Vec<(String, Result<Track, TrackError>)>> {
    if filenames.is_empty() {
        return Ok(Vec::new());
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.workers)
        .build()
        .context("Failed to start analysis thread pool")?;
    let bar = progress::create_progress_bar(
        filenames.len() as u64,
        "Analysing audio files",
        options.show_progress,
    );

    let results: Vec<_> = pool.install(|| {
        filenames
            .par_iter()
            .map(|filename| {
                let result = analyse_one(filename, analyser);
                bar.inc(1);
                ((*filename).clone(), result)
            })
            .collect()
    });
    bar.finish_and_clear();
    Ok(results)
}

fn analyse_one(filename: &str, analyser: &dyn Analyser) -> Result<Track, TrackError> {
    let analysis = analyser.analyse(filename)?;
    if !metadata::is_valid_bpm(analysis.bpm) {
        return Err(AnalysisError::new(filename, format!("BPM out of range: {}", analysis.bpm)).into());
    }
    let key = key::lookup(&analysis.key)
        .map_err(|error| AnalysisError::new(filename, error.to_string()))?;
    let track = Track::new(
        filename,
        metadata::metadata_filename(filename),
        TrackMetadata {
            bpm: analysis.bpm,
            key,
        },
    );

    if let Err(error) = metadata::write_metadata(&track.metadata_filename, &track.metadata) {
        log::warn!(
            "Could not cache metadata in `{}': {error}",
            track.metadata_filename
        );
    }
    Ok(track)
}

fn load_cached(audio_filename: &str, meta_filename: &str) -> Result<Track, TrackError> {
    let metadata = metadata::read_metadata(meta_filename)?;
    Ok(Track::new(audio_filename, meta_filename, metadata))
}
