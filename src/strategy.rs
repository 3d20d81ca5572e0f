//! Playlist generation strategies.
//!
//! A [`Strategy`] turns a [`Library`] into candidate playlists and picks one.
//! [`Dfs`] walks the neighbour graph greedily between every pair of
//! endpoints; [`Empty`] produces nothing and is useful as a baseline.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::library::{Library, Successor};
use crate::playlist::Playlist;
use crate::scorer::Scorer;
use crate::track::Track;

/// Successor lists of every track reachable from some start track.
pub type Graph<'a> = HashMap<&'a str, &'a [Successor]>;

pub trait Strategy {
    /// Every playlist the strategy considers valid for `library`.
    fn generate_playlists(&self, library: &Library) -> Vec<Playlist>;

    /// The winning playlist, or an empty one when there are no candidates.
    fn select_playlist(&self, playlists: Vec<Playlist>) -> Playlist;

    /// Higher is better.
    fn score_playlist(&self, playlist: &Playlist) -> f64;

    /// The scoring policy this strategy was built with.
    fn scorer(&self) -> &dyn Scorer;
}

/// Greedy depth-first search.
///
/// For each ordered pair of distinct tracks `(first, last)`, start at
/// `first` and repeatedly step to the unvisited successor with the lowest
/// transition score until `last` is reached. A dead end abandons the pair;
/// there is no backtracking. Equal scores keep the earliest successor in
/// filename order.
#[derive(Clone)]
pub struct Dfs {
    scorer: Arc<dyn Scorer>,
}

impl Dfs {
    #[must_use]
    pub fn new(scorer: Arc<dyn Scorer>) -> Self {
        Self { scorer }
    }

    /// The connected component of `first`: each reachable track mapped to
    /// its successor list.
    #[must_use]
    pub fn discover_graph<'a>(&self, library: &'a Library, first: &'a Track) -> Graph<'a> {
        let mut graph = Graph::new();
        let mut visited: HashSet<&str> = HashSet::new();
        let mut worklist: Vec<&'a Track> = vec![first];

        while let Some(track) = worklist.pop() {
            if !visited.insert(track.filename.as_str()) {
                continue;
            }
            let successors = library.successors_of(track);
            graph.insert(track.filename.as_str(), successors);
            worklist.extend(
                successors
                    .iter()
                    .map(|s| s.track.as_ref())
                    .filter(|t| !visited.contains(t.filename.as_str())),
            );
        }

        graph
    }

    /// Greedy walk from `first` to `last` over `graph`, or `None` on a dead end.
    #[must_use]
    pub fn walk(&self, first: &Arc<Track>, last: &Track, graph: &Graph<'_>) -> Option<Vec<Arc<Track>>> {
        let mut path = vec![Arc::clone(first)];
        let mut in_path: HashSet<&str> = HashSet::from([first.filename.as_str()]);
        let mut current = first;

        loop {
            if **current == *last {
                return Some(path);
            }

            let successors = graph.get(current.filename.as_str())?;
            let mut best: Option<&Successor> = None;
            for successor in successors.iter() {
                if in_path.contains(successor.track.filename.as_str()) {
                    continue;
                }
                if best.map_or(true, |b| successor.score < b.score) {
                    best = Some(successor);
                }
            }

            let next = &best?.track;
            log::trace!("`{}' -> `{}'", current.filename, next.filename);
            in_path.insert(next.filename.as_str());
            path.push(Arc::clone(next));
            current = next;
        }
    }

    /// The best playlist from `first` to `last`; empty when `last` is not
    /// reached.
    #[must_use]
    pub fn create_playlist(&self, library: &Library, first: &Arc<Track>, last: &Track) -> Playlist {
        let graph = self.discover_graph(library, first);
        let candidates = self
            .walk(first, last, &graph)
            .map(Playlist::from_tracks)
            .into_iter()
            .collect();
        self.select_playlist(candidates)
    }
}

impl Strategy for Dfs {
    fn generate_playlists(&self, library: &Library) -> Vec<Playlist> {
        let mut playlists = Vec::new();

        for first in library.tracks() {
            log::debug!("Starting with `{}'", first.filename);
            let graph = self.discover_graph(library, first);

            for last in library.tracks().filter(|last| *last != first) {
                match self.walk(first, last, &graph) {
                    Some(path) => {
                        log::debug!("  ending with `{}': {} tracks", last.filename, path.len());
                        playlists.push(Playlist::from_tracks(path));
                    }
                    None => log::debug!("  ending with `{}': no path", last.filename),
                }
            }
        }

        log::info!("Generated {} candidate playlists", playlists.len());
        playlists
    }

    fn select_playlist(&self, playlists: Vec<Playlist>) -> Playlist {
        let mut best: Option<(f64, Playlist)> = None;
        for playlist in playlists {
            let score = self.score_playlist(&playlist);
            if best.as_ref().map_or(true, |(top, _)| score > *top) {
                best = Some((score, playlist));
            }
        }
        best.map(|(_, playlist)| playlist).unwrap_or_default()
    }

    fn score_playlist(&self, playlist: &Playlist) -> f64 {
        self.scorer.score_playlist(playlist)
    }

    fn scorer(&self) -> &dyn Scorer {
        self.scorer.as_ref()
    }
}

/// Generates nothing. Its scorer is carried but never consulted.
#[derive(Clone)]
pub struct Empty {
    scorer: Arc<dyn Scorer>,
}

impl Empty {
    #[must_use]
    pub fn new(scorer: Arc<dyn Scorer>) -> Self {
        Self { scorer }
    }
}

impl Strategy for Empty {
    fn generate_playlists(&self, _library: &Library) -> Vec<Playlist> {
        Vec::new()
    }

    fn select_playlist(&self, _playlists: Vec<Playlist>) -> Playlist {
        Playlist::new()
    }

    fn score_playlist(&self, _playlist: &Playlist) -> f64 {
        0.0
    }

    fn scorer(&self) -> &dyn Scorer {
        self.scorer.as_ref()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    #[default]
    Dfs,
    Empty,
}

impl StrategyKind {
    #[must_use]
    pub fn build(self, scorer: Arc<dyn Scorer>) -> Box<dyn Strategy> {
        match self {
            Self::Dfs => Box::new(Dfs::new(scorer)),
            Self::Empty => Box::new(Empty::new(scorer)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key;
    use crate::scorer::ByBpm;
    use crate::track::TrackMetadata;

    fn library(specs: &[(&str, f64, &str)]) -> Library {
        Library::from_tracks(
            specs.iter().map(|(filename, bpm, notation)| {
                let key = key::lookup(notation).unwrap();
                Track::new(*filename, format!("{filename}.meta"), TrackMetadata { bpm: *bpm, key })
            }),
            Arc::new(ByBpm),
        )
    }

    fn names(playlist: &Playlist) -> Vec<&str> {
        playlist.iter().map(|t| t.filename.as_str()).collect()
    }

    fn dfs() -> Dfs {
        Dfs::new(Arc::new(ByBpm))
    }

    fn assert_valid(playlist: &Playlist) {
        let unique: HashSet<_> = playlist.iter().map(|t| &t.filename).collect();
        assert_eq!(unique.len(), playlist.len());
        for pair in playlist.tracks().windows(2) {
            assert!(pair[0].is_neighbour(&pair[1]));
        }
    }

    #[test]
    fn discovery_covers_the_connected_component() {
        let library = library(&[
            ("1.flac", 120.0, "8A"),
            ("2.flac", 120.0, "9A"),
            ("3.flac", 120.0, "10A"),
            ("4.flac", 120.0, "3A"),
        ]);
        let first = library.get("1.flac").unwrap();
        let graph = dfs().discover_graph(&library, first);
        let mut reached: Vec<_> = graph.keys().copied().collect();
        reached.sort_unstable();
        assert_eq!(reached, ["1.flac", "2.flac", "3.flac"]);
    }

    #[test]
    fn star_yields_three_track_playlists() {
        let library = library(&[
            ("1.flac", 124.0, "8A"),
            ("2.flac", 122.0, "9A"),
            ("3.flac", 128.0, "8B"),
            ("4.flac", 110.0, "3A"),
            ("5.flac", 121.0, "7A"),
        ]);
        let strategy = dfs();
        let playlists = strategy.generate_playlists(&library);
        playlists.iter().for_each(assert_valid);

        let selected = strategy.select_playlist(playlists);
        assert_eq!(selected.len(), 3);
        assert!(!names(&selected).contains(&"4.flac"));
        assert_eq!(strategy.score_playlist(&selected), 3.0);
    }

    #[test]
    fn chain_is_walked_end_to_end() {
        let library = library(&[
            ("1.flac", 120.0, "7A"),
            ("2.flac", 122.0, "8A"),
            ("3.flac", 124.0, "9A"),
            ("4.flac", 126.0, "9B"),
            ("5.flac", 100.0, "3A"),
        ]);
        let strategy = dfs();
        let selected = strategy.select_playlist(strategy.generate_playlists(&library));
        assert_valid(&selected);
        assert_eq!(names(&selected), ["1.flac", "2.flac", "3.flac", "4.flac"]);
    }

    #[test]
    fn walk_prefers_the_closest_tempo() {
        let library = library(&[
            ("a.flac", 120.0, "8A"),
            ("b.flac", 140.0, "8A"),
            ("c.flac", 121.0, "8A"),
        ]);
        let strategy = dfs();
        let a = library.get("a.flac").unwrap();
        let b = library.get("b.flac").unwrap();
        let playlist = strategy.create_playlist(&library, a, b);
        assert_eq!(names(&playlist), ["a.flac", "c.flac", "b.flac"]);
    }

    #[test]
    fn ties_keep_the_first_successor() {
        let library = library(&[
            ("a.flac", 120.0, "8A"),
            ("b.flac", 125.0, "8A"),
            ("c.flac", 125.0, "8A"),
            ("d.flac", 130.0, "3A"),
        ]);
        let strategy = dfs();
        let a = library.get("a.flac").unwrap();
        let c = library.get("c.flac").unwrap();
        let playlist = strategy.create_playlist(&library, a, c);
        assert_eq!(names(&playlist), ["a.flac", "b.flac", "c.flac"]);
    }

    #[test]
    fn dead_end_is_not_backtracked() {
        // From a, b is closest but leads nowhere new; the walk stops there
        // even though a -> c -> d would reach d.
        let library = library(&[
            ("a.flac", 120.0, "8A"),
            ("b.flac", 121.0, "9A"),
            ("c.flac", 130.0, "7A"),
            ("d.flac", 131.0, "6A"),
        ]);
        let strategy = dfs();
        let a = library.get("a.flac").unwrap();
        let d = library.get("d.flac").unwrap();
        assert!(strategy.create_playlist(&library, a, d).is_empty());
    }

    #[test]
    fn unreachable_last_yields_empty_playlist() {
        let library = library(&[("a.flac", 120.0, "8A"), ("b.flac", 120.0, "3A")]);
        let strategy = dfs();
        assert!(strategy.generate_playlists(&library).is_empty());
        assert!(strategy.select_playlist(Vec::new()).is_empty());
    }

    #[test]
    fn selection_keeps_the_first_of_equal_scores() {
        let library = library(&[
            ("a.flac", 120.0, "8A"),
            ("b.flac", 120.0, "8A"),
            ("c.flac", 120.0, "8A"),
        ]);
        let track = |name: &str| Arc::clone(library.get(name).unwrap());
        let first = Playlist::from_tracks(vec![track("a.flac"), track("b.flac")]);
        let second = Playlist::from_tracks(vec![track("b.flac"), track("c.flac")]);
        let selected = dfs().select_playlist(vec![first.clone(), second]);
        assert_eq!(selected, first);
    }

    #[test]
    fn empty_strategy_produces_nothing() {
        let library = library(&[("a.flac", 120.0, "8A"), ("b.flac", 121.0, "8A")]);
        let strategy = StrategyKind::Empty.build(Arc::new(ByBpm));
        let playlists = strategy.generate_playlists(&library);
        assert!(playlists.is_empty());
        let selected = strategy.select_playlist(playlists);
        assert!(selected.is_empty());
        assert_eq!(strategy.score_playlist(&selected), 0.0);
    }

    #[test]
    fn both_strategies_keep_their_scorer() {
        let library = library(&[("a.flac", 120.0, "8A"), ("b.flac", 130.0, "8A")]);
        let a = library.get("a.flac").unwrap();
        let b = library.get("b.flac").unwrap();
        for kind in [StrategyKind::Dfs, StrategyKind::Empty] {
            let strategy = kind.build(Arc::new(ByBpm));
            let score = strategy.scorer().score_transition(a, b);
            assert!((score - 0.1).abs() < 1e-12, "{kind:?} scored {score}");
        }
    }
}
