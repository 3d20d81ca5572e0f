//! Transition and playlist scoring policies.
//!
//! A [`Scorer`] answers two separate questions: how far apart two tracks are
//! (lower is better), and how good a whole playlist is (higher is better).
//! Search strategies only consume these numbers, so a different policy can
//! be plugged in without touching the search.

use crate::playlist::Playlist;
use crate::track::Track;

/// Scoring policy used to build the neighbour graph and rank playlists.
pub trait Scorer: Send + Sync {
    /// Distance for moving from `from` to `to`; lower is better.
    fn score_transition(&self, from: &Track, to: &Track) -> f64;

    /// Overall desirability of `playlist`; higher is better.
    fn score_playlist(&self, playlist: &Playlist) -> f64;
}

/// Tempo-distance transitions, length-ranked playlists.
///
/// # Examples
///
/// ```
/// use autotracks::key;
/// use autotracks::scorer::{ByBpm, Scorer};
/// use autotracks::track::{Track, TrackMetadata};
///
/// let key = key::lookup("8A")?;
/// let a = Track::new("a.flac", "a.flac.meta", TrackMetadata { bpm: 120.0, key });
/// let b = Track::new("b.flac", "b.flac.meta", TrackMetadata { bpm: 130.0, key });
///
/// assert!((ByBpm.score_transition(&a, &b) - 0.1).abs() < 1e-12);
/// # Ok::<(), autotracks::error::InvalidNotation>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ByBpm;

impl Scorer for ByBpm {
    fn score_transition(&self, from: &Track, to: &Track) -> f64 {
        from.score_for(to)
    }

    #[allow(clippy::cast_precision_loss)]
    fn score_playlist(&self, playlist: &Playlist) -> f64 {
        playlist.len() as f64
    }
}

/// Sum of transition scores along `playlist`, in play order.
#[must_use]
pub fn total_transition_score(scorer: &dyn Scorer, playlist: &Playlist) -> f64 {
    playlist
        .tracks()
        .windows(2)
        .map(|pair| scorer.score_transition(&pair[0], &pair[1]))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key;
    use crate::track::TrackMetadata;
    use std::sync::Arc;

    fn track(filename: &str, bpm: f64) -> Arc<Track> {
        let key = key::lookup("8A").unwrap();
        Arc::new(Track::new(
            filename,
            format!("{filename}.meta"),
            TrackMetadata { bpm, key },
        ))
    }

    #[test]
    fn transition_matches_track_distance() {
        let a = track("a.flac", 100.0);
        let b = track("b.flac", 150.0);
        assert_eq!(ByBpm.score_transition(&a, &b), a.score_for(&b));
        assert_eq!(ByBpm.score_transition(&a, &b), 0.5);
    }

    #[test]
    fn longer_playlists_score_higher() {
        let short = Playlist::from_tracks(vec![track("a.flac", 120.0)]);
        let long = Playlist::from_tracks(vec![track("a.flac", 120.0), track("b.flac", 124.0)]);
        assert_eq!(ByBpm.score_playlist(&short), 1.0);
        assert_eq!(ByBpm.score_playlist(&long), 2.0);
        assert_eq!(ByBpm.score_playlist(&Playlist::new()), 0.0);
    }

    #[test]
    fn total_transition_score_sums_adjacent_pairs() {
        let playlist = Playlist::from_tracks(vec![
            track("a.flac", 120.0),
            track("b.flac", 130.0),
            track("c.flac", 125.0),
        ]);
        let total = total_transition_score(&ByBpm, &playlist);
        assert!((total - 0.15).abs() < 1e-12);
        assert_eq!(total_transition_score(&ByBpm, &Playlist::new()), 0.0);
    }
}
