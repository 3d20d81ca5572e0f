//! Run summaries for the terminal and for scripts.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::Serialize;

use crate::error::TrackError;
use crate::library::Library;
use crate::playlist::Playlist;
use crate::track::Track;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackSummary {
    pub filename: String,
    pub key: String,
    pub camelot: String,
    pub bpm: f64,
}

impl From<&Track> for TrackSummary {
    fn from(track: &Track) -> Self {
        let key = track.key();
        Self {
            filename: track.filename.clone(),
            key: key.standard.to_string(),
            camelot: key.camelot.to_string(),
            bpm: track.bpm(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorSummary {
    pub filename: String,
    pub error: String,
}

fn summarise_errors(errors: &BTreeMap<String, TrackError>) -> Vec<ErrorSummary> {
    errors
        .iter()
        .map(|(filename, error)| ErrorSummary {
            filename: filename.clone(),
            error: error.to_string(),
        })
        .collect()
}

fn write_errors(out: &mut String, errors: &[ErrorSummary]) {
    if errors.is_empty() {
        return;
    }
    let _ = writeln!(out, "\n{} errors:", errors.len());
    for error in errors {
        let _ = writeln!(out, "  {}", error.error);
    }
}

/// Outcome of `generate`.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub playlist: Vec<TrackSummary>,
    pub score: f64,
    pub unused: Vec<TrackSummary>,
    pub errors: Vec<ErrorSummary>,
}

impl Report {
    pub fn new<'a>(
        playlist: &Playlist,
        score: f64,
        unused: impl IntoIterator<Item = &'a Track>,
        errors: &BTreeMap<String, TrackError>,
    ) -> Self {
        Self {
            playlist: playlist.iter().map(|t| TrackSummary::from(t.as_ref())).collect(),
            score,
            unused: unused.into_iter().map(TrackSummary::from).collect(),
            errors: summarise_errors(errors),
        }
    }

    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Playlist: {} tracks, score {}", self.playlist.len(), self.score);
        for (i, track) in self.playlist.iter().enumerate() {
            let _ = writeln!(
                out,
                "{:>3}. {} @ {:.1}  {}",
                i + 1,
                track.key,
                track.bpm,
                track.filename
            );
        }
        if !self.unused.is_empty() {
            let _ = writeln!(out, "\n{} unused tracks:", self.unused.len());
            for track in &self.unused {
                let _ = writeln!(out, "  {}", track.filename);
            }
        }
        write_errors(&mut out, &self.errors);
        out
    }
}

/// Outcome of `analyse`.
#[derive(Debug, Clone, Serialize)]
pub struct LibraryReport {
    pub tracks: Vec<TrackSummary>,
    pub errors: Vec<ErrorSummary>,
}

impl LibraryReport {
    #[must_use]
    pub fn new(library: &Library) -> Self {
        Self {
            tracks: library
                .tracks()
                .map(|t| TrackSummary::from(t.as_ref()))
                .collect(),
            errors: summarise_errors(library.errors()),
        }
    }

    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for track in &self.tracks {
            let _ = writeln!(
                out,
                "{:<6} {:>4} {:>7.2}  {}",
                track.key, track.camelot, track.bpm, track.filename
            );
        }
        write_errors(&mut out, &self.errors);
        out
    }
}
