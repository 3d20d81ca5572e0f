//! Harmonic-mixing playlist generator.
//!
//! Tracks are placed on the 24-key harmonic wheel; two tracks can follow
//! each other when their keys are equal, relative, or one step apart. The
//! library links every compatible pair into a graph weighted by tempo
//! distance, and a strategy searches it for the best playlist.
//!
//! Core modules:
//! - [`key`] - The key wheel, notations and compatibility
//! - [`track`] - Tracks and their tempo distance
//! - [`library`] - Loading tracks and building the neighbour graph
//! - [`strategy`] - Playlist search (greedy DFS, empty)
//! - [`scorer`] - Transition and playlist scoring
//! - [`playlist`] - Playlists and m3u output
//!
//! ### Supporting Modules
//!
//! - [`analysis`] - `bpm-tag` and `keyfinder-cli` integration
//! - [`metadata`] - The `.meta` cache records
//! - [`scan`] - Expanding input paths
//! - [`generator`] - One-stop facade used by the binary
//! - [`report`] - Text and JSON summaries
//! - [`config`] - Layered configuration
//! - [`cli`] / [`completion`] - Command line and shell completions
//!
//! ## Quick Start Example
//!
//! ```
//! use std::sync::Arc;
//! use autotracks::key;
//! use autotracks::library::Library;
//! use autotracks::scorer::ByBpm;
//! use autotracks::strategy::{Dfs, Strategy};
//! use autotracks::track::{Track, TrackMetadata};
//!
//! let track = |name: &str, bpm: f64, notation: &str| -> Result<Track, autotracks::error::InvalidNotation> {
//!     let metadata = TrackMetadata { bpm, key: key::lookup(notation)? };
//!     Ok(Track::new(name, format!("{name}.meta"), metadata))
//! };
//! let library = Library::from_tracks(
//!     [track("a.flac", 124.0, "8A")?, track("b.flac", 126.0, "Em")?, track("c.flac", 122.0, "7A")?],
//!     Arc::new(ByBpm),
//! );
//!
//! let strategy = Dfs::new(Arc::new(ByBpm));
//! let playlist = strategy.select_playlist(strategy.generate_playlists(&library));
//! assert_eq!(playlist.len(), 3);
//! print!("{}", playlist.to_m3u());
//! # Ok::<(), autotracks::error::InvalidNotation>(())
//! ```

pub mod analysis;
pub mod cli;
pub mod completion;
pub mod config;
pub mod error;
pub mod generator;
pub mod key;
pub mod library;
pub mod metadata;
pub mod playlist;
pub mod progress;
pub mod report;
pub mod scan;
pub mod scorer;
pub mod strategy;
pub mod track;
