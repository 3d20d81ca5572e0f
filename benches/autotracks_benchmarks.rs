//! # autotracks Performance Benchmarks
//!
//! - **Key lookup**: notation parsing, including enharmonic respelling
//! - **Neighbour graph**: the O(n²) pairwise scan when a library is built
//! - **Playlist search**: greedy DFS over every endpoint pair
//!
//! ```bash
//! cargo bench
//! cargo bench graph
//! ```

use std::hint::black_box;
use std::sync::Arc;

use autotracks::key::{self, KEYS};
use autotracks::library::Library;
use autotracks::scorer::ByBpm;
use autotracks::strategy::{Dfs, Strategy};
use autotracks::track::{Track, TrackMetadata};
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};

/// Deterministic tracks spread over the wheel and 90-140 BPM.
fn create_test_tracks(count: usize) -> Vec<Track> {
    (0..count)
        .map(|i| {
            let key = KEYS[(i * 7) % KEYS.len()];
            #[allow(clippy::cast_precision_loss)]
            let bpm = 90.0 + ((i * 13) % 50) as f64;
            let filename = format!("/music/track-{i:04}.flac");
            Track::new(
                filename.clone(),
                format!("{filename}.meta"),
                TrackMetadata { bpm, key },
            )
        })
        .collect()
}

fn benchmark_key_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("key");
    for notation in ["Amin", "8A", "1m", "Bbm", "Gbmaj"] {
        group.bench_with_input(BenchmarkId::new("lookup", notation), notation, |b, n| {
            b.iter(|| key::lookup(black_box(n)));
        });
    }
    group.finish();
}

fn benchmark_neighbour_graph(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph");
    for size in [50, 200, 500] {
        let tracks = create_test_tracks(size);
        group.bench_with_input(BenchmarkId::new("from_tracks", size), &tracks, |b, tracks| {
            b.iter_batched(
                || tracks.clone(),
                |tracks| Library::from_tracks(tracks, Arc::new(ByBpm)),
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn benchmark_dfs(c: &mut Criterion) {
    let mut group = c.benchmark_group("dfs");
    group.sample_size(10);
    for size in [20, 60] {
        let library = Library::from_tracks(create_test_tracks(size), Arc::new(ByBpm));
        let strategy = Dfs::new(Arc::new(ByBpm));
        group.bench_with_input(BenchmarkId::new("generate_and_select", size), &library, |b, library| {
            b.iter(|| {
                let playlists = strategy.generate_playlists(black_box(library));
                strategy.select_playlist(playlists)
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    benchmark_key_lookup,
    benchmark_neighbour_graph,
    benchmark_dfs
);
criterion_main!(benches);
