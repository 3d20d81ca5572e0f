//! Expand command-line paths into candidate filenames.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

use crate::metadata;

pub const AUDIO_EXTENSIONS: &[&str] = &[
    "flac", "mp3", "wav", "aiff", "aif", "ogg", "opus", "m4a", "aac", "wma",
];

/// An existing file with a known audio extension.
#[must_use]
pub fn is_audio_file(path: impl AsRef<Path>) -> bool {
    let path = path.as_ref();
    path.is_file()
        && path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                AUDIO_EXTENSIONS
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(ext))
            })
}

/// Directories are replaced by the files they contain, sorted by name
/// (top level only unless `recursive`). Other paths pass through untouched
/// so the library can report on them.
///
/// # Errors
///
/// Fails when a directory cannot be read.
pub fn collect_filenames(paths: &[PathBuf], recursive: bool) -> Result<Vec<String>> {
    let mut filenames = Vec::new();

    for path in paths {
        if !path.is_dir() {
            filenames.extend(utf8_filename(path));
            continue;
        }

        let mut walker = WalkDir::new(path).min_depth(1).sort_by_file_name();
        if !recursive {
            walker = walker.max_depth(1);
        }
        for entry in walker {
            let entry =
                entry.with_context(|| format!("Failed to scan directory {}", path.display()))?;
            if entry.file_type().is_file() {
                filenames.extend(utf8_filename(entry.path()));
            }
        }
    }

    log::debug!("Collected {} candidate files", filenames.len());
    Ok(filenames)
}

fn utf8_filename(path: &Path) -> Option<String> {
    let filename = path.to_str().map(str::to_owned);
    if filename.is_none() {
        log::warn!("Skipping `{}': path is not valid UTF-8", path.display());
    }
    filename
}

/// Split candidates into audio files and cache records, dropping the rest.
/// A filename given more than once is kept at its first position.
#[must_use]
pub fn partition_candidates(filenames: &[String]) -> (Vec<String>, Vec<String>) {
    let mut seen = HashSet::new();
    let mut audio = Vec::new();
    let mut meta = Vec::new();
    for filename in filenames {
        if !seen.insert(filename.as_str()) {
            log::debug!("Skipping duplicate `{filename}'");
            continue;
        }
        if metadata::is_meta_file(filename) {
            meta.push(filename.clone());
        } else if is_audio_file(filename) {
            audio.push(filename.clone());
        } else {
            log::debug!("Ignoring `{filename}': not an audio file");
        }
    }
    (audio, meta)
}
