//! Tempo and key detection through external command-line tools.
//!
//! `bpm-tag` (from bpm-tools) reports tempo, `keyfinder-cli` reports the key
//! in Open Key notation. Both are looked up on `PATH` unless configured
//! otherwise.

use std::process::{Command, Output};

use crate::config::Config;
use crate::error::AnalysisError;
use crate::key;

/// Raw result of analysing one audio file.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub bpm: f64,
    /// Key in whatever notation the analyser emits.
    pub key: String,
}

/// Something that can derive tempo and key from an audio file.
///
/// Called from worker threads, one file per call.
pub trait Analyser: Send + Sync {
    /// # Errors
    ///
    /// Returns an [`AnalysisError`] when the file cannot be analysed.
    fn analyse(&self, filename: &str) -> Result<Analysis, AnalysisError>;
}

/// Runs `bpm-tag -nf <file>` and `keyfinder-cli -n openkey <file>`.
#[derive(Debug, Clone)]
pub struct ExternalTools {
    pub bpm_tag: String,
    pub keyfinder_cli: String,
}

impl ExternalTools {
    pub fn new(bpm_tag: impl Into<String>, keyfinder_cli: impl Into<String>) -> Self {
        Self {
            bpm_tag: bpm_tag.into(),
            keyfinder_cli: keyfinder_cli.into(),
        }
    }

    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.bpm_tag, &config.keyfinder_cli)
    }

    fn detect_bpm(&self, filename: &str) -> Result<f64, AnalysisError> {
        let output = run(&self.bpm_tag, &["-nf", filename], filename)?;
        // bpm-tag reports on stderr
        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        parse_bpm_output(&text).ok_or_else(|| {
            AnalysisError::new(filename, format!("no BPM found in output: {}", text.trim()))
        })
    }

    fn detect_key(&self, filename: &str) -> Result<String, AnalysisError> {
        let output = run(&self.keyfinder_cli, &["-n", "openkey", filename], filename)?;
        let key = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !key::is_valid_notation(&key) {
            return Err(AnalysisError::new(
                filename,
                format!("unknown key notation: `{key}'"),
            ));
        }
        Ok(key)
    }
}

impl Default for ExternalTools {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl Analyser for ExternalTools {
    fn analyse(&self, filename: &str) -> Result<Analysis, AnalysisError> {
        log::debug!("Analysing `{filename}'");
        let bpm = self.detect_bpm(filename)?;
        let key = self.detect_key(filename)?;
        log::debug!("`{filename}': {key} @ {bpm}");
        Ok(Analysis { bpm, key })
    }
}

fn run(program: &str, args: &[&str], filename: &str) -> Result<Output, AnalysisError> {
    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|error| AnalysisError::new(filename, format!("could not run {program}: {error}")))?;

    if !output.status.success() {
        return Err(AnalysisError::new(
            filename,
            format!("{program} exited with {}", output.status),
        ));
    }
    Ok(output)
}

/// Pull the tempo out of `bpm-tag` output.
///
/// The last line mentioning `BPM` wins; the value is the first token after
/// its `": "` separator, as in `song.flac: 124.000 BPM`.
#[must_use]
pub fn parse_bpm_output(output: &str) -> Option<f64> {
    let line = output.lines().rev().find(|line| line.contains("BPM"))?;
    let (_, value) = line.split_once(": ")?;
    let bpm: f64 = value.split_whitespace().next()?.parse().ok()?;
    bpm.is_finite().then_some(bpm)
}
