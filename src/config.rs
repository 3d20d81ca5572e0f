//! # Configuration Module
//!
//! Settings are layered, lowest precedence first:
//!
//! 1. built-in defaults
//! 2. `config.json` in the platform config directory
//!    - Linux: `~/.config/autotracks/config.json`
//!    - macOS: `~/Library/Application Support/autotracks/config.json`
//!    - Windows: `%APPDATA%\autotracks\config.json`
//! 3. a `.env` file in the working directory
//! 4. environment: `BPM_TAG`, `KEYFINDER_CLI`, `AUTOTRACKS_WORKERS`
//! 5. command-line flags (applied by `main`)
//!
//! A missing file is fine; a file that does not parse is an error.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::library::LoadOptions;

pub const BPM_TAG_VAR: &str = "BPM_TAG";
pub const KEYFINDER_CLI_VAR: &str = "KEYFINDER_CLI";
pub const WORKERS_VAR: &str = "AUTOTRACKS_WORKERS";
pub const DOTENV_FILE: &str = ".env";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `bpm-tag` executable.
    pub bpm_tag: String,
    /// `keyfinder-cli` executable.
    pub keyfinder_cli: String,
    /// Parallel analysis jobs; 0 means one per CPU.
    pub workers: usize,
    /// Descend into subdirectories of input paths.
    pub recursive: bool,
    pub show_progress: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bpm_tag: "bpm-tag".to_string(),
            keyfinder_cli: "keyfinder-cli".to_string(),
            workers: 0,
            recursive: false,
            show_progress: true,
        }
    }
}

/// Where the configuration file lives on this platform, if anywhere.
#[must_use]
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("autotracks").join("config.json"))
}

impl Config {
    /// Defaults, then the user's config file, then `.env`, then the
    /// environment.
    ///
    /// # Errors
    ///
    /// Fails on an unreadable or malformed config or `.env` file, or an
    /// invalid environment value.
    pub fn load() -> Result<Self> {
        Self::load_from(
            config_path().as_deref(),
            Path::new(DOTENV_FILE),
            |name| std::env::var(name).ok(),
        )
    }

    /// [`Config::load`] with every source made explicit.
    ///
    /// # Errors
    ///
    /// Same as [`Config::load`].
    pub fn load_from(
        config_file: Option<&Path>,
        dotenv_file: &Path,
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let mut config = match config_file {
            Some(path) if path.is_file() => Self::from_file(path)?,
            _ => Self::default(),
        };
        let dotenv = read_dotenv(dotenv_file)?;
        config.apply_env(|name| {
            var(name)
                .filter(|value| !value.is_empty())
                .or_else(|| dotenv.get(name).cloned())
        })?;
        Ok(config)
    }

    /// Read a JSON config file. Absent fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = serde_json::from_str(&contents)
            .with_context(|| format!("Malformed config file {}", path.display()))?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Override fields from environment variables, looked up through `var`.
    /// Empty values are ignored.
    ///
    /// # Errors
    ///
    /// Fails when `AUTOTRACKS_WORKERS` is not a number.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        let lookup = |name: &str| var(name).filter(|value| !value.is_empty());

        if let Some(bpm_tag) = lookup(BPM_TAG_VAR) {
            self.bpm_tag = bpm_tag;
        }
        if let Some(keyfinder_cli) = lookup(KEYFINDER_CLI_VAR) {
            self.keyfinder_cli = keyfinder_cli;
        }
        if let Some(workers) = lookup(WORKERS_VAR) {
            self.workers = workers
                .parse()
                .with_context(|| format!("{WORKERS_VAR} must be a number, got `{workers}'"))?;
        }
        Ok(())
    }

    #[must_use]
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            workers: self.workers,
            show_progress: self.show_progress,
        }
    }
}

/// Variables from a dotenv file; a missing file yields none.
///
/// # Errors
///
/// Fails when the file exists but cannot be read or parsed.
pub fn read_dotenv(path: &Path) -> Result<HashMap<String, String>> {
    if !path.is_file() {
        return Ok(HashMap::new());
    }
    let vars = dotenvy::from_path_iter(path)
        .with_context(|| format!("Failed to read {}", path.display()))?
        .collect::<Result<HashMap<_, _>, _>>()
        .with_context(|| format!("Malformed dotenv file {}", path.display()))?;
    log::debug!("Loaded {} variables from {}", vars.len(), path.display());
    Ok(vars)
}
