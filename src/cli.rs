//! # Command-Line Interface Module
//!
//! Clap derive definitions for the `autotracks` binary.
//!
//! ## Examples
//!
//! ```bash
//! autotracks generate mix.m3u ~/Music/incoming
//! autotracks analyse --json ~/Music/incoming
//! autotracks key 8A Em
//! ```

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};

use crate::config::Config;
use crate::strategy::StrategyKind;

/// Shell types supported for completion generation
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[derive(Parser, Debug)]
#[command(name = "autotracks")]
#[command(about = "Generate harmonic-mixing playlists from your tracks' key and tempo")]
#[command(version)]
pub struct Args {
    /// Log debug output (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command that loads tracks.
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct LoadArgs {
    /// Audio files, `.meta` records or directories to scan
    #[arg(required = true, value_hint = clap::ValueHint::AnyPath)]
    pub paths: Vec<PathBuf>,

    /// Descend into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Parallel analysis jobs (default: one per CPU)
    #[arg(short = 'j', long)]
    pub workers: Option<usize>,

    /// Path to the bpm-tag executable
    #[arg(long, value_name = "PATH", value_hint = clap::ValueHint::ExecutablePath)]
    pub bpm_tag: Option<String>,

    /// Path to the keyfinder-cli executable
    #[arg(long, value_name = "PATH", value_hint = clap::ValueHint::ExecutablePath)]
    pub keyfinder_cli: Option<String>,

    /// Hide the analysis progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl LoadArgs {
    /// Layer these flags over `config`.
    pub fn apply(&self, config: &mut Config) {
        if let Some(bpm_tag) = &self.bpm_tag {
            config.bpm_tag.clone_from(bpm_tag);
        }
        if let Some(keyfinder_cli) = &self.keyfinder_cli {
            config.keyfinder_cli.clone_from(keyfinder_cli);
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        config.recursive |= self.recursive;
        if self.no_progress || self.json {
            config.show_progress = false;
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the longest harmonically compatible playlist and write it as m3u
    ///
    /// Tracks without a `.meta` record are analysed with bpm-tag and
    /// keyfinder-cli first, and the record is written next to them.
    Generate {
        /// Output playlist filename, including extension
        #[arg(value_hint = clap::ValueHint::FilePath)]
        playlist: PathBuf,

        /// Search strategy
        #[arg(short, long, value_enum, default_value_t = StrategyKind::Dfs)]
        strategy: StrategyKind,

        #[command(flatten)]
        load: LoadArgs,
    },

    /// Analyse tracks, fill the metadata cache and list key and tempo
    #[command(alias = "analyze")]
    Analyse {
        #[command(flatten)]
        load: LoadArgs,
    },

    /// Show a key in every notation with its compatible keys
    Key {
        /// Key in standard, short, Camelot or Open Key notation
        notation: String,

        /// Check compatibility against this key
        other: Option<String>,
    },

    /// Generate shell completions
    ///
    /// Usage: autotracks completion bash > ~/.local/share/bash-completion/completions/autotracks
    Completion {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_generate_with_flags() {
        let args = Args::try_parse_from([
            "autotracks", "-v", "generate", "mix.m3u", "a.flac", "dir", "--strategy", "empty",
            "--recursive", "-j", "4", "--bpm-tag", "/opt/bpm-tag", "--no-progress",
        ])
        .unwrap();
        assert!(args.verbose);

        let Command::Generate { playlist, strategy, load } = args.command else {
            panic!("expected generate");
        };
        assert_eq!(playlist, PathBuf::from("mix.m3u"));
        assert_eq!(strategy, StrategyKind::Empty);
        assert_eq!(load.paths, [PathBuf::from("a.flac"), PathBuf::from("dir")]);
        assert_eq!(load.workers, Some(4));

        let mut config = Config::default();
        load.apply(&mut config);
        assert_eq!(config.bpm_tag, "/opt/bpm-tag");
        assert_eq!(config.keyfinder_cli, "keyfinder-cli");
        assert_eq!(config.workers, 4);
        assert!(config.recursive);
        assert!(!config.show_progress);
    }

    #[test]
    fn generate_needs_paths() {
        assert!(Args::try_parse_from(["autotracks", "generate", "mix.m3u"]).is_err());
    }

    #[test]
    fn key_takes_an_optional_second_notation() {
        let args = Args::try_parse_from(["autotracks", "key", "8A"]).unwrap();
        assert!(matches!(args.command, Command::Key { other: None, .. }));
        let args = Args::try_parse_from(["autotracks", "key", "8A", "Em"]).unwrap();
        assert!(matches!(args.command, Command::Key { other: Some(_), .. }));
    }
}
