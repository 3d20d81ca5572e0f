//! # autotracks
//!
//! ```bash
//! # Analyse a folder and write the longest compatible mix
//! autotracks generate mix.m3u /path/to/tracks
//!
//! # Fill the metadata cache only
//! autotracks analyse /path/to/tracks
//!
//! # Which keys mix with A minor?
//! autotracks key Am
//! ```

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use autotracks::cli::{self, Command, LoadArgs};
use autotracks::completion;
use autotracks::config::Config;
use autotracks::error::NotEnoughTracksError;
use autotracks::generator::PlaylistGenerator;
use autotracks::key;
use autotracks::report::{LibraryReport, Report};
use autotracks::scorer::ByBpm;
use autotracks::strategy::StrategyKind;
use clap::{CommandFactory, Parser};
use log::{debug, info};

/// `EX_DATAERR` from sysexits.h
const EXIT_NOT_ENOUGH_TRACKS: u8 = 65;

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn load_config(load: &LoadArgs) -> Result<Config> {
    let mut config = Config::load()?;
    load.apply(&mut config);
    debug!("Configuration: {config:?}");
    Ok(config)
}

fn generate(playlist_path: &Path, kind: StrategyKind, load: &LoadArgs) -> Result<()> {
    let config = load_config(load)?;
    let generator = PlaylistGenerator::from_paths(&load.paths, &config)?;
    let strategy = kind.build(Arc::new(ByBpm));

    let playlist = generator.run(strategy.as_ref())?;
    generator.write_playlist(&playlist, playlist_path)?;

    let score = strategy.score_playlist(&playlist);
    let unused = generator.unused_tracks(&playlist);
    let report = Report::new(
        &playlist,
        score,
        unused.iter().map(|track| &**track),
        generator.errors(),
    );

    if load.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.to_text());
        println!("\nWrote {}", playlist_path.display());
    }
    Ok(())
}

fn analyse(load: &LoadArgs) -> Result<()> {
    let config = load_config(load)?;
    let generator = PlaylistGenerator::from_paths(&load.paths, &config)?;
    let report = LibraryReport::new(generator.library());

    if load.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.to_text());
    }
    Ok(())
}

fn show_key(notation: &str, other: Option<&str>) -> Result<()> {
    let base = key::lookup(notation)?;
    println!(
        "{} / {} / {} / {}",
        base.standard, base.short, base.camelot, base.open_key
    );

    let (relative, previous, next) = key::compatible_keys(&base);
    println!("  relative: {} ({})", relative, relative.camelot);
    println!("  previous: {} ({})", previous, previous.camelot);
    println!("  next:     {} ({})", next, next.camelot);

    if let Some(other) = other {
        let other = key::lookup(other)?;
        let verdict = if key::is_neighbour(&base, &other) {
            "compatible"
        } else {
            "not compatible"
        };
        println!("{base} -> {other}: {verdict}");
    }
    Ok(())
}

fn run(args: cli::Args) -> Result<()> {
    match args.command {
        Command::Generate {
            playlist,
            strategy,
            load,
        } => {
            info!("Generating {} with {strategy:?}", playlist.display());
            generate(&playlist, strategy, &load)?;
        }
        Command::Analyse { load } => analyse(&load)?,
        Command::Key { notation, other } => show_key(&notation, other.as_deref())?,
        Command::Completion { shell } => {
            let mut cmd = cli::Args::command();
            completion::generate_completions(completion::shell_to_completion_shell(shell), &mut cmd);
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = cli::Args::parse();
    init_logging(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("Error: {error:#}");
            if error.downcast_ref::<NotEnoughTracksError>().is_some() {
                ExitCode::from(EXIT_NOT_ENOUGH_TRACKS)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}
