#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter for playing and sharing Blockslide levels.

mod level_file;
mod level_transfer;
mod play;
mod text;

use std::{
    io::{self, BufRead},
    path::PathBuf,
    process::ExitCode,
};

use anyhow::{Context, Result};
use blockslide_core::LevelDefinition;
use blockslide_session::{query, Config, Session};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::play::PlayOutcome;

#[derive(Debug, Parser)]
#[command(name = "blockslide")]
#[command(about = "Slide blocks onto their finish cells")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Play a level from a TOML file.
    Play {
        /// Level file to load.
        level: PathBuf,
        /// Comma-separated commands to run instead of reading stdin.
        #[arg(long)]
        script: Option<String>,
        /// Lock blocks once they first reach a finish cell.
        #[arg(long = "lock-finished")]
        lock_finished: bool,
        /// Let blocks cross invisibility tiles while they are hidden.
        #[arg(long = "hidden-tiles-passable")]
        hidden_tiles_passable: bool,
    },
    /// Validate a level file and print a summary.
    Check {
        /// Level file to validate.
        level: PathBuf,
    },
    /// Print a single-line share string for a level file.
    Export {
        /// Level file to encode.
        level: PathBuf,
    },
    /// Decode a share string back into a TOML level.
    Import {
        /// Share string produced by `export`.
        code: String,
        /// Write the level here instead of printing it.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

/// Entry point for the Blockslide command-line interface.
fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli.command) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::from(2)
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn run(command: Commands) -> Result<ExitCode> {
    match command {
        Commands::Play {
            level,
            script,
            lock_finished,
            hidden_tiles_passable,
        } => {
            let definition = level_file::load(&level)?;
            let config = Config::new()
                .with_lock_finished_blocks(lock_finished)
                .with_hidden_invisibility_passable(hidden_tiles_passable);
            let mut session = start(definition, config)?;
            info!(level = %level.display(), "starting level");

            let mut stdout = io::stdout().lock();
            let outcome = match script {
                Some(script) => {
                    play::run(&mut session, play::script_entries(&script), &mut stdout)?
                }
                None => {
                    let lines = io::stdin().lock().lines().map_while(io::Result::ok);
                    play::run(&mut session, lines, &mut stdout)?
                }
            };

            Ok(match outcome {
                PlayOutcome::Won => ExitCode::SUCCESS,
                PlayOutcome::NotSolved => ExitCode::FAILURE,
            })
        }
        Commands::Check { level } => {
            let definition = level_file::load(&level)?;
            let session = start(definition, Config::new())?;
            let definition = query::level(&session);
            let stars = definition.stars.map_or_else(
                || "off".to_owned(),
                |stars| format!("3 at {} moves, 2 at {}", stars.three, stars.two),
            );
            println!(
                "{}: {}x{}, {} blocks, {} tiles, {} moves, stars {stars}",
                level.display(),
                definition.width,
                definition.height,
                definition.blocks.len(),
                definition.tiles.len(),
                definition.moves,
            );
            Ok(ExitCode::SUCCESS)
        }
        Commands::Export { level } => {
            let definition = level_file::load(&level)?;
            let _ = start(definition.clone(), Config::new())?;
            let code = level_transfer::encode(&definition)?;
            println!("{code}");
            Ok(ExitCode::SUCCESS)
        }
        Commands::Import { code, output } => {
            let definition = level_transfer::decode(&code)?;
            let _ = start(definition.clone(), Config::new())?;
            match output {
                Some(path) => {
                    level_file::save(&path, &definition)?;
                    info!(path = %path.display(), "level written");
                }
                None => print!("{}", level_file::to_toml(&definition)?),
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn start(definition: LevelDefinition, config: Config) -> Result<Session> {
    let name = definition.name.clone();
    Session::new(definition, config).with_context(|| format!("level `{name}` is not playable"))
}
