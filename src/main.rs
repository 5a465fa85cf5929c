//! Orbclash CLI - play, watch and analyse match-3 battles.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use orbclash::autoplay::DEFAULT_MAX_TURNS;
use std::path::PathBuf;
use std::process::ExitCode;

/// Orbclash - a deterministic match-3 battler
#[derive(Parser, Debug)]
#[command(name = "orbclash")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Play interactively in the terminal
    Play {
        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Ruleset JSON file (default: built-in rules)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Pause between cascade steps in milliseconds
        #[arg(long)]
        delay: Option<u64>,

        /// Save a recording on exit
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// Let the greedy policy play one game
    Auto {
        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Ruleset JSON file (default: built-in rules)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Maximum productive swaps
        #[arg(short, long, default_value_t = DEFAULT_MAX_TURNS)]
        turns: u32,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Save recording to file
        #[arg(long)]
        save: Option<PathBuf>,

        /// Suppress turn-by-turn output
        #[arg(short, long)]
        quiet: bool,
    },

    /// Run many headless games in parallel and aggregate statistics
    Simulate {
        /// Number of games to run
        #[arg(short, long, default_value = "1000")]
        games: u64,

        /// Starting seed (increments for each game)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Maximum productive swaps per game
        #[arg(short = 't', long = "turns", default_value_t = DEFAULT_MAX_TURNS)]
        max_turns: u32,

        /// Ruleset JSON file (default: built-in rules)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format: text, json, or csv
        #[arg(short, long, default_value = "text")]
        format: cli::SimulateFormat,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,
    },

    /// Replay a recorded game
    Replay {
        /// Recording file (JSON)
        #[arg(required = true)]
        recording: PathBuf,

        /// Output format: tui, ascii, text, or json
        #[arg(short, long, default_value = "tui")]
        format: cli::ReplayFormat,

        /// Position after this many actions (json default: the end)
        #[arg(long)]
        step: Option<usize>,
    },
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let result = match args.command {
        Commands::Play {
            seed,
            config,
            delay,
            save,
        } => cli::play::execute(seed, config, delay, save),

        Commands::Auto {
            seed,
            config,
            turns,
            format,
            save,
            quiet,
        } => cli::auto::execute(seed, config, turns, format, save, quiet),

        Commands::Simulate {
            games,
            seed,
            threads,
            max_turns,
            config,
            format,
            progress,
        } => cli::simulate::execute(games, seed, threads, max_turns, config, format, progress),

        Commands::Replay {
            recording,
            format,
            step,
        } => cli::replay::execute(recording, format, step),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
