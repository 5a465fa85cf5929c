//! Simulate command implementation - mass headless games.

use super::output::{format_stats_csv, format_stats_text, JsonBatchResult};
use super::{load_config, resolve_seed, CliError, SimulateFormat};
use indicatif::{ProgressBar, ProgressStyle};
use orbclash::autoplay::simulate;
use std::path::PathBuf;
use std::time::Instant;

/// Execute the simulate command.
///
/// # Errors
///
/// Returns an error if the config is invalid or output fails.
#[allow(clippy::needless_pass_by_value)]
pub(crate) fn execute(
    games: u64,
    seed: Option<u64>,
    threads: Option<usize>,
    max_turns: u32,
    config: Option<PathBuf>,
    format: SimulateFormat,
    progress: bool,
) -> Result<(), CliError> {
    let config = load_config(config.as_deref())?;

    // Set thread pool size if specified
    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let base_seed = resolve_seed(seed);

    let pb = if progress {
        let pb = ProgressBar::new(games);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} games")
            .map_err(|e| CliError::new(e.to_string()))?
            .progress_chars("=>-");
        pb.set_style(style);
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();
    let stats = simulate(config, base_seed, games, max_turns)?;

    // Update progress bar after completion (no atomic overhead in hot path)
    if let Some(pb) = pb {
        pb.set_position(stats.games_played);
        pb.finish_with_message("done");
    }

    let duration = start.elapsed();

    match format {
        SimulateFormat::Text => {
            println!();
            print!("{}", format_stats_text(&stats, base_seed));
            println!();
            println!("Duration: {:.2}s", duration.as_secs_f64());
        }
        SimulateFormat::Json => {
            let json = serde_json::to_string_pretty(&JsonBatchResult::from_stats(&stats, base_seed))?;
            println!("{json}");
        }
        SimulateFormat::Csv => {
            print!("{}", format_stats_csv(&stats, base_seed));
        }
    }

    Ok(())
}
