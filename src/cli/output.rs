//! Output formatting utilities for CLI.

use orbclash::autoplay::{BatchStats, GameResult};
use serde::Serialize;
use std::fmt::Write as _;

/// Format a single game result as human-readable text.
pub(super) fn format_result_text(result: &GameResult) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Game Result (seed: {})", result.seed);
    let _ = writeln!(output, "  Outcome: {}", result.outcome);
    let _ = writeln!(output, "  Turns: {}", result.turns);
    let _ = writeln!(output, "  Enemies defeated: {}", result.enemies_defeated);
    let _ = writeln!(output, "  Reached level: {}", result.highest_level);
    let _ = writeln!(output, "  Longest combo: {}", result.max_combo);
    let _ = writeln!(output, "  Total damage: {}", result.total_damage);

    output
}

/// JSON-serializable batch summary.
#[derive(Debug, Serialize)]
pub(super) struct JsonBatchResult {
    /// First seed of the batch.
    base_seed: u64,
    /// Raw totals.
    stats: BatchStats,
    /// Mean turns per game.
    avg_turns: f64,
    /// Mean enemies defeated per game.
    avg_enemies_defeated: f64,
    /// Share of games ending in defeat (0.0-1.0).
    defeat_rate: f64,
}

impl JsonBatchResult {
    /// Create from stats.
    pub(super) fn from_stats(stats: &BatchStats, base_seed: u64) -> Self {
        Self {
            base_seed,
            stats: stats.clone(),
            avg_turns: stats.mean_turns(),
            avg_enemies_defeated: stats.mean_enemies_defeated(),
            defeat_rate: rate(stats.defeated, stats.games_played),
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn rate(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    count as f64 / total as f64
}

/// Format batch stats as human-readable text.
pub(super) fn format_stats_text(stats: &BatchStats, base_seed: u64) -> String {
    let mut output = String::new();
    let n = stats.games_played;

    let _ = writeln!(output, "Simulation Results ({n} games from seed {base_seed})");
    output.push_str("========================================\n\n");

    output.push_str("Outcomes:\n");
    for (label, count) in [
        ("Defeated", stats.defeated),
        ("Survived", stats.survived),
        ("Stuck", stats.stuck),
    ] {
        let _ = writeln!(output, "  {label}: {count} ({:.1}%)", rate(count, n) * 100.0);
    }

    let _ = writeln!(output, "\nAverage game length: {:.1} turns", stats.mean_turns());
    let _ = writeln!(output, "Average enemies defeated: {:.2}", stats.mean_enemies_defeated());
    let _ = writeln!(output, "Longest combo: {}", stats.max_combo);
    if let Some((level, seed)) = stats.best {
        let _ = writeln!(output, "Best run: level {level} (seed {seed})");
    }

    output
}

/// Format batch stats as a one-row CSV.
pub(super) fn format_stats_csv(stats: &BatchStats, base_seed: u64) -> String {
    let mut output = String::new();

    output.push_str(
        "base_seed,games,defeated,survived,stuck,avg_turns,avg_enemies_defeated,max_combo,best_level,best_seed\n",
    );
    let (best_level, best_seed) = stats.best.map_or((String::new(), String::new()), |(l, s)| {
        (l.to_string(), s.to_string())
    });
    let _ = writeln!(
        output,
        "{base_seed},{},{},{},{},{:.2},{:.3},{},{best_level},{best_seed}",
        stats.games_played,
        stats.defeated,
        stats.survived,
        stats.stuck,
        stats.mean_turns(),
        stats.mean_enemies_defeated(),
        stats.max_combo,
    );

    output
}
