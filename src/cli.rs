//! CLI command implementations for Orbclash.

pub(crate) mod auto;
pub(crate) mod play;
pub(crate) mod replay;
pub(crate) mod simulate;

mod output;
mod tui;

use clap::ValueEnum;
use orbclash::config::GameConfig;
use orbclash::error::ConfigError;
use orbclash::replay::ReplayError;
use std::error::Error;
use std::fmt;
use std::path::Path;

/// Output format for the `auto` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Output format for the `replay` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum ReplayFormat {
    /// Interactive TUI.
    Tui,
    /// Colored board per step.
    Ascii,
    /// Plain structured text per step.
    Text,
    /// Snapshot at one step as JSON.
    Json,
}

/// Output format for the `simulate` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum SimulateFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
    /// CSV format.
    Csv,
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<ReplayError> for CliError {
    fn from(e: ReplayError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(format!("JSON serialization failed: {e}"))
    }
}

/// Load a ruleset from `path`, or the defaults.
pub(crate) fn load_config(path: Option<&Path>) -> Result<GameConfig, CliError> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    GameConfig::load(path)
        .map_err(|e| CliError::new(format!("Failed to load config {}: {e}", path.display())))
}

/// Use the given seed or derive one from the clock.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42)
    })
}
