//! Error types for configuration loading and board fixtures.

use std::fmt;

/// Why a [`GameConfig`](crate::config::GameConfig) was rejected.
#[derive(Debug)]
pub enum ConfigError {
    /// A numeric field is outside its playable range.
    OutOfRange {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: u64,
        /// Human-readable description of the accepted range.
        expected: &'static str,
    },
    /// The config file could not be read.
    Io(std::io::Error),
    /// The config file is not valid JSON for a config.
    Json(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange {
                field,
                value,
                expected,
            } => write!(f, "config field `{field}` = {value} (expected {expected})"),
            Self::Io(e) => write!(f, "failed to read config: {e}"),
            Self::Json(e) => write!(f, "failed to parse config: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::OutOfRange { .. } => None,
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

/// Failure to parse a board from its text form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardParseError {
    /// The text contained no rows.
    Empty,
    /// A row's length differs from the first row.
    RaggedRow {
        /// Zero-based row index.
        row: usize,
        /// Expected column count.
        expected: usize,
        /// Actual column count.
        found: usize,
    },
    /// A character is not an orb letter or `.`.
    UnknownOrb {
        /// Zero-based row index.
        row: usize,
        /// Zero-based column index.
        col: usize,
        /// The offending character.
        ch: char,
    },
}

impl fmt::Display for BoardParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "board text has no rows"),
            Self::RaggedRow {
                row,
                expected,
                found,
            } => write!(f, "row {row} has {found} cells, expected {expected}"),
            Self::UnknownOrb { row, col, ch } => {
                write!(f, "unknown orb {ch:?} at row {row}, column {col}")
            }
        }
    }
}

impl std::error::Error for BoardParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_display() {
        let err = ConfigError::OutOfRange {
            field: "colors",
            value: 2,
            expected: "3..=6",
        };
        let msg = err.to_string();
        assert!(msg.contains("colors"));
        assert!(msg.contains("3..=6"));
    }

    #[test]
    fn test_parse_error_display() {
        let err = BoardParseError::UnknownOrb {
            row: 1,
            col: 2,
            ch: 'x',
        };
        assert_eq!(err.to_string(), "unknown orb 'x' at row 1, column 2");
    }
}
