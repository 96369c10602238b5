//! Error types for the ttt-mc crate

use std::fmt;

use thiserror::Error;

use crate::tictactoe::GameOutcome;

/// Why a move index was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveRejection {
    OutOfBounds,
    Occupied,
}

impl fmt::Display for MoveRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveRejection::OutOfBounds => write!(f, "is out of bounds (must be 0-8)"),
            MoveRejection::Occupied => write!(f, "is already occupied"),
        }
    }
}

/// Main error type for the ttt-mc crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid move: position {position} {reason}")]
    InvalidMove {
        position: usize,
        reason: MoveRejection,
    },

    #[error("no legal move available: game is already decided ({outcome})")]
    NoLegalMove { outcome: GameOutcome },

    #[error("malformed board: {reason}")]
    BoardInvariant { reason: String },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to {operation}: {message}")]
    SerializationContext { operation: String, message: String },

    #[error("unsupported value table format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Shorthand for a [`Error::BoardInvariant`] with a formatted reason.
    pub(crate) fn board(reason: impl Into<String>) -> Self {
        Error::BoardInvariant {
            reason: reason.into(),
        }
    }

    /// Shorthand for a [`Error::InvalidConfiguration`].
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Error::InvalidConfiguration {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_move_messages() {
        let occupied = Error::InvalidMove {
            position: 4,
            reason: MoveRejection::Occupied,
        };
        assert_eq!(
            occupied.to_string(),
            "invalid move: position 4 is already occupied"
        );

        let out_of_bounds = Error::InvalidMove {
            position: 12,
            reason: MoveRejection::OutOfBounds,
        };
        assert!(out_of_bounds.to_string().contains("out of bounds"));
    }

    #[test]
    fn test_no_legal_move_mentions_outcome() {
        let err = Error::NoLegalMove {
            outcome: GameOutcome::Draw,
        };
        assert!(err.to_string().contains("draw"));
    }
}
