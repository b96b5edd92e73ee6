//! Error types for fair value exchanges and the dice game.

use thiserror::Error;

/// Result type alias for protocol operations
pub type Result<T> = std::result::Result<T, FairError>;

/// Errors from the fair value protocol
#[derive(Debug, Error)]
pub enum FairError {
    /// Range must be a positive number of outcomes
    #[error("invalid range {0}: must be a positive integer")]
    InvalidRange(i64),

    /// Contribution was not an integer in [0, range)
    #[error("contribution {input:?} is not an integer in 0..={}", .range - 1)]
    OutOfRange { input: String, range: u64 },

    /// Secure randomness could not be obtained
    #[error("secure randomness unavailable: {0}")]
    EntropyUnavailable(String),

    /// Counterpart cancelled before contributing
    #[error("exchange cancelled before a contribution was made")]
    Cancelled,

    /// Collaborator I/O failure while waiting for a contribution
    #[error("contribution source failed: {0}")]
    Source(String),

    /// Hex input could not be decoded
    #[error("invalid hex for {what}: {reason}")]
    InvalidHex { what: &'static str, reason: String },
}

/// Errors from parsing dice definitions
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiceError {
    #[error("at least {min} dice are required, got {found}")]
    NotEnoughDice { min: usize, found: usize },

    #[error("die {die} has {found} faces, expected {expected}")]
    WrongFaceCount {
        die: usize,
        found: usize,
        expected: usize,
    },

    #[error("die {die} has a non-integer face {face:?}")]
    InvalidFace { die: usize, face: String },
}

/// Errors from playing a game
#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Fair(#[from] FairError),

    #[error(transparent)]
    Dice(#[from] DiceError),
}

impl GameError {
    /// Did the player walk away mid-exchange?
    pub fn is_cancelled(&self) -> bool {
        matches!(self, GameError::Fair(FairError::Cancelled))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_names_inclusive_bounds() {
        let err = FairError::OutOfRange {
            input: "6".into(),
            range: 6,
        };

        assert_eq!(err.to_string(), "contribution \"6\" is not an integer in 0..=5");
    }
}
