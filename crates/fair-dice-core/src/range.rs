//! Number of equally likely outcomes for one exchange.

use crate::error::{FairError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU64;

/// Positive number of outcomes; values live in `0..range`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct Range(NonZeroU64);

impl Range {
    /// Two outcomes, for binary decisions like who moves first
    pub const COIN: Range = Range(match NonZeroU64::new(2) {
        Some(n) => n,
        None => unreachable!(),
    });

    /// Create a range, rejecting zero
    pub fn new(outcomes: u64) -> Result<Self> {
        NonZeroU64::new(outcomes)
            .map(Self)
            .ok_or(FairError::InvalidRange(0))
    }

    /// Number of outcomes
    pub fn get(&self) -> u64 {
        self.0.get()
    }

    /// Is the value one of the outcomes?
    pub fn contains(&self, value: i64) -> bool {
        u64::try_from(value).is_ok_and(|v| v < self.get())
    }

    /// Largest outcome
    pub fn max_value(&self) -> u64 {
        self.get() - 1
    }
}

impl TryFrom<u64> for Range {
    type Error = FairError;

    fn try_from(outcomes: u64) -> Result<Self> {
        Self::new(outcomes)
    }
}

impl TryFrom<i64> for Range {
    type Error = FairError;

    fn try_from(outcomes: i64) -> Result<Self> {
        match u64::try_from(outcomes) {
            Ok(n) if n > 0 => Self::new(n),
            _ => Err(FairError::InvalidRange(outcomes)),
        }
    }
}

impl TryFrom<usize> for Range {
    type Error = FairError;

    fn try_from(outcomes: usize) -> Result<Self> {
        Self::new(outcomes as u64)
    }
}

impl From<Range> for u64 {
    fn from(range: Range) -> u64 {
        range.get()
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0..={}", self.max_value())
    }
}
