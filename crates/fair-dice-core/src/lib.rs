//! Fair Dice Core Library
//!
//! This crate provides the commitment primitives, the two-party fair value
//! exchange, and the dice game built on top of it.

pub mod crypto;
pub mod error;
pub mod games;
pub mod protocol;
mod range;

pub use crypto::{Commitment, EntropySource, FixedEntropy, Key, OsEntropy};
pub use error::{DiceError, FairError, GameError, Result};
pub use games::{DiceGame, Die, GameEvent, GameReport, Narrator, Outcome, Player, ProbabilityTable};
pub use protocol::{
    Announcer, Committed, Contributed, ContributionSource, Decision, FairValueProtocol, Range,
    Reply, Revealed, RunId,
};
