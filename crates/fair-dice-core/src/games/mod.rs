//! Dice definitions and the game played with fair exchanges.

mod dice;
mod flow;
mod probability;
mod types;

pub use dice::{parse_dice, Die, FACES_PER_DIE, MIN_DICE};
pub use flow::{DiceGame, Exchange, GameEvent, GameReport, Narrator, Purpose};
pub use probability::{win_probability, ProbabilityTable};
pub use types::{Outcome, Player};
