//! Dice definitions parsed from the command line.

use crate::error::DiceError;
use crate::range::Range;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Every die has this many faces
pub const FACES_PER_DIE: usize = 6;

/// A game needs at least this many dice
pub const MIN_DICE: usize = 2;

/// A die with arbitrary integer faces, e.g. `2,2,4,4,9,9`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<i64>", into = "Vec<i64>")]
pub struct Die {
    faces: Vec<i64>,
}

impl Die {
    /// Create a die; `number` is its 1-based position for error messages
    pub fn new(number: usize, faces: Vec<i64>) -> Result<Self, DiceError> {
        if faces.len() != FACES_PER_DIE {
            return Err(DiceError::WrongFaceCount {
                die: number,
                found: faces.len(),
                expected: FACES_PER_DIE,
            });
        }
        Ok(Self { faces })
    }

    /// Parse a comma-separated face list
    pub fn parse(number: usize, csv: &str) -> Result<Self, DiceError> {
        let faces = csv
            .split(',')
            .map(|face| {
                face.trim().parse::<i64>().map_err(|_| DiceError::InvalidFace {
                    die: number,
                    face: face.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(number, faces)
    }

    pub fn faces(&self) -> &[i64] {
        &self.faces
    }

    /// Face shown for a fair value in `0..self.range()`
    pub fn face(&self, index: u64) -> Option<i64> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.faces.get(i).copied())
    }

    /// One outcome per face
    pub fn range(&self) -> Range {
        Range::new(self.faces.len() as u64).expect("dice always have faces")
    }
}

impl TryFrom<Vec<i64>> for Die {
    type Error = DiceError;

    fn try_from(faces: Vec<i64>) -> Result<Self, DiceError> {
        Self::new(1, faces)
    }
}

impl From<Die> for Vec<i64> {
    fn from(die: Die) -> Vec<i64> {
        die.faces
    }
}

impl fmt::Display for Die {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let faces: Vec<String> = self.faces.iter().map(i64::to_string).collect();
        write!(f, "[{}]", faces.join(","))
    }
}

/// Parse one die per argument
pub fn parse_dice<I, S>(args: I) -> Result<Vec<Die>, DiceError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let dice = args
        .into_iter()
        .enumerate()
        .map(|(i, arg)| Die::parse(i + 1, arg.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;

    if dice.len() < MIN_DICE {
        return Err(DiceError::NotEnoughDice {
            min: MIN_DICE,
            found: dice.len(),
        });
    }
    Ok(dice)
}
