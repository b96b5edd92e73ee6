//! Game flow: move order, die selection, and rolls, each settled by a fair exchange.

use super::{Die, Outcome, Player, ProbabilityTable, MIN_DICE};
use crate::crypto::{EntropySource, OsEntropy};
use crate::error::{DiceError, GameError};
use crate::protocol::{Announcer, ContributionSource, FairValueProtocol, Range, Revealed};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Why an exchange is being run
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Purpose {
    MoveOrder,
    DieSelection,
    Roll(Player),
}

/// One settled exchange and what it decided
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exchange {
    pub purpose: Purpose,
    pub revealed: Revealed,
}

/// Progress of a game, for display
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    ExchangeStarted { purpose: Purpose, range: Range },
    MoveOrder { first: Player },
    DieChosen { player: Player, index: usize, die: Die },
    Rolled { player: Player, face: i64 },
    Finished { outcome: Outcome },
}

/// Receives game events as they happen
pub trait Narrator: Send {
    fn narrate(&mut self, event: &GameEvent);
}

impl Narrator for Vec<GameEvent> {
    fn narrate(&mut self, event: &GameEvent) {
        self.push(event.clone());
    }
}

/// Everything needed to audit a finished game
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameReport {
    pub dice: Vec<Die>,
    pub first: Player,
    pub user_die: usize,
    pub computer_die: usize,
    pub user_roll: i64,
    pub computer_roll: i64,
    pub outcome: Outcome,
    pub exchanges: Vec<Exchange>,
}

impl GameReport {
    /// Check every disclosed commitment and combined value
    pub fn verify_all(&self) -> bool {
        self.exchanges.iter().all(|e| e.revealed.verify())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// A game between the user and the computer
pub struct DiceGame<E = OsEntropy> {
    dice: Vec<Die>,
    table: ProbabilityTable,
    protocol: FairValueProtocol<E>,
}

impl DiceGame<OsEntropy> {
    pub fn new(dice: Vec<Die>) -> Result<Self, GameError> {
        Self::with_entropy(dice, OsEntropy)
    }
}

impl<E: EntropySource + Send> DiceGame<E> {
    pub fn with_entropy(dice: Vec<Die>, entropy: E) -> Result<Self, GameError> {
        if dice.len() < MIN_DICE {
            return Err(DiceError::NotEnoughDice {
                min: MIN_DICE,
                found: dice.len(),
            }
            .into());
        }
        let table = ProbabilityTable::compute(&dice);
        Ok(Self {
            dice,
            table,
            protocol: FairValueProtocol::with_entropy(entropy),
        })
    }

    pub fn dice(&self) -> &[Die] {
        &self.dice
    }

    pub fn table(&self) -> &ProbabilityTable {
        &self.table
    }

    /// Play one game
    ///
    /// The first mover gets the first pick: a user moving first has their die
    /// drawn fairly from all dice and the computer answers with its best
    /// counter; otherwise the computer takes the strongest die and the user's
    /// die is drawn fairly from the rest. Rolls then follow move order.
    pub async fn play<S, A, N>(
        &mut self,
        source: &mut S,
        announcer: &mut A,
        narrator: &mut N,
    ) -> Result<GameReport, GameError>
    where
        S: ContributionSource + ?Sized,
        A: Announcer + ?Sized,
        N: Narrator + ?Sized,
    {
        let mut exchanges = Vec::new();

        let coin = self
            .exchange(
                Purpose::MoveOrder,
                Range::COIN,
                source,
                announcer,
                narrator,
                &mut exchanges,
            )
            .await?;
        let first = if coin == 0 { Player::User } else { Player::Computer };
        narrator.narrate(&GameEvent::MoveOrder { first });
        info!(?first, "move order decided");

        let (user_die, computer_die) = match first {
            Player::User => {
                let range = Range::try_from(self.dice.len())?;
                let pick = self
                    .exchange(
                        Purpose::DieSelection,
                        range,
                        source,
                        announcer,
                        narrator,
                        &mut exchanges,
                    )
                    .await? as usize;
                self.announce_die(narrator, Player::User, pick);

                let counter = self
                    .table
                    .best_counter(pick, &[])
                    .expect("a game has at least two dice");
                self.announce_die(narrator, Player::Computer, counter);
                (pick, counter)
            }
            Player::Computer => {
                let strongest = self.table.strongest();
                self.announce_die(narrator, Player::Computer, strongest);

                let remaining: Vec<usize> =
                    (0..self.dice.len()).filter(|&i| i != strongest).collect();
                let range = Range::try_from(remaining.len())?;
                let value = self
                    .exchange(
                        Purpose::DieSelection,
                        range,
                        source,
                        announcer,
                        narrator,
                        &mut exchanges,
                    )
                    .await?;
                let pick = remaining[value as usize];
                self.announce_die(narrator, Player::User, pick);
                (pick, strongest)
            }
        };

        let mut user_roll = 0;
        let mut computer_roll = 0;
        for player in [first, first.opponent()] {
            let index = match player {
                Player::User => user_die,
                Player::Computer => computer_die,
            };
            let range = self.dice[index].range();
            let value = self
                .exchange(
                    Purpose::Roll(player),
                    range,
                    source,
                    announcer,
                    narrator,
                    &mut exchanges,
                )
                .await?;
            let face = self.dice[index]
                .face(value)
                .expect("fair value lies within the die's faces");
            narrator.narrate(&GameEvent::Rolled { player, face });

            match player {
                Player::User => user_roll = face,
                Player::Computer => computer_roll = face,
            }
        }

        let outcome = Outcome::from_rolls(user_roll, computer_roll);
        narrator.narrate(&GameEvent::Finished { outcome });
        info!(%outcome, user_roll, computer_roll, "game finished");

        Ok(GameReport {
            dice: self.dice.clone(),
            first,
            user_die,
            computer_die,
            user_roll,
            computer_roll,
            outcome,
            exchanges,
        })
    }

    async fn exchange<S, A, N>(
        &mut self,
        purpose: Purpose,
        range: Range,
        source: &mut S,
        announcer: &mut A,
        narrator: &mut N,
        log: &mut Vec<Exchange>,
    ) -> Result<u64, GameError>
    where
        S: ContributionSource + ?Sized,
        A: Announcer + ?Sized,
        N: Narrator + ?Sized,
    {
        narrator.narrate(&GameEvent::ExchangeStarted { purpose, range });
        let revealed = self.protocol.run(range, source, announcer).await?;
        let value = revealed.final_value;
        log.push(Exchange { purpose, revealed });
        Ok(value)
    }

    fn announce_die<N: Narrator + ?Sized>(&self, narrator: &mut N, player: Player, index: usize) {
        narrator.narrate(&GameEvent::DieChosen {
            player,
            index,
            die: self.dice[index].clone(),
        });
    }
}
