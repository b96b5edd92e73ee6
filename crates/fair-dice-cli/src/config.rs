//! Play settings, taken from flags or the environment.

use clap::{ArgAction, Args, ValueEnum};
use fair_dice_core::Decision;
use std::path::PathBuf;

/// What to do when a typed contribution is rejected
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OnInvalid {
    /// Ask again under the same commitment
    Retry,
    /// End the game
    Abort,
}

impl From<OnInvalid> for Decision {
    fn from(policy: OnInvalid) -> Self {
        match policy {
            OnInvalid::Retry => Decision::Retry,
            OnInvalid::Abort => Decision::Abort,
        }
    }
}

#[derive(Args, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Retry or abort on invalid input
    #[arg(
        long,
        env = "FAIR_DICE_ON_INVALID",
        value_enum,
        ignore_case = true,
        default_value = "retry"
    )]
    pub on_invalid: OnInvalid,

    /// Write a JSON report of every exchange to this path
    #[arg(long, env = "FAIR_DICE_REPORT")]
    pub report: Option<PathBuf>,

    /// Print the probability table before play
    #[arg(
        long,
        env = "FAIR_DICE_SHOW_TABLE",
        default_value_t = true,
        action = ArgAction::Set
    )]
    pub show_table: bool,
}

impl Config {
    pub fn decision(&self) -> Decision {
        self.on_invalid.into()
    }
}
