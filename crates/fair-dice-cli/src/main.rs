//! Fair Dice
//!
//! Console dice game where move order, die selection and every roll are
//! settled by a commit-then-reveal fair value exchange.

mod config;
mod console;
mod render;

use clap::{CommandFactory, Parser, Subcommand};
use config::Config;
use console::{ConsoleAnnouncer, ConsoleNarrator, ConsoleSource};
use fair_dice_core::games::parse_dice;
use fair_dice_core::{Commitment, DiceError, DiceGame, FairError, GameError, Key};
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "fair-dice")]
#[command(about = "Dice game where every random draw is a provably fair exchange")]
#[command(version)]
#[command(arg_required_else_help = true, args_conflicts_with_subcommands = true)]
#[command(after_help = "Example:\n  fair-dice 2,2,4,4,9,9 6,8,1,1,8,6 7,5,3,7,5,3\n\n\
    Logs go to stderr, filtered by RUST_LOG (default warn).")]
struct Cli {
    #[command(subcommand)]
    command: Option<Cmd>,

    /// Dice to play with, each six comma-separated integers; put `--` first
    /// if a die starts with a negative face
    #[arg(value_name = "DIE")]
    dice: Vec<String>,

    #[command(flatten)]
    config: Config,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Check a revealed exchange
    Verify {
        /// Revealed key, 64 hex characters
        key: Key,
        /// Revealed secret number
        secret: u64,
        /// Published HMAC, 64 hex characters
        commitment: Commitment,
    },
}

/// Application error type
#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Game(#[from] GameError),

    #[error(transparent)]
    Fair(#[from] FairError),

    #[error(transparent)]
    Dice(#[from] DiceError),

    #[error("MISMATCH: the key and secret do not produce this commitment")]
    Mismatch,

    #[error("failed to encode report: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to write report {}: {source}", .path.display())]
    Report {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl CliError {
    fn is_cancelled(&self) -> bool {
        match self {
            CliError::Game(e) => e.is_cancelled(),
            CliError::Fair(FairError::Cancelled) => true,
            _ => false,
        }
    }
}

async fn play(dice_args: &[String], config: &Config) -> Result<(), CliError> {
    let dice = parse_dice(dice_args)?;
    let mut game = DiceGame::new(dice)?;
    let table = render::probability_table(game.dice(), game.table());
    if config.show_table {
        println!("{table}");
    }

    let mut source = ConsoleSource::stdin(config.decision(), table);
    let report = game
        .play(&mut source, &mut ConsoleAnnouncer, &mut ConsoleNarrator)
        .await?;

    if let Some(path) = &config.report {
        tokio::fs::write(path, report.to_json()?)
            .await
            .map_err(|source| CliError::Report {
                path: path.clone(),
                source,
            })?;
        info!(path = %path.display(), exchanges = report.exchanges.len(), "report written");
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Some(Cmd::Verify {
            key,
            secret,
            commitment,
        }) => {
            if !commitment.verify(&key, secret) {
                return Err(CliError::Mismatch);
            }
            println!("OK: the key and secret match the commitment.");
            Ok(())
        }
        None => play(&cli.dice, &cli.config).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so they never interleave with the prompts
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!(config = ?cli.config, "starting");

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_cancelled() => {
            println!("Game aborted. The open exchange was not revealed.");
            ExitCode::from(2)
        }
        Err(e) => {
            eprintln!("Error: {e}");
            if matches!(e, CliError::Dice(_)) {
                eprintln!("{}", Cli::command().render_usage());
            }
            ExitCode::FAILURE
        }
    }
}
