//! Console collaborators: stdin contributions and stdout announcements.

use async_trait::async_trait;
use fair_dice_core::games::Purpose;
use fair_dice_core::protocol::{
    Announcer, ContributionSource, Decision, Range, Reply, Revealed, RunId,
};
use fair_dice_core::{Commitment, FairError, GameEvent, Narrator, Player};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};

/// One line typed at the prompt
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Cancel,
    Help,
    Value(String),
}

impl Input {
    /// End of input counts as leaving
    fn classify(line: Option<&str>) -> Self {
        match line.map(str::trim) {
            None => Input::Cancel,
            Some(s) if s.eq_ignore_ascii_case("x") => Input::Cancel,
            Some("?") => Input::Help,
            Some(s) => Input::Value(s.to_string()),
        }
    }
}

/// Reads contributions line by line, normally from stdin
///
/// The reader is opened once and lives as long as the source, so prompts
/// repeated after help never stack up extra handles. Bytes that are not
/// UTF-8 are decoded lossily and rejected like any other bad number.
pub struct ConsoleSource<R = BufReader<Stdin>> {
    reader: R,
    buf: Vec<u8>,
    on_invalid: Decision,
    help: String,
}

impl ConsoleSource {
    pub fn stdin(on_invalid: Decision, help: String) -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), on_invalid, help)
    }
}

impl<R: AsyncBufRead + Unpin + Send> ConsoleSource<R> {
    pub fn new(reader: R, on_invalid: Decision, help: String) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            on_invalid,
            help,
        }
    }

    /// `None` at end of input
    async fn next_line(&mut self) -> std::io::Result<Option<String>> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf).await? == 0 {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&self.buf).into_owned()))
    }
}

fn prompt(range: Range) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    write!(
        stdout,
        "Enter a number between 0 and {}, X (exit), or ? (help): ",
        range.max_value()
    )?;
    stdout.flush()
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> ContributionSource for ConsoleSource<R> {
    async fn request(&mut self, range: Range) -> fair_dice_core::Result<Reply> {
        loop {
            prompt(range).map_err(|e| FairError::Source(e.to_string()))?;
            let line = self
                .next_line()
                .await
                .map_err(|e| FairError::Source(e.to_string()))?;

            match Input::classify(line.as_deref()) {
                Input::Cancel => return Ok(Reply::Cancel),
                Input::Help => {
                    println!(
                        "Enter any whole number from 0 to {}. It is added to my secret number \
                         modulo {}, so neither of us controls the result alone.",
                        range.max_value(),
                        range.get()
                    );
                    println!("{}", self.help);
                }
                Input::Value(value) => return Ok(Reply::Text(value)),
            }
        }
    }

    fn on_rejected(&mut self, _error: &FairError) -> Decision {
        self.on_invalid
    }
}

/// Prints commitments and reveals
#[derive(Debug, Default)]
pub struct ConsoleAnnouncer;

impl Announcer for ConsoleAnnouncer {
    fn committed(&mut self, _run_id: RunId, commitment: &Commitment, range: Range) {
        println!(
            "I selected a random value in the range {} (HMAC={}).",
            range, commitment
        );
    }

    fn rejected(&mut self, error: &FairError) {
        println!("Invalid input: {error}.");
    }

    fn revealed(&mut self, revealed: &Revealed) {
        println!("My number is {} (KEY={}).", revealed.secret, revealed.key);
        println!(
            "The fair number generation result is {} + {} = {} (mod {}).",
            revealed.secret,
            revealed.contribution,
            revealed.final_value,
            revealed.range.get()
        );
        println!(
            "Check: HMAC-SHA3-256(key as text, \"{}\") == {}",
            revealed.secret, revealed.commitment
        );
    }
}

/// Prints game progress
#[derive(Debug, Default)]
pub struct ConsoleNarrator;

impl Narrator for ConsoleNarrator {
    fn narrate(&mut self, event: &GameEvent) {
        match event {
            GameEvent::ExchangeStarted { purpose, .. } => match purpose {
                Purpose::MoveOrder => println!("Let's determine who makes the first move."),
                Purpose::DieSelection => println!("Let's draw your die."),
                Purpose::Roll(Player::User) => println!("It's time for your roll."),
                Purpose::Roll(Player::Computer) => println!("It's time for my roll."),
            },
            GameEvent::MoveOrder { first } => match first {
                Player::User => println!("You make the first move."),
                Player::Computer => println!("I make the first move."),
            },
            GameEvent::DieChosen { player, index, die } => match player {
                Player::User => println!("You get die {} {}.", index + 1, die),
                Player::Computer => println!("I choose die {} {}.", index + 1, die),
            },
            GameEvent::Rolled { player, face } => match player {
                Player::User => println!("Your roll result is {face}."),
                Player::Computer => println!("My roll result is {face}."),
            },
            GameEvent::Finished { outcome } => println!("{outcome}!"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fair_dice_core::protocol::RecordingAnnouncer;
    use fair_dice_core::{FairValueProtocol, FixedEntropy};

    fn source(input: &'static [u8], on_invalid: Decision) -> ConsoleSource<&'static [u8]> {
        ConsoleSource::new(input, on_invalid, "help table".into())
    }

    #[test]
    fn test_classify_exit() {
        assert_eq!(Input::classify(Some("X")), Input::Cancel);
        assert_eq!(Input::classify(Some(" x ")), Input::Cancel);
        assert_eq!(Input::classify(None), Input::Cancel);
    }

    #[test]
    fn test_classify_help() {
        assert_eq!(Input::classify(Some("?")), Input::Help);
    }

    #[test]
    fn test_classify_passes_raw_values_through() {
        assert_eq!(Input::classify(Some(" 4\n")), Input::Value("4".into()));
        assert_eq!(Input::classify(Some("abc")), Input::Value("abc".into()));
        assert_eq!(Input::classify(Some("")), Input::Value(String::new()));
    }

    #[tokio::test]
    async fn test_help_loops_until_a_value() {
        let mut source = source(b"?\nabc\n3\n", Decision::Retry);
        let range = Range::new(6).unwrap();

        assert_eq!(source.request(range).await.unwrap(), Reply::Text("abc".into()));
        assert_eq!(source.request(range).await.unwrap(), Reply::Text("3".into()));
        assert_eq!(source.request(range).await.unwrap(), Reply::Cancel);
    }

    #[tokio::test]
    async fn test_end_of_input_cancels() {
        let mut source = source(b"", Decision::Retry);

        assert_eq!(source.request(Range::COIN).await.unwrap(), Reply::Cancel);
    }

    #[tokio::test]
    async fn test_last_line_without_newline() {
        let mut source = source(b"4", Decision::Retry);

        assert_eq!(source.request(Range::new(6).unwrap()).await.unwrap(), Reply::Text("4".into()));
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_rejected_then_retried() {
        let mut source = source(b"\xff\xfe\n2\n", Decision::Retry);
        let mut announcer = RecordingAnnouncer::new();
        let mut protocol = FairValueProtocol::with_entropy(FixedEntropy::new([3]));

        let revealed = protocol
            .run(Range::new(6).unwrap(), &mut source, &mut announcer)
            .await
            .unwrap();

        assert_eq!(revealed.contribution, 2);
        assert_eq!(revealed.final_value, 5);
        assert_eq!(announcer.commitments().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_utf8_aborts_under_abort_policy() {
        let mut source = source(b"\xff\xfe\n", Decision::Abort);
        let mut announcer = RecordingAnnouncer::new();
        let mut protocol = FairValueProtocol::with_entropy(FixedEntropy::new([3]));

        let err = protocol
            .run(Range::new(6).unwrap(), &mut source, &mut announcer)
            .await
            .unwrap_err();

        match err {
            FairError::OutOfRange { input, range } => {
                assert!(input.contains('\u{FFFD}'));
                assert_eq!(range, 6);
            }
            other => panic!("expected OutOfRange, got {other:?}"),
        }
        assert!(announcer.reveals().is_empty());
    }
}
