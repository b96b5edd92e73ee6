//! Driving an exchange against external collaborators.

use super::state::Committed;
use super::{Range, Revealed, RunId};
use crate::crypto::{Commitment, EntropySource, OsEntropy};
use crate::error::{FairError, Result};
use async_trait::async_trait;
use tracing::{info, warn};

/// What the counterpart answered when asked for a contribution
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    /// An already-parsed number
    Number(i64),
    /// Raw input, validated by the protocol
    Text(String),
    /// Counterpart walked away
    Cancel,
}

/// What to do after a contribution is rejected
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    /// Ask again under the same commitment
    Retry,
    /// End the exchange with the rejection error
    Abort,
}

/// The counterpart supplying contributions
///
/// This is the exchange's single suspension point. Implementations can be:
/// - a console prompt
/// - a network peer
/// - `ScriptedSource` for testing
#[async_trait]
pub trait ContributionSource: Send {
    /// Wait for a value in `0..range`; only called after the commitment was announced
    async fn request(&mut self, range: Range) -> Result<Reply>;

    /// Retry policy for invalid input; the protocol itself never retries
    fn on_rejected(&mut self, _error: &FairError) -> Decision {
        Decision::Abort
    }
}

/// Receives what the counterpart is allowed to see, when they may see it
pub trait Announcer: Send {
    /// Commitment is published before any contribution is requested
    fn committed(&mut self, run_id: RunId, commitment: &Commitment, range: Range);

    /// A contribution was refused
    fn rejected(&mut self, _error: &FairError) {}

    /// Secret, key and final value, once the contribution is in
    fn revealed(&mut self, revealed: &Revealed);
}

/// Runs commit, contribute and reveal with fresh entropy on every call
#[derive(Debug, Default)]
pub struct FairValueProtocol<E = OsEntropy> {
    entropy: E,
}

impl FairValueProtocol<OsEntropy> {
    pub fn new() -> Self {
        Self { entropy: OsEntropy }
    }
}

impl<E: EntropySource + Send> FairValueProtocol<E> {
    /// Use a specific entropy source, e.g. `FixedEntropy` in tests
    pub fn with_entropy(entropy: E) -> Self {
        Self { entropy }
    }

    /// Run one exchange and return the revealed result
    ///
    /// On cancellation or an aborted rejection the exchange ends COMMITTED and
    /// nothing beyond the commitment has been disclosed.
    pub async fn run<S, A>(
        &mut self,
        range: Range,
        source: &mut S,
        announcer: &mut A,
    ) -> Result<Revealed>
    where
        S: ContributionSource + ?Sized,
        A: Announcer + ?Sized,
    {
        let mut committed = Committed::with_entropy(range, &mut self.entropy)?;
        let run_id = committed.run_id();
        announcer.committed(run_id, committed.commitment(), range);

        let contributed = loop {
            let attempt = match source.request(range).await? {
                Reply::Number(value) => committed.contribute(value),
                Reply::Text(input) => committed.contribute_text(&input),
                Reply::Cancel => {
                    info!(run = %run_id, "exchange cancelled before contribution");
                    return Err(FairError::Cancelled);
                }
            };

            match attempt {
                Ok(contributed) => break contributed,
                Err(rejected) => {
                    let (error, back) = rejected.into_parts();
                    announcer.rejected(&error);
                    match source.on_rejected(&error) {
                        Decision::Retry => committed = back,
                        Decision::Abort => {
                            warn!(run = %run_id, %error, "aborted on invalid contribution");
                            return Err(error);
                        }
                    }
                }
            }
        };

        let revealed = contributed.reveal();
        announcer.revealed(&revealed);
        Ok(revealed)
    }
}
