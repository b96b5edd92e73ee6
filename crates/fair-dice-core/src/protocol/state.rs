//! Exchange states: COMMITTED, CONTRIBUTED, REVEALED.
//!
//! Each state owns its data and is consumed by the transition out of it,
//! so the secret and key can only be read from a `Revealed`.

use super::{Range, RunId};
use crate::crypto::{Commitment, EntropySource, Key, OsEntropy};
use crate::error::{FairError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

/// Secret drawn and commitment computed; waiting for the contribution
pub struct Committed {
    run_id: RunId,
    range: Range,
    secret: u64,
    key: Key,
    commitment: Commitment,
}

impl Committed {
    /// Commit to a fresh secret drawn from the OS CSPRNG
    pub fn new(range: Range) -> Result<Self> {
        Self::with_entropy(range, &mut OsEntropy)
    }

    /// Commit to a fresh secret drawn from `entropy`
    pub fn with_entropy<E: EntropySource + ?Sized>(range: Range, entropy: &mut E) -> Result<Self> {
        let key = entropy.key()?;
        let secret = entropy.secret(range)?;
        if secret >= range.get() {
            return Err(FairError::EntropyUnavailable(format!(
                "secret {secret} drawn outside {range}"
            )));
        }

        let commitment = Commitment::new(&key, secret);
        let run_id = RunId::new();
        info!(run = %run_id, range = range.get(), %commitment, "committed");

        Ok(Self {
            run_id,
            range,
            secret,
            key,
            commitment,
        })
    }

    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    pub fn range(&self) -> Range {
        self.range
    }

    /// The only value safe to publish in this state
    pub fn commitment(&self) -> &Commitment {
        &self.commitment
    }

    /// Accept the counterpart's value if it lies in `0..range`
    pub fn contribute(self, value: i64) -> std::result::Result<Contributed, RejectedContribution> {
        match u64::try_from(value) {
            Ok(contribution) if self.range.contains(value) => {
                debug!(run = %self.run_id, contribution, "contribution accepted");
                Ok(Contributed {
                    committed: self,
                    contribution,
                })
            }
            _ => Err(self.reject(value.to_string())),
        }
    }

    /// Parse and accept a typed-in contribution
    pub fn contribute_text(
        self,
        input: &str,
    ) -> std::result::Result<Contributed, RejectedContribution> {
        match input.trim().parse::<i64>() {
            Ok(value) => self.contribute(value),
            Err(_) => Err(self.reject(input.trim().to_string())),
        }
    }

    fn reject(self, input: String) -> RejectedContribution {
        debug!(run = %self.run_id, %input, "contribution rejected");
        RejectedContribution {
            error: FairError::OutOfRange {
                input,
                range: self.range.get(),
            },
            committed: self,
        }
    }
}

impl fmt::Debug for Committed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Committed")
            .field("run_id", &self.run_id)
            .field("range", &self.range)
            .field("commitment", &self.commitment)
            .finish_non_exhaustive()
    }
}

/// A contribution that was refused; the exchange is still COMMITTED
#[derive(Debug)]
pub struct RejectedContribution {
    pub error: FairError,
    pub committed: Committed,
}

impl RejectedContribution {
    pub fn into_parts(self) -> (FairError, Committed) {
        (self.error, self.committed)
    }
}

impl From<RejectedContribution> for FairError {
    fn from(rejected: RejectedContribution) -> Self {
        rejected.error
    }
}

/// Contribution accepted; ready to reveal
pub struct Contributed {
    committed: Committed,
    contribution: u64,
}

impl Contributed {
    /// Combine both values and disclose the secret and key
    pub fn reveal(self) -> Revealed {
        let Committed {
            run_id,
            range,
            secret,
            key,
            commitment,
        } = self.committed;
        let final_value = combine(secret, self.contribution, range);
        info!(run = %run_id, secret, contribution = self.contribution, final_value, "revealed");

        Revealed {
            run_id,
            range,
            commitment,
            secret,
            key,
            contribution: self.contribution,
            final_value,
        }
    }
}

impl fmt::Debug for Contributed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Contributed")
            .field("committed", &self.committed)
            .field("contribution", &self.contribution)
            .finish()
    }
}

/// (secret + contribution) mod range, without overflow for any u64 range
fn combine(secret: u64, contribution: u64, range: Range) -> u64 {
    ((u128::from(secret) + u128::from(contribution)) % u128::from(range.get())) as u64
}

/// Terminal state: everything needed to check the exchange after the fact
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revealed {
    pub run_id: RunId,
    pub range: Range,
    pub commitment: Commitment,
    pub secret: u64,
    pub key: Key,
    pub contribution: u64,
    pub final_value: u64,
}

impl Revealed {
    /// Recompute the commitment and the combined value
    pub fn verify(&self) -> bool {
        self.secret < self.range.get()
            && self.contribution < self.range.get()
            && self.commitment.verify(&self.key, self.secret)
            && self.final_value == combine(self.secret, self.contribution, self.range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::FixedEntropy;

    fn committed(range: u64, secret: u64) -> Committed {
        let mut entropy = FixedEntropy::new([secret]);
        Committed::with_entropy(Range::new(range).unwrap(), &mut entropy).unwrap()
    }

    #[test]
    fn test_final_value_is_modular_sum() {
        let revealed = committed(6, 3).contribute(4).unwrap().reveal();

        assert_eq!(revealed.final_value, 1);
        assert!(revealed.verify());
    }

    #[test]
    fn test_reveal_matches_published_commitment() {
        let state = committed(6, 2);
        let published = *state.commitment();
        let revealed = state.contribute(5).unwrap().reveal();

        assert_eq!(revealed.commitment, published);
        assert!(published.verify(&revealed.key, revealed.secret));
    }

    #[test]
    fn test_out_of_range_keeps_commitment() {
        let state = committed(6, 3);
        let published = *state.commitment();

        let rejected = state.contribute(6).unwrap_err();
        assert!(matches!(
            rejected.error,
            FairError::OutOfRange { range: 6, .. }
        ));

        let (_, state) = rejected.into_parts();
        assert_eq!(*state.commitment(), published);

        let revealed = state.contribute(0).unwrap().reveal();
        assert_eq!(revealed.commitment, published);
        assert_eq!(revealed.final_value, 3);
    }

    #[test]
    fn test_negative_contribution_rejected() {
        assert!(committed(6, 0).contribute(-1).is_err());
    }

    #[test]
    fn test_non_integer_contribution_rejected() {
        for input in ["", "abc", "2.5", "1e3", "0x1"] {
            let rejected = committed(6, 0).contribute_text(input).unwrap_err();
            assert!(matches!(rejected.error, FairError::OutOfRange { .. }), "{input:?}");
        }
    }

    #[test]
    fn test_text_contribution_trimmed() {
        let revealed = committed(2, 1).contribute_text(" 1\n").unwrap().reveal();
        assert_eq!(revealed.final_value, 0);
    }

    #[test]
    fn test_single_outcome_range() {
        let revealed = Committed::new(Range::new(1).unwrap())
            .unwrap()
            .contribute(0)
            .unwrap()
            .reveal();

        assert_eq!(revealed.secret, 0);
        assert_eq!(revealed.final_value, 0);
    }

    #[test]
    fn test_combine_does_not_overflow() {
        let range = Range::new(u64::MAX).unwrap();
        assert_eq!(combine(u64::MAX - 1, u64::MAX - 1, range), u64::MAX - 2);
    }

    #[test]
    fn test_tampered_reveal_fails_verification() {
        let mut revealed = committed(6, 3).contribute(4).unwrap().reveal();
        revealed.secret = 4;
        assert!(!revealed.verify());

        let mut revealed = committed(6, 3).contribute(4).unwrap().reveal();
        revealed.final_value = 2;
        assert!(!revealed.verify());
    }

    #[test]
    fn test_debug_hides_secret() {
        let state = committed(6, 3);
        let debug = format!("{state:?}");

        assert!(!debug.contains("secret"));
        assert!(!debug.contains("key"));
    }
}
