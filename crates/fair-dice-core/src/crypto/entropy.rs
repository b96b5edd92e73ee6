//! Sources of keys and secret values.

use super::{Key, KEY_LEN};
use crate::error::{FairError, Result};
use crate::range::Range;
use rand::rngs::{OsRng, StdRng};
use rand::{Rng, RngCore, SeedableRng};
use std::collections::VecDeque;

/// Supplies fresh key material and secret values for each exchange
pub trait EntropySource {
    /// Draw a fresh 256-bit key
    fn key(&mut self) -> Result<Key>;

    /// Draw a uniform secret value in `0..range`
    fn secret(&mut self, range: Range) -> Result<u64>;
}

/// Operating system CSPRNG
#[derive(Clone, Copy, Debug, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn key(&mut self) -> Result<Key> {
        let mut bytes = [0u8; KEY_LEN];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| FairError::EntropyUnavailable(e.to_string()))?;
        Ok(Key::from_bytes(bytes))
    }

    fn secret(&mut self, range: Range) -> Result<u64> {
        // gen_range rejects out-of-zone samples, so there is no modulo bias
        let mut rng =
            StdRng::from_rng(OsRng).map_err(|e| FairError::EntropyUnavailable(e.to_string()))?;
        Ok(rng.gen_range(0..range.get()))
    }
}

/// Scripted secrets with real keys, for driving exchanges to known results
#[derive(Clone, Debug, Default)]
pub struct FixedEntropy {
    secrets: VecDeque<u64>,
}

impl FixedEntropy {
    /// Secrets are handed out in order, one per exchange
    pub fn new(secrets: impl IntoIterator<Item = u64>) -> Self {
        Self {
            secrets: secrets.into_iter().collect(),
        }
    }

    /// Secrets not yet handed out
    pub fn remaining(&self) -> usize {
        self.secrets.len()
    }
}

impl EntropySource for FixedEntropy {
    fn key(&mut self) -> Result<Key> {
        OsEntropy.key()
    }

    fn secret(&mut self, range: Range) -> Result<u64> {
        let secret = self
            .secrets
            .pop_front()
            .ok_or_else(|| FairError::EntropyUnavailable("scripted secrets exhausted".into()))?;
        if secret >= range.get() {
            return Err(FairError::EntropyUnavailable(format!(
                "scripted secret {secret} does not fit {range}"
            )));
        }
        Ok(secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_within_range() {
        for outcomes in [1u64, 2, 3, 6, 7, 100, u64::MAX] {
            let range = Range::new(outcomes).unwrap();
            for _ in 0..200 {
                assert!(OsEntropy.secret(range).unwrap() < outcomes);
            }
        }
    }

    #[test]
    fn test_single_outcome_always_zero() {
        let range = Range::new(1).unwrap();
        for _ in 0..50 {
            assert_eq!(OsEntropy.secret(range).unwrap(), 0);
        }
    }

    #[test]
    fn test_secret_distribution_is_uniform() {
        // Chi-square with 5 degrees of freedom; p = 0.0001 cutoff is 25.74
        const SAMPLES: u64 = 60_000;
        let range = Range::new(6).unwrap();
        let mut counts = [0u64; 6];
        for _ in 0..SAMPLES {
            counts[OsEntropy.secret(range).unwrap() as usize] += 1;
        }

        let expected = SAMPLES as f64 / 6.0;
        let chi_square: f64 = counts
            .iter()
            .map(|&c| {
                let diff = c as f64 - expected;
                diff * diff / expected
            })
            .sum();

        assert!(chi_square < 25.74, "chi-square {chi_square} for {counts:?}");
    }

    #[test]
    fn test_keys_are_fresh() {
        let key1 = OsEntropy.key().unwrap();
        let key2 = OsEntropy.key().unwrap();

        assert_ne!(key1, key2);
    }

    #[test]
    fn test_fixed_entropy_in_order() {
        let mut entropy = FixedEntropy::new([3, 1]);
        let range = Range::new(6).unwrap();

        assert_eq!(entropy.remaining(), 2);
        assert_eq!(entropy.secret(range).unwrap(), 3);
        assert_eq!(entropy.secret(range).unwrap(), 1);
        assert_eq!(entropy.remaining(), 0);
        assert!(matches!(
            entropy.secret(range),
            Err(FairError::EntropyUnavailable(_))
        ));
    }

    #[test]
    fn test_fixed_entropy_rejects_secret_outside_range() {
        let mut entropy = FixedEntropy::new([6]);

        assert!(entropy.secret(Range::new(6).unwrap()).is_err());
    }
}
