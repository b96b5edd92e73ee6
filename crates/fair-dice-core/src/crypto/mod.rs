//! Cryptographic primitives for fair value exchanges.
//!
//! This module provides:
//! - Key for the keyed-hash commitment
//! - Commitment (HMAC-SHA3-256) binding a secret value to a key
//! - EntropySource for drawing keys and secret values

mod commitment;
mod entropy;
mod key;

pub use commitment::Commitment;
pub use entropy::{EntropySource, FixedEntropy, OsEntropy};
pub use key::{Key, KEY_LEN};
