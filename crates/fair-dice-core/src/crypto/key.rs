//! Commitment key.

use crate::error::{FairError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Key length in bytes (256 bits)
pub const KEY_LEN: usize = 32;

/// One-shot key for a single commitment, disclosed on reveal
#[derive(Clone, PartialEq, Eq)]
pub struct Key([u8; KEY_LEN]);

impl Key {
    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Lowercase hex encoding, as shown to the counterpart
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse a disclosed key
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s.trim()).map_err(|e| FairError::InvalidHex {
            what: "key",
            reason: e.to_string(),
        })?;
        let bytes: [u8; KEY_LEN] = bytes.try_into().map_err(|v: Vec<u8>| FairError::InvalidHex {
            what: "key",
            reason: format!("expected {KEY_LEN} bytes, got {}", v.len()),
        })?;
        Ok(Self(bytes))
    }
}

impl FromStr for Key {
    type Err = FairError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

// Key material stays out of logs until it is deliberately displayed.
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Key(..)")
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for Key {
    fn serialize<S: Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_hex().serialize(s)
    }
}

impl<'de> Deserialize<'de> for Key {
    fn deserialize<D: Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let hex_str = String::deserialize(d)?;
        Self::from_hex(&hex_str).map_err(serde::de::Error::custom)
    }
}
