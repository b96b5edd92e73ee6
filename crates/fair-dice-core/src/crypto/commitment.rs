//! Keyed-hash commitment to a secret value.

use super::Key;
use crate::error::{FairError, Result};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha3::Sha3_256;
use std::fmt;
use std::str::FromStr;

type HmacSha3_256 = Hmac<Sha3_256>;

fn keyed_mac(key: &Key, secret: u64) -> HmacSha3_256 {
    let mut mac = HmacSha3_256::new_from_slice(key.to_hex().as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(secret.to_string().as_bytes());
    mac
}

/// Commitment = HMAC-SHA3-256(key_hex, decimal(secret))
///
/// The HMAC key is the text of the key's lowercase hex encoding, so a
/// counterpart can check the commitment with any HMAC-SHA3-256 tool that
/// takes a text key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Commitment([u8; 32]);

impl Commitment {
    /// Commit to a secret value under a key
    pub fn new(key: &Key, secret: u64) -> Self {
        Self(keyed_mac(key, secret).finalize().into_bytes().into())
    }

    /// Verify that the disclosed key and secret produce this commitment
    pub fn verify(&self, key: &Key, secret: u64) -> bool {
        keyed_mac(key, secret).verify_slice(&self.0).is_ok()
    }

    /// Parse a published commitment
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s.trim()).map_err(|e| FairError::InvalidHex {
            what: "commitment",
            reason: e.to_string(),
        })?;
        let bytes: [u8; 32] = bytes.try_into().map_err(|v: Vec<u8>| FairError::InvalidHex {
            what: "commitment",
            reason: format!("expected 32 bytes, got {}", v.len()),
        })?;
        Ok(Self(bytes))
    }
}

impl FromStr for Commitment {
    type Err = FairError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl fmt::Debug for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Commitment({})", hex::encode(&self.0[..8]))
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl Serialize for Commitment {
    fn serialize<S: Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        hex::encode(self.0).serialize(s)
    }
}

impl<'de> Deserialize<'de> for Commitment {
    fn deserialize<D: Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let hex_str = String::deserialize(d)?;
        Self::from_hex(&hex_str).map_err(serde::de::Error::custom)
    }
}
