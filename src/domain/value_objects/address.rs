//! Mogwai address value object

use serde::{Deserialize, Serialize};

use crate::domain::error::GameError;

const BASE58_ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// A base58 chain address that a mogwai is (or will be) bound to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MogwaiAddress(String);

impl MogwaiAddress {
    pub fn parse(address: impl Into<String>) -> Result<Self, GameError> {
        let address = address.into();
        if address.is_empty() || decode_base58(&address).is_none() {
            return Err(GameError::InvalidAddress(address));
        }
        Ok(Self(address))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decoded address bytes (version, payload, checksum) as lowercase hex
    pub fn to_hex(&self) -> String {
        decode_base58(&self.0).map(hex::encode).unwrap_or_default()
    }
}

impl std::fmt::Display for MogwaiAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn decode_base58(input: &str) -> Option<Vec<u8>> {
    // little-endian accumulator
    let mut bytes: Vec<u8> = Vec::new();
    for c in input.bytes() {
        let mut carry = BASE58_ALPHABET.iter().position(|&a| a == c)? as u32;
        for byte in bytes.iter_mut() {
            carry += *byte as u32 * 58;
            *byte = (carry & 0xff) as u8;
            carry >>= 8;
        }
        while carry > 0 {
            bytes.push((carry & 0xff) as u8);
            carry >>= 8;
        }
    }

    let leading_zeros = input.bytes().take_while(|&c| c == b'1').count();
    let mut decoded = vec![0u8; leading_zeros];
    decoded.extend(bytes.iter().rev());
    Some(decoded)
}
