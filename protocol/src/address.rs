//! # LemoChain Addresses
//!
//! An account address is 20 raw bytes. Humans see it as text:
//!
//! ```text
//! bytes (20)
//!     -> bytes ‖ xor(bytes)                    21 bytes
//!     -> "Lemo" + base26(payload), 36 digits   Lemo83GN72GYH2NZ8BA729Z9TCT7KQ5FC3CR6DJG
//! ```
//!
//! The base26 alphabet is `83456729ABCDFGHJKNPQRSTWYZ`. `8` is the zero
//! digit, so short values are left-padded with `8`. Input
//! is case-insensitive; output is always `Lemo` plus upper case. The
//! one-byte checksum catches most copy-paste typos before a transaction is
//! signed for the wrong account.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::config::TX_ADDRESS_LENGTH;

/// Text prefix of every address.
pub const ADDRESS_PREFIX: &str = "Lemo";

/// First byte of an address derived from a public key.
pub const ADDRESS_TYPE_NORMAL: u8 = 0x01;

const BASE26_ALPHABET: &[u8; 26] = b"83456729ABCDFGHJKNPQRSTWYZ";

/// Digits needed for a full 21-byte payload.
const TEXT_BODY_LENGTH: usize = 36;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors reported by the address codec.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// Missing `Lemo` prefix or characters outside the base26 alphabet.
    #[error("Invalid LemoChain address {0}")]
    InvalidAddress(String),

    /// Empty body, or more digits than a 21-byte payload can hold.
    #[error("Invalid length of LemoChain address {0}")]
    InvalidAddressLength(String),

    /// Checksum byte does not match the address bytes.
    #[error("Invalid address checksum {0}")]
    InvalidAddressCheckSum(String),
}

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// A 20-byte LemoChain account address.
///
/// # Examples
///
/// ```
/// use lemo_tx::Address;
///
/// let addr: Address = "Lemo83GN72GYH2NZ8BA729Z9TCT7KQ5FC3CR6DJG".parse().unwrap();
/// assert_eq!(addr.as_bytes()[0], 0x01);
/// assert_eq!(addr.to_string(), "Lemo83GN72GYH2NZ8BA729Z9TCT7KQ5FC3CR6DJG");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; TX_ADDRESS_LENGTH]);

impl Address {
    /// Wrap raw address bytes.
    pub fn from_bytes(bytes: [u8; TX_ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Raw address bytes, as they go into the canonical encoding.
    pub fn as_bytes(&self) -> &[u8; TX_ADDRESS_LENGTH] {
        &self.0
    }

    /// Encode as `Lemo…` text.
    pub fn to_text(&self) -> String {
        let mut payload = Vec::with_capacity(TX_ADDRESS_LENGTH + 1);
        payload.extend_from_slice(&self.0);
        payload.push(checksum(&self.0));

        let digits = BigUint::from_bytes_be(&payload).to_radix_be(26);
        let mut text = String::with_capacity(ADDRESS_PREFIX.len() + TEXT_BODY_LENGTH);
        text.push_str(ADDRESS_PREFIX);
        for _ in digits.len()..TEXT_BODY_LENGTH {
            text.push(BASE26_ALPHABET[0] as char);
        }
        text.extend(digits.iter().map(|&d| BASE26_ALPHABET[d as usize] as char));
        text
    }

    /// Parse `Lemo…` text, validating prefix, digits, length and checksum
    /// in that order.
    pub fn parse(text: &str) -> Result<Self, AddressError> {
        let invalid = || AddressError::InvalidAddress(text.to_string());
        let wrong_length = || AddressError::InvalidAddressLength(text.to_string());

        let prefix = text.get(..ADDRESS_PREFIX.len()).ok_or_else(invalid)?;
        if !prefix.eq_ignore_ascii_case(ADDRESS_PREFIX) {
            return Err(invalid());
        }
        let body = &text[ADDRESS_PREFIX.len()..];

        let digits = body
            .bytes()
            .map(|c| {
                let upper = c.to_ascii_uppercase();
                BASE26_ALPHABET.iter().position(|&a| a == upper).map(|d| d as u8)
            })
            .collect::<Option<Vec<u8>>>()
            .ok_or_else(invalid)?;
        if digits.is_empty() || digits.len() > TEXT_BODY_LENGTH {
            return Err(wrong_length());
        }

        let value = BigUint::from_radix_be(&digits, 26).ok_or_else(invalid)?;
        let packed = value.to_bytes_be();
        if packed.len() > TX_ADDRESS_LENGTH + 1 {
            return Err(wrong_length());
        }
        let mut payload = [0u8; TX_ADDRESS_LENGTH + 1];
        payload[TX_ADDRESS_LENGTH + 1 - packed.len()..].copy_from_slice(&packed);

        let mut bytes = [0u8; TX_ADDRESS_LENGTH];
        bytes.copy_from_slice(&payload[..TX_ADDRESS_LENGTH]);
        if checksum(&bytes) != payload[TX_ADDRESS_LENGTH] {
            return Err(AddressError::InvalidAddressCheckSum(text.to_string()));
        }
        Ok(Self(bytes))
    }
}

fn checksum(raw: &[u8]) -> u8 {
    raw.iter().fold(0, |acc, b| acc ^ b)
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_text())
    }
}

impl Serialize for Address {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_text())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Address::parse(&s).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
