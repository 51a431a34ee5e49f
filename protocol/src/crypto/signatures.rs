//! # Recoverable Signatures
//!
//! LemoChain transactions never carry a public key. The signer is recovered
//! from the 65-byte signature and the hash it covers, so a signature is only
//! meaningful together with the hash domain it was produced in.
//!
//! Layout: `r (32) ‖ s (32) ‖ v (1)` with `v ∈ {0, 1}`. Signatures written
//! by other tooling with `v ∈ {27, 28}` are accepted on recovery.

use k256::ecdsa::{RecoveryId, Signature as EcdsaSignature, VerifyingKey};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::address::Address;
use crate::config::TX_SIG_BYTE_LENGTH;

use super::keys::address_from_verifying_key;

/// Errors while parsing or recovering a signature.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    /// The text is not hex.
    #[error("signature is not a hex string: {0}")]
    InvalidHex(String),

    /// The decoded bytes exceed the fixed signature size.
    #[error("signature is {0} bytes, at most 65 allowed")]
    TooLong(usize),

    /// `r`/`s` are not valid scalars or `v` is out of range.
    #[error("malformed signature bytes")]
    Malformed,

    /// No public key maps onto this (hash, signature) pair.
    #[error("public key recovery failed")]
    RecoveryFailed,
}

/// A 65-byte recoverable secp256k1 signature.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature([u8; TX_SIG_BYTE_LENGTH]);

impl Signature {
    /// Wrap raw signature bytes.
    pub fn from_bytes(bytes: [u8; TX_SIG_BYTE_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Parse a hex signature, with or without `0x`.
    ///
    /// Shorter inputs are left-padded with zero bytes to the canonical 65,
    /// odd-length inputs get a leading zero nibble. Longer inputs are
    /// rejected.
    pub fn from_hex(text: &str) -> Result<Self, SignatureError> {
        let bytes = decode_padded_hex(text)
            .ok_or_else(|| SignatureError::InvalidHex(text.to_string()))?;
        if bytes.len() > TX_SIG_BYTE_LENGTH {
            return Err(SignatureError::TooLong(bytes.len()));
        }
        let mut out = [0u8; TX_SIG_BYTE_LENGTH];
        out[TX_SIG_BYTE_LENGTH - bytes.len()..].copy_from_slice(&bytes);
        Ok(Self(out))
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8; TX_SIG_BYTE_LENGTH] {
        &self.0
    }

    /// `0x`-prefixed lowercase hex.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Recover the public key that produced this signature over `hash`.
    pub fn recover(&self, hash: &[u8; 32]) -> Result<VerifyingKey, SignatureError> {
        let signature =
            EcdsaSignature::from_slice(&self.0[..64]).map_err(|_| SignatureError::Malformed)?;
        let v = match self.0[64] {
            v @ (27 | 28) => v - 27,
            v => v,
        };
        let recovery_id = RecoveryId::from_byte(v).ok_or(SignatureError::Malformed)?;
        VerifyingKey::recover_from_prehash(hash, &signature, recovery_id)
            .map_err(|_| SignatureError::RecoveryFailed)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self.to_hex())
    }
}

impl Serialize for Signature {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Signature::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Recover the address that signed `hash`.
///
/// # Example
///
/// ```
/// use lemo_tx::crypto::{keccak256, recover_address, PrivateKey};
///
/// let key = PrivateKey::generate();
/// let hash = keccak256(b"pay 10 LEMO");
/// let sig = key.sign_hash(&hash).unwrap();
/// assert_eq!(recover_address(&hash, &sig).unwrap(), key.address());
/// ```
pub fn recover_address(hash: &[u8; 32], signature: &Signature) -> Result<Address, SignatureError> {
    let verifying_key = signature.recover(hash)?;
    Ok(address_from_verifying_key(&verifying_key))
}

/// Decode hex with an optional `0x` prefix, tolerating an odd number of
/// digits by prepending a zero nibble.
pub(crate) fn decode_padded_hex(text: &str) -> Option<Vec<u8>> {
    let digits = strip_hex_prefix(text);
    if digits.len() % 2 == 1 {
        hex::decode(format!("0{digits}")).ok()
    } else {
        hex::decode(digits).ok()
    }
}

pub(crate) fn strip_hex_prefix(text: &str) -> &str {
    text.strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text)
}
