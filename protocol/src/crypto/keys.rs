//! # Key Management
//!
//! secp256k1 private keys and the address they control.
//!
//! A key is borrowed for exactly one signing call and never retained by any
//! transaction or signer. Key bytes are never logged, and the `Debug` impl
//! prints the address instead.

use k256::ecdsa::{SigningKey, VerifyingKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use rand::rngs::OsRng;
use std::fmt;
use thiserror::Error;

use crate::address::{Address, ADDRESS_TYPE_NORMAL};
use crate::config::TX_ADDRESS_LENGTH;

use super::hash::keccak256;
use super::signatures::{strip_hex_prefix, Signature};

/// Errors that can occur during key operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    /// Not 32 bytes of hex, or not a valid non-zero scalar below the curve order.
    #[error("invalid private key: expected 32 bytes encoding a valid secp256k1 scalar")]
    InvalidSecretKey,

    /// The signing primitive rejected the hash.
    #[error("signing failed")]
    SigningFailed,
}

/// A secp256k1 private key.
///
/// # Examples
///
/// ```
/// use lemo_tx::crypto::PrivateKey;
///
/// let key = PrivateKey::generate();
/// let same = PrivateKey::from_hex(&key.to_hex()).unwrap();
/// assert_eq!(key.address(), same.address());
/// ```
#[derive(Clone)]
pub struct PrivateKey {
    signing_key: SigningKey,
}

impl PrivateKey {
    /// Generate a fresh key from the OS RNG.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::random(&mut OsRng),
        }
    }

    /// Load a key from 32 raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        let signing_key = SigningKey::from_slice(bytes).map_err(|_| KeyError::InvalidSecretKey)?;
        Ok(Self { signing_key })
    }

    /// Load a key from hex, with or without `0x`.
    pub fn from_hex(text: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(strip_hex_prefix(text)).map_err(|_| KeyError::InvalidSecretKey)?;
        if bytes.len() != 32 {
            return Err(KeyError::InvalidSecretKey);
        }
        Self::from_bytes(&bytes)
    }

    /// Export the raw key as `0x`-prefixed hex. Handle with care.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.signing_key.to_bytes()))
    }

    /// The account address controlled by this key.
    pub fn address(&self) -> Address {
        address_from_verifying_key(self.signing_key.verifying_key())
    }

    /// Sign a 32-byte prehash, producing `r ‖ s ‖ v`.
    ///
    /// Deterministic (RFC 6979) and low-S normalized.
    pub fn sign_hash(&self, hash: &[u8; 32]) -> Result<Signature, KeyError> {
        let (signature, recovery_id) = self
            .signing_key
            .sign_prehash_recoverable(hash)
            .map_err(|_| KeyError::SigningFailed)?;

        let mut bytes = [0u8; 65];
        bytes[..64].copy_from_slice(&signature.to_bytes());
        bytes[64] = recovery_id.to_byte();
        Ok(Signature::from_bytes(bytes))
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrivateKey({})", self.address())
    }
}

/// Address of a public key: the type byte followed by the first 19 bytes
/// of the keccak-256 of the uncompressed point without its `0x04` tag.
pub(crate) fn address_from_verifying_key(key: &VerifyingKey) -> Address {
    let point = key.as_affine().to_encoded_point(false);
    let digest = keccak256(&point.as_bytes()[1..]);
    let mut bytes = [0u8; TX_ADDRESS_LENGTH];
    bytes[0] = ADDRESS_TYPE_NORMAL;
    bytes[1..].copy_from_slice(&digest[..TX_ADDRESS_LENGTH - 1]);
    Address::from_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Private key 1 maps to the generator point.
    const KEY_ONE: &str = "0x0000000000000000000000000000000000000000000000000000000000000001";

    #[test]
    fn test_known_address_for_key_one() {
        let key = PrivateKey::from_hex(KEY_ONE).unwrap();
        assert_eq!(
            hex::encode(key.address().as_bytes()),
            "01c0a6c424ac7157ae408398df7e5f4552091a69"
        );
        assert_eq!(key.address().to_string(), "Lemo83ZRT2TB9JW5679G4KRQG7B5HKYND7AABHFQ");
    }

    #[test]
    fn test_known_wallet_key() {
        let key = PrivateKey::from_hex(
            "0xc21b6b2fbf230f665b936194d14da67187732bf9d28768aef1a3cbb26608f8aa",
        )
        .unwrap();
        assert_eq!(key.address().to_string(), "Lemo83GN72GYH2NZ8BA729Z9TCT7KQ5FC3CR6DJG");
    }

    #[test]
    fn test_hex_roundtrip() {
        let key = PrivateKey::generate();
        let restored = PrivateKey::from_hex(&key.to_hex()).unwrap();
        assert_eq!(key.address(), restored.address());

        let no_prefix = key.to_hex().trim_start_matches("0x").to_string();
        assert_eq!(PrivateKey::from_hex(&no_prefix).unwrap().address(), key.address());
    }

    #[test]
    fn test_rejects_bad_keys() {
        assert_eq!(PrivateKey::from_hex("0x1234").unwrap_err(), KeyError::InvalidSecretKey);
        assert_eq!(PrivateKey::from_hex("nothex").unwrap_err(), KeyError::InvalidSecretKey);
        assert_eq!(
            PrivateKey::from_bytes(&[0u8; 32]).unwrap_err(),
            KeyError::InvalidSecretKey
        );
    }

    #[test]
    fn test_signing_is_deterministic() {
        let key = PrivateKey::generate();
        let hash = keccak256(b"deterministic");
        assert_eq!(key.sign_hash(&hash).unwrap(), key.sign_hash(&hash).unwrap());
    }

    #[test]
    fn test_recovery_byte_is_zero_or_one() {
        let key = PrivateKey::generate();
        for i in 0u8..8 {
            let sig = key.sign_hash(&keccak256(&[i])).unwrap();
            assert!(sig.as_bytes()[64] <= 1);
        }
    }

    #[test]
    fn test_debug_hides_secret() {
        let key = PrivateKey::from_hex(KEY_ONE).unwrap();
        let debug = format!("{key:?}");
        assert!(debug.starts_with("PrivateKey(Lemo"));
        assert!(!debug.contains("0000000000000001"));
    }
}
