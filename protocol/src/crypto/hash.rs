//! # Hashing Utilities
//!
//! LemoChain hashes with keccak-256, the pre-standard variant of SHA-3 that
//! Ethereum also uses. It is *not* interchangeable with FIPS-202 SHA3-256:
//! the padding differs and so does every output.

use tiny_keccak::{Hasher, Keccak};

/// Compute the keccak-256 digest of `data`.
///
/// # Example
///
/// ```
/// use lemo_tx::crypto::keccak256;
///
/// let hash = keccak256(b"");
/// assert_eq!(
///     hex::encode(hash),
///     "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
/// );
/// ```
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut output = [0u8; 32];
    hasher.finalize(&mut output);
    output
}

/// keccak-256 rendered as `0x`-prefixed lowercase hex, the form in which
/// transaction hashes are exchanged.
pub fn keccak256_hex(data: &[u8]) -> String {
    format!("0x{}", hex::encode(keccak256(data)))
}
