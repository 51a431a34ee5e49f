//! # Cryptographic Primitives
//!
//! Everything the transaction layer needs from cryptography, and nothing
//! more:
//!
//! - **keccak-256** for every hash the chain computes (transaction hashes,
//!   address derivation, address checksums).
//! - **secp256k1** recoverable ECDSA for signatures. A signature is 65 bytes,
//!   `r ‖ s ‖ v`, and the signer's address is recovered from it rather than
//!   carried alongside.
//!
//! Both are thin wrappers around `tiny-keccak` and `k256`. Nonces come from
//! RFC 6979, so signing the same hash with the same key always yields the
//! same bytes.

pub mod hash;
pub mod keys;
pub mod signatures;

pub use hash::{keccak256, keccak256_hex};
pub use keys::{KeyError, PrivateKey};
pub use signatures::{recover_address, Signature};
