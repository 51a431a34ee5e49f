// Copyright (c) 2026 LemoChain Developers. MIT License.
// See LICENSE for details.

//! # LemoChain Transactions — Core Library
//!
//! Builds, validates, canonically encodes and signs LemoChain transactions,
//! and carries them across application boundaries as deep links.
//!
//! ## Architecture
//!
//! The crate is split along the path a transaction takes from a loose field
//! mapping to a wire-ready JSON document:
//!
//! - **config** — Protocol constants and the injected [`config::ChainConfig`].
//! - **error** — The [`error::TxError`] enum and its taxonomy.
//! - **crypto** — keccak-256, secp256k1 keys, recoverable signatures.
//! - **address** — The 20-byte account address and its `Lemo…` text form.
//! - **transaction** — Validation, canonical RLP records, the
//!   [`transaction::Transaction`] aggregate, signers, payload builders and
//!   the [`transaction::TxFactory`].
//! - **deeplink** — `lemo://` URIs for payment and sign requests.
//!
//! ## Hash domains
//!
//! Every transaction has four hashes and they must match what the chain
//! nodes compute byte for byte:
//!
//! 1. `hash()` — the identity, over every field including signatures.
//! 2. `hash_for_sign()` — what the sender signs.
//! 3. `hash_for_no_gas_sign()` — what a sender signs when somebody else
//!    pays for gas; excludes gas price and gas limit.
//! 4. `hash_for_gas_sign()` — what the gas payer signs; covers the sender
//!    signatures and the final gas terms only.
//!
//! ## Quick start
//!
//! ```
//! use lemo_tx::config::ChainConfig;
//! use lemo_tx::crypto::PrivateKey;
//! use lemo_tx::transaction::{TxConfig, TxFactory};
//!
//! let key = PrivateKey::generate();
//! let factory = TxFactory::new(ChainConfig::default());
//!
//! let config = TxConfig {
//!     from: Some(key.address().to_string()),
//!     ..TxConfig::default()
//! };
//! let signed_json = factory.sign(&key, config).unwrap();
//! assert!(signed_json.contains("\"sigs\""));
//! ```

pub mod address;
pub mod config;
pub mod crypto;
pub mod deeplink;
pub mod error;
pub mod transaction;

pub use address::Address;
pub use error::{ErrorKind, TxError};
