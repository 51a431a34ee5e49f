//! # Transaction Module
//!
//! Construction, canonical encoding, signing and export of LemoChain
//! transactions. Every transfer, vote, asset operation and contract
//! deployment is a [`Transaction`].
//!
//! ## Architecture
//!
//! ```text
//! types.rs      — TxType, NumericInput, TxConfig (input) and TxJson (export)
//! validation.rs — Field-by-field checks of a TxConfig
//! encoding.rs   — The ordered RLP records behind every hash
//! tx.rs         — The Transaction aggregate: normalize, hash, sign, export
//! signing.rs    — Signer and GasSigner over the three hash domains
//! payload.rs    — Kind-specific payload documents and their validators
//! factory.rs    — TxFactory: one create/sign pair per kind
//! ```
//!
//! ## Transaction Lifecycle
//!
//! 1. **Build** — [`TxFactory`] validates the config and the payload and
//!    constructs the [`Transaction`].
//! 2. **Sign** — the sender signs with [`Transaction::sign_with`], or with
//!    [`Transaction::sign_no_gas_with`] when a gas payer covers gas.
//! 3. **Reimburse** — the gas payer sets the final gas terms and signs with
//!    [`Transaction::sign_gas_with`].
//! 4. **Export** — [`Transaction::to_json`] yields the document the chain
//!    accepts.
//!
//! ## Design Decisions
//!
//! - Hashes are keccak-256 over RLP lists whose field order matches the
//!   chain nodes exactly. See [`encoding`] for the layouts.
//! - Amounts and gas prices are arbitrary-precision integers in mo, the
//!   smallest unit. No floating point anywhere near monetary values.
//! - A box transaction embeds its members' hashes, never their raw bytes,
//!   and boxes do not nest.

pub mod encoding;
pub mod factory;
pub mod payload;
pub mod signing;
pub mod tx;
pub mod types;
pub mod validation;

pub use encoding::RecordMode;
pub use factory::TxFactory;
pub use payload::{
    AssetProfile, CandidateInfo, CandidateProfile, ContractCreation, CreateAssetInfo,
    FreezeFlag, IssueAssetInfo, ModifyAssetInfo, ModifySignersInfo, ReplenishAssetInfo,
    SignerWeight, SubTx, TransferAssetInfo, UpdateProfile,
};
pub use signing::{GasSigner, Signer};
pub use tx::{Payload, Transaction};
pub use types::{NumericInput, SigningState, TxConfig, TxData, TxJson, TxType};
pub use validation::validate_tx_config;
