//! # Protocol Configuration & Constants
//!
//! Every magic number the transaction layer depends on lives here. The
//! chain nodes enforce the same limits, so a value that drifts from theirs
//! produces transactions that look fine locally and get rejected on submit.
//!
//! Values that a caller may legitimately want to change per network (chain
//! id, TTL, default gas terms) are grouped into [`ChainConfig`], which is
//! passed by reference into every constructor instead of being read from
//! global state.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Network Identifiers
// ---------------------------------------------------------------------------

/// Mainnet chain id.
pub const CHAIN_ID_MAIN_NET: u16 = 1;

/// Development network chain id.
pub const CHAIN_ID_DEV_NET: u16 = 100;

// ---------------------------------------------------------------------------
// Transaction Defaults
// ---------------------------------------------------------------------------

/// Current transaction protocol version.
pub const TX_VERSION: u8 = 1;

/// Transaction time to live in seconds. Set on chain; a transaction whose
/// expiration is further away than this is rejected by the nodes.
pub const TX_TTL_SECONDS: u64 = 30 * 60;

/// Default gas price, in mo per gas.
pub const TX_DEFAULT_GAS_PRICE: u64 = 3_000_000_000;

/// Default gas limit.
pub const TX_DEFAULT_GAS_LIMIT: u64 = 2_000_000;

// ---------------------------------------------------------------------------
// Field Limits
// ---------------------------------------------------------------------------

/// Length of a raw account address in bytes.
pub const TX_ADDRESS_LENGTH: usize = 20;

/// Length of an encoded recoverable signature (`r ‖ s ‖ v`).
pub const TX_SIG_BYTE_LENGTH: usize = 65;

/// Maximum length of the `toName` field, in characters.
pub const MAX_TX_TO_NAME_LENGTH: usize = 100;

/// Maximum length of the `message` field, in characters.
pub const MAX_TX_MESSAGE_LENGTH: usize = 1024;

/// Length of a candidate node id in hex characters (64 raw bytes, no prefix).
pub const NODE_ID_LENGTH: usize = 128;

/// Maximum length of the short candidate profile fields (host, name, email…).
pub const MAX_DEPUTY_FIELD_LENGTH: usize = 128;

/// Maximum length of the candidate introduction.
pub const MAX_DEPUTY_LONG_FIELD_LENGTH: usize = 1024;

/// Length of an asset code in characters, including the `0x` prefix.
pub const TX_ASSET_CODE_LENGTH: usize = 66;

/// Length of an asset id in characters, including the `0x` prefix.
pub const TX_ASSET_ID_LENGTH: usize = 66;

/// Upper bound for the decimal places of a created asset.
pub const MAX_DECIMAL_DIGITS: u64 = 18;

/// Maximum length of asset descriptions and issue metadata.
pub const MAX_ASSET_DESCRIPTION_LENGTH: usize = 256;

// ---------------------------------------------------------------------------
// Deep Links
// ---------------------------------------------------------------------------

/// Prefix of a payment deep link.
pub const PAY_DEEP_LINK_PREFIX: &str = "lemo://pay/tx?";

/// Prefix of a sign-request deep link.
pub const SIGN_DEEP_LINK_PREFIX: &str = "lemo://sign/msg?";

/// Decimal places between `gasPrice` on the wire (Gmo) and in memory (mo).
pub const GAS_PRICE_UNIT_DECIMALS: u32 = 9;

/// Decimal places between `amount` on the wire (LEMO) and in memory (mo).
pub const AMOUNT_UNIT_DECIMALS: u32 = 18;

// ---------------------------------------------------------------------------
// ChainConfig
// ---------------------------------------------------------------------------

/// Per-network defaults applied while normalizing a transaction.
///
/// A `ChainConfig` is immutable once built and cheap to copy. Construct one
/// per target network and hand it to [`crate::transaction::Transaction::new`]
/// or [`crate::transaction::TxFactory::new`].
///
/// # Examples
///
/// ```
/// use lemo_tx::config::{ChainConfig, CHAIN_ID_DEV_NET};
///
/// let dev = ChainConfig::with_chain_id(CHAIN_ID_DEV_NET);
/// assert_eq!(dev.chain_id, 100);
/// assert_eq!(dev.ttl_seconds, 1800);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainConfig {
    /// Chain id substituted by the factory when a config omits `chainID`.
    pub chain_id: u16,
    /// Transaction version applied when a config omits `version`.
    pub tx_version: u8,
    /// Seconds added to "now" for a missing or zero `expirationTime`.
    pub ttl_seconds: u64,
    /// Gas price applied when a config omits `gasPrice`.
    pub default_gas_price: u64,
    /// Gas limit applied when a config omits `gasLimit`.
    pub default_gas_limit: u64,
}

impl ChainConfig {
    /// Mainnet defaults with a different chain id.
    pub fn with_chain_id(chain_id: u16) -> Self {
        Self {
            chain_id,
            ..Self::default()
        }
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            chain_id: CHAIN_ID_MAIN_NET,
            tx_version: TX_VERSION,
            ttl_seconds: TX_TTL_SECONDS,
            default_gas_price: TX_DEFAULT_GAS_PRICE,
            default_gas_limit: TX_DEFAULT_GAS_LIMIT,
        }
    }
}
