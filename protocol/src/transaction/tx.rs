//! The [`Transaction`] aggregate.
//!
//! A transaction is built once from a [`TxConfig`], validated and filled
//! with network defaults, and afterwards only ever grows signatures. Every
//! hash is recomputed from the current fields on demand; nothing is cached,
//! so a transaction can never report a stale hash after a signature is
//! appended.

use chrono::Utc;
use num_bigint::BigUint;
use num_traits::Zero;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::address::Address;
use crate::config::ChainConfig;
use crate::crypto::{keccak256, PrivateKey, Signature};
use crate::error::TxError;

use super::encoding::{encode_fields, gas_record_fields, record_fields, RecordMode};
use super::signing::{GasSigner, Signer};
use super::types::{
    data_to_hex, present, present_str, SigningState, TxConfig, TxJson, TxType,
};
use super::validation::{check_address, validate_tx_config};

// ---------------------------------------------------------------------------
// Payload
// ---------------------------------------------------------------------------

/// What field 11 of the record is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Opaque bytes, encoded as-is.
    Data(Vec<u8>),
    /// A box: the raw `{"subTxList": [...]}` bytes and the parsed members.
    /// The record carries the members' hashes, not the raw bytes.
    Box {
        /// Raw payload, kept for export.
        data: Vec<u8>,
        /// Parsed sub-transactions, in list order.
        sub_txs: Vec<Transaction>,
    },
}

impl Payload {
    /// Raw payload bytes.
    pub fn bytes(&self) -> &[u8] {
        match self {
            Self::Data(data) | Self::Box { data, .. } => data,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BoxEnvelope {
    sub_tx_list: Vec<serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// A normalized LemoChain transaction.
///
/// Fields are private: the only mutations after construction are the
/// signature appends, and those keep the signature lists duplicate-free.
///
/// # Examples
///
/// ```
/// use lemo_tx::config::ChainConfig;
/// use lemo_tx::crypto::PrivateKey;
/// use lemo_tx::transaction::{Transaction, TxConfig};
///
/// let key = PrivateKey::generate();
/// let config = TxConfig::from_sender(key.address().to_string());
/// let mut tx = Transaction::new(config, &ChainConfig::default()).unwrap();
///
/// tx.sign_with(&key).unwrap();
/// assert_eq!(tx.sigs().len(), 1);
/// assert!(tx.hash().unwrap().starts_with("0x"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    tx_type: u16,
    version: u8,
    chain_id: u16,
    from: Address,
    to: Option<Address>,
    to_name: String,
    gas_payer: Option<Address>,
    gas_price: BigUint,
    gas_limit: u64,
    amount: BigUint,
    payload: Payload,
    expiration_time: u64,
    message: String,
    sigs: Vec<Signature>,
    gas_payer_sigs: Vec<Signature>,
}

impl Transaction {
    /// Validate `config` and fill in the defaults of `chain`.
    ///
    /// `chainID` is taken as given and left at 0 when absent; substituting
    /// the network id is the factory's job.
    pub fn new(config: TxConfig, chain: &ChainConfig) -> Result<Self, TxError> {
        Self::with_depth(config, chain, 0)
    }

    /// Rebuild from another transaction's canonical export.
    pub fn from_transaction(other: &Transaction, chain: &ChainConfig) -> Result<Self, TxError> {
        Self::new(other.to_json().into(), chain)
    }

    /// Parse an exported (or hand-written) JSON document.
    pub fn from_json(json: &str, chain: &ChainConfig) -> Result<Self, TxError> {
        Self::new(TxConfig::from_json(json)?, chain)
    }

    pub(crate) fn with_depth(
        config: TxConfig,
        chain: &ChainConfig,
        depth: usize,
    ) -> Result<Self, TxError> {
        validate_tx_config(&config)?;

        let tx_type = match present(&config.tx_type) {
            Some(v) => v.to_u64_in_range("type", 0, 0xffff)? as u16,
            None => TxType::Ordinary.as_u16(),
        };
        let version = match present(&config.version) {
            Some(v) => v.to_u64_in_range("version", 0, 0xff)? as u8,
            None => chain.tx_version,
        };
        let chain_id = match present(&config.chain_id) {
            Some(v) => v.to_u64_in_range("chainID", 1, 0xffff)? as u16,
            None => 0,
        };

        let from = present_str(&config.from)
            .ok_or_else(|| TxError::required("from"))
            .and_then(check_address)?;
        let to = present_str(&config.to).map(check_address).transpose()?;
        let gas_payer = present_str(&config.gas_payer)
            .map(check_address)
            .transpose()?;

        let gas_price = match present(&config.gas_price) {
            Some(v) => v.to_biguint("gasPrice")?,
            None => BigUint::from(chain.default_gas_price),
        };
        let gas_limit = match present(&config.gas_limit) {
            Some(v) => v.to_u64("gasLimit")?,
            None => chain.default_gas_limit,
        };
        let amount = match present(&config.amount) {
            Some(v) => v.to_biguint("amount")?,
            None => BigUint::zero(),
        };

        let expiration_time = match present(&config.expiration_time) {
            Some(v) => v.to_u64("expirationTime")?,
            None => 0,
        };
        let expiration_time = if expiration_time == 0 {
            default_expiration(chain)
        } else {
            expiration_time
        };

        let data = match &config.data {
            Some(data) => data.to_bytes()?,
            None => Vec::new(),
        };
        let payload = if tx_type == TxType::Box.as_u16() {
            if depth >= 1 {
                warn!(depth, "box transaction nested inside a box");
                return Err(TxError::InvalidBoxTransaction);
            }
            let sub_txs = parse_box(&data, chain, depth)?;
            Payload::Box { data, sub_txs }
        } else {
            Payload::Data(data)
        };

        let tx = Self {
            tx_type,
            version,
            chain_id,
            from,
            to,
            to_name: config.to_name.unwrap_or_default(),
            gas_payer,
            gas_price,
            gas_limit,
            amount,
            payload,
            expiration_time,
            message: config.message.unwrap_or_default(),
            sigs: parse_signatures(config.sigs.as_deref().unwrap_or_default())?,
            gas_payer_sigs: parse_signatures(config.gas_payer_sigs.as_deref().unwrap_or_default())?,
        };
        debug!(
            tx_type = tx.tx_type,
            from = %tx.from,
            chain_id = tx.chain_id,
            depth,
            "transaction built"
        );
        Ok(tx)
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Wire kind tag.
    pub fn tx_type(&self) -> u16 {
        self.tx_type
    }

    /// The known kind, if the tag is one.
    pub fn kind(&self) -> Option<TxType> {
        TxType::from_u16(self.tx_type)
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    /// Target chain, 0 when the config left it out.
    pub fn chain_id(&self) -> u16 {
        self.chain_id
    }

    pub fn from(&self) -> &Address {
        &self.from
    }

    pub fn to(&self) -> Option<&Address> {
        self.to.as_ref()
    }

    pub fn to_name(&self) -> &str {
        &self.to_name
    }

    pub fn gas_payer(&self) -> Option<&Address> {
        self.gas_payer.as_ref()
    }

    pub fn gas_price(&self) -> &BigUint {
        &self.gas_price
    }

    pub fn gas_limit(&self) -> u64 {
        self.gas_limit
    }

    pub fn amount(&self) -> &BigUint {
        &self.amount
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Raw payload bytes.
    pub fn data(&self) -> &[u8] {
        self.payload.bytes()
    }

    /// Payload as `0x` hex, or `""` when empty.
    pub fn data_hex(&self) -> String {
        data_to_hex(self.payload.bytes())
    }

    /// Box members; empty for every other kind.
    pub fn sub_transactions(&self) -> &[Transaction] {
        match &self.payload {
            Payload::Box { sub_txs, .. } => sub_txs,
            Payload::Data(_) => &[],
        }
    }

    /// Unix seconds.
    pub fn expiration_time(&self) -> u64 {
        self.expiration_time
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn sigs(&self) -> &[Signature] {
        &self.sigs
    }

    pub fn gas_payer_sigs(&self) -> &[Signature] {
        &self.gas_payer_sigs
    }

    // -----------------------------------------------------------------------
    // Encoding & hashes
    // -----------------------------------------------------------------------

    /// RLP bytes of the record in `mode`.
    pub fn serialize(&self, mode: RecordMode) -> Result<Vec<u8>, TxError> {
        Ok(encode_fields(&record_fields(self, mode, 0)?))
    }

    pub(crate) fn digest(&self, mode: RecordMode, depth: usize) -> Result<[u8; 32], TxError> {
        Ok(keccak256(&encode_fields(&record_fields(self, mode, depth)?)))
    }

    pub(crate) fn gas_digest(&self) -> [u8; 32] {
        keccak256(&encode_fields(&gas_record_fields(self)))
    }

    /// Transaction identity, over every field.
    pub fn hash(&self) -> Result<String, TxError> {
        Ok(prefixed_hex(&self.digest(RecordMode::Full, 0)?))
    }

    /// What the sender signs.
    pub fn hash_for_sign(&self) -> Result<String, TxError> {
        Ok(prefixed_hex(&self.digest(RecordMode::Sign, 0)?))
    }

    /// What the sender signs when a gas payer covers gas.
    pub fn hash_for_no_gas_sign(&self) -> Result<String, TxError> {
        Ok(prefixed_hex(&self.digest(RecordMode::NoGas, 0)?))
    }

    /// What the gas payer signs: sender signatures plus final gas terms.
    pub fn hash_for_gas_sign(&self) -> String {
        prefixed_hex(&self.gas_digest())
    }

    // -----------------------------------------------------------------------
    // Signing
    // -----------------------------------------------------------------------

    /// Sign the sign-hash with `key` and append the signature.
    pub fn sign_with(&mut self, key: &PrivateKey) -> Result<Signature, TxError> {
        let sig = Signer::sign(self, key)?;
        self.add_signature(sig);
        Ok(sig)
    }

    /// Sign the no-gas hash with `key` and append to `sigs`.
    pub fn sign_no_gas_with(&mut self, key: &PrivateKey) -> Result<Signature, TxError> {
        let sig = GasSigner::sign_no_gas(self, key)?;
        self.add_signature(sig);
        Ok(sig)
    }

    /// Sign the gas hash with `key` and append to `gasPayerSigs`.
    pub fn sign_gas_with(&mut self, key: &PrivateKey) -> Result<Signature, TxError> {
        let sig = GasSigner::sign_gas(self, key)?;
        self.add_gas_payer_signature(sig);
        Ok(sig)
    }

    /// Append a sender signature. Returns `false` if it was already there.
    pub fn add_signature(&mut self, sig: Signature) -> bool {
        push_unique(&mut self.sigs, sig)
    }

    /// Append a gas payer signature. Returns `false` if it was already there.
    pub fn add_gas_payer_signature(&mut self, sig: Signature) -> bool {
        push_unique(&mut self.gas_payer_sigs, sig)
    }

    /// Where this transaction stands, given how many sender signatures the
    /// account needs (1 for a plain account).
    pub fn signing_state(&self, required_signers: usize) -> SigningState {
        if self.sigs.is_empty() {
            SigningState::Unsigned
        } else if self.sigs.len() < required_signers {
            SigningState::PartiallySigned
        } else if self.gas_payer.is_some() && self.gas_payer_sigs.is_empty() {
            SigningState::GasPending
        } else {
            SigningState::Complete
        }
    }

    // -----------------------------------------------------------------------
    // Export
    // -----------------------------------------------------------------------

    /// Canonical export. Numbers are decimal strings; empty optionals are
    /// left out.
    pub fn to_json(&self) -> TxJson {
        TxJson {
            tx_type: self.tx_type.to_string(),
            version: self.version.to_string(),
            chain_id: (self.chain_id != 0).then(|| self.chain_id.to_string()),
            from: self.from.to_string(),
            gas_price: self.gas_price.to_str_radix(10),
            gas_limit: self.gas_limit.to_string(),
            amount: self.amount.to_str_radix(10),
            expiration_time: self.expiration_time.to_string(),
            gas_payer: self.gas_payer.map(|a| a.to_string()),
            to: self.to.map(|a| a.to_string()),
            to_name: non_empty(&self.to_name),
            data: non_empty(&self.data_hex()),
            message: non_empty(&self.message),
            sigs: hex_list(&self.sigs),
            gas_payer_sigs: hex_list(&self.gas_payer_sigs),
        }
    }

    /// [`Self::to_json`] rendered as a string.
    pub fn to_json_string(&self) -> Result<String, TxError> {
        Ok(serde_json::to_string(&self.to_json())?)
    }

    /// Export without `chainID`; the submitting client fills it in.
    pub fn to_broadcast_json(&self) -> TxJson {
        TxJson {
            chain_id: None,
            ..self.to_json()
        }
    }
}

fn non_empty(text: &str) -> Option<String> {
    (!text.is_empty()).then(|| text.to_string())
}

fn hex_list(sigs: &[Signature]) -> Option<Vec<String>> {
    (!sigs.is_empty()).then(|| sigs.iter().map(Signature::to_hex).collect())
}

fn default_expiration(chain: &ChainConfig) -> u64 {
    let now = u64::try_from(Utc::now().timestamp()).unwrap_or_default();
    now.saturating_add(chain.ttl_seconds)
}

fn parse_box(data: &[u8], chain: &ChainConfig, depth: usize) -> Result<Vec<Transaction>, TxError> {
    let envelope: BoxEnvelope =
        serde_json::from_slice(data).map_err(|_| TxError::InvalidBoxTransaction)?;

    let mut sub_txs = Vec::with_capacity(envelope.sub_tx_list.len());
    for item in envelope.sub_tx_list {
        let config: TxConfig = match item {
            serde_json::Value::String(text) => serde_json::from_str(&text),
            other => serde_json::from_value(other),
        }
        .map_err(|_| TxError::InvalidBoxTransaction)?;
        sub_txs.push(Transaction::with_depth(config, chain, depth + 1)?);
    }
    Ok(sub_txs)
}

fn parse_signatures(items: &[String]) -> Result<Vec<Signature>, TxError> {
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        let sig = Signature::from_hex(item).map_err(|e| TxError::InvalidSignature {
            reason: e.to_string(),
        })?;
        push_unique(&mut out, sig);
    }
    Ok(out)
}

fn push_unique(list: &mut Vec<Signature>, sig: Signature) -> bool {
    if list.contains(&sig) {
        return false;
    }
    list.push(sig);
    true
}

fn prefixed_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
