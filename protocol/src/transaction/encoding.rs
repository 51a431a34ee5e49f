//! Canonical RLP records.
//!
//! A transaction is hashed as an RLP list of byte strings in a fixed order.
//! Reordering, adding or dropping a field silently changes every hash, and
//! the chain nodes compute the same lists independently, so the layouts
//! below are protocol:
//!
//! ```text
//!  #  field           full  sign  no-gas
//!  1  type             x     x     x
//!  2  version          x     x     x
//!  3  chainID          x     x     x
//!  4  from (20 B)      x     x     x
//!  5  gasPayer (20 B)  x     x     x
//!  6  to (20 B)        x     x     x
//!  7  toName           x     x     x
//!  8  gasPrice         x     x
//!  9  gasLimit         x     x
//! 10  amount           x     x     x
//! 11  data             x     x     x
//! 12  expirationTime   x     x     x
//! 13  message          x     x     x
//! 14  sigs (list)      x
//! 15  gasPayerSigs     x
//! ```
//!
//! The gas record is `[sigs (list), gasPrice, gasLimit]`.
//!
//! Numeric fields are big-endian with leading zero bytes trimmed, so zero
//! is the empty string. Absent addresses are the empty string. For a box
//! transaction, field 11 is the list of sub-transaction hashes in the
//! record's own mode instead of the raw payload.

use num_bigint::BigUint;
use rlp::RlpStream;
use tracing::warn;

use crate::address::Address;
use crate::error::TxError;

use super::tx::{Payload, Transaction};
use super::types::uint_bytes;

/// Which field layout to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordMode {
    /// Every field; hashes to the transaction identity.
    Full,
    /// Fields 1–13; what the sender signs.
    Sign,
    /// Fields 1–7 and 10–13; what the sender signs when a gas payer is
    /// declared.
    NoGas,
}

/// One element of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RlpField {
    /// A byte string.
    Bytes(Vec<u8>),
    /// A list of byte strings.
    List(Vec<Vec<u8>>),
}

/// Ordered field list for `tx` in `mode`.
///
/// `depth` is 0 for a top-level transaction and 1 for a box member. A box
/// at depth 1 or deeper is rejected.
pub fn record_fields(
    tx: &Transaction,
    mode: RecordMode,
    depth: usize,
) -> Result<Vec<RlpField>, TxError> {
    let mut fields = Vec::with_capacity(15);

    fields.push(uint_field(tx.tx_type()));
    fields.push(uint_field(tx.version()));
    fields.push(uint_field(tx.chain_id()));
    fields.push(RlpField::Bytes(tx.from().as_bytes().to_vec()));
    fields.push(RlpField::Bytes(address_bytes(tx.gas_payer())));
    fields.push(RlpField::Bytes(address_bytes(tx.to())));
    fields.push(RlpField::Bytes(tx.to_name().as_bytes().to_vec()));

    if mode != RecordMode::NoGas {
        fields.push(RlpField::Bytes(uint_bytes(tx.gas_price())));
        fields.push(uint_field(tx.gas_limit()));
    }

    fields.push(RlpField::Bytes(uint_bytes(tx.amount())));
    fields.push(payload_field(tx, mode, depth)?);
    fields.push(uint_field(tx.expiration_time()));
    fields.push(RlpField::Bytes(tx.message().as_bytes().to_vec()));

    if mode == RecordMode::Full {
        fields.push(signature_list(tx.sigs().iter().map(|s| s.as_bytes().to_vec())));
        fields.push(signature_list(
            tx.gas_payer_sigs().iter().map(|s| s.as_bytes().to_vec()),
        ));
    }

    Ok(fields)
}

/// The gas payer's record: `[sigs, gasPrice, gasLimit]`.
pub fn gas_record_fields(tx: &Transaction) -> Vec<RlpField> {
    vec![
        signature_list(tx.sigs().iter().map(|s| s.as_bytes().to_vec())),
        RlpField::Bytes(uint_bytes(tx.gas_price())),
        uint_field(tx.gas_limit()),
    ]
}

/// RLP-encode a field list.
pub fn encode_fields(fields: &[RlpField]) -> Vec<u8> {
    let mut stream = RlpStream::new_list(fields.len());
    for field in fields {
        match field {
            RlpField::Bytes(bytes) => {
                stream.append(bytes);
            }
            RlpField::List(items) => {
                stream.begin_list(items.len());
                for item in items {
                    stream.append(item);
                }
            }
        }
    }
    stream.out().to_vec()
}

fn uint_field(value: impl Into<BigUint>) -> RlpField {
    RlpField::Bytes(uint_bytes(&value.into()))
}

fn address_bytes(address: Option<&Address>) -> Vec<u8> {
    address.map(|a| a.as_bytes().to_vec()).unwrap_or_default()
}

fn signature_list(items: impl Iterator<Item = Vec<u8>>) -> RlpField {
    RlpField::List(items.collect())
}

fn payload_field(tx: &Transaction, mode: RecordMode, depth: usize) -> Result<RlpField, TxError> {
    match tx.payload() {
        Payload::Data(bytes) => Ok(RlpField::Bytes(bytes.clone())),
        Payload::Box { sub_txs, .. } => {
            if depth >= 1 {
                warn!(depth, "box transaction nested inside a box");
                return Err(TxError::InvalidBoxTransaction);
            }
            let mut hashes = Vec::with_capacity(sub_txs.len());
            for sub in sub_txs {
                let sub_mode = match mode {
                    RecordMode::Full => RecordMode::Full,
                    RecordMode::Sign | RecordMode::NoGas => RecordMode::Sign,
                };
                hashes.push(sub.digest(sub_mode, depth + 1)?.to_vec());
            }
            Ok(RlpField::List(hashes))
        }
    }
}
