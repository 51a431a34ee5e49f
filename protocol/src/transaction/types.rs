//! Core type definitions for LemoChain transactions.
//!
//! [`TxConfig`] is the loose field mapping callers hand in: numbers may be
//! native numbers, decimal strings or `0x` hex strings, and `data` may be a
//! hex string or a JSON object. [`TxJson`] is the canonical export, every
//! number a decimal string.

use num_bigint::BigUint;
use num_traits::{Num, ToPrimitive, Zero};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::crypto::signatures::{decode_padded_hex, strip_hex_prefix};
use crate::error::TxError;

// ---------------------------------------------------------------------------
// TxType
// ---------------------------------------------------------------------------

/// Known transaction kinds.
///
/// On the wire the kind is a plain `u16`; unknown tags pass through
/// [`crate::transaction::Transaction`] untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum TxType {
    /// Transfer LEMO or call a contract.
    Ordinary = 0,
    /// Deploy a contract.
    CreateContract = 1,
    /// Set the sender's vote target.
    Vote = 2,
    /// Register or edit a consensus candidate.
    Candidate = 3,
    /// Create an asset definition.
    CreateAsset = 4,
    /// Issue units of an asset.
    IssueAsset = 5,
    /// Replenish an issued asset.
    ReplenishAsset = 6,
    /// Edit an asset profile.
    ModifyAsset = 7,
    /// Move issued asset units.
    TransferAsset = 8,
    /// Change an account's multisig signers.
    ModifySigners = 9,
    /// Bundle of sub-transactions executed as a unit.
    Box = 10,
}

impl TxType {
    /// Numeric wire tag.
    pub fn as_u16(self) -> u16 {
        self as u16
    }

    /// Map a wire tag back onto a known kind.
    pub fn from_u16(value: u16) -> Option<Self> {
        Some(match value {
            0 => Self::Ordinary,
            1 => Self::CreateContract,
            2 => Self::Vote,
            3 => Self::Candidate,
            4 => Self::CreateAsset,
            5 => Self::IssueAsset,
            6 => Self::ReplenishAsset,
            7 => Self::ModifyAsset,
            8 => Self::TransferAsset,
            9 => Self::ModifySigners,
            10 => Self::Box,
            _ => return None,
        })
    }
}

impl fmt::Display for TxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

// ---------------------------------------------------------------------------
// NumericInput
// ---------------------------------------------------------------------------

/// A number as callers supply it.
///
/// Deserializes from a JSON number or string. Strings starting with `0x`
/// become [`NumericInput::HexString`], other strings
/// [`NumericInput::DecimalString`]. Negative JSON numbers are kept as
/// `DecimalString("-n")` so validation can reject them as negative rather
/// than as a type error.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NumericInput {
    /// Native number.
    Number(u64),
    /// Base-10 digits.
    DecimalString(String),
    /// `0x`-prefixed base-16 digits.
    HexString(String),
}

impl NumericInput {
    /// Classify a string by its prefix.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.starts_with("0x") || text.starts_with("0X") {
            Self::HexString(text)
        } else {
            Self::DecimalString(text)
        }
    }

    /// True for the empty string, which callers use to mean "absent".
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::DecimalString(s) if s.is_empty())
    }

    /// Shape check: digits only, no sign.
    pub fn check(&self, field: &str) -> Result<(), TxError> {
        match self {
            Self::Number(_) => Ok(()),
            Self::DecimalString(s) => {
                if s.starts_with('-') {
                    return Err(TxError::Negative {
                        field: field.to_string(),
                    });
                }
                if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(TxError::must_be_number(field, s.as_str()));
                }
                Ok(())
            }
            Self::HexString(s) => {
                let digits = strip_hex_prefix(s);
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
                    return Err(TxError::must_be_number(field, s.as_str()));
                }
                Ok(())
            }
        }
    }

    /// Parse into an arbitrary-precision integer.
    pub fn to_biguint(&self, field: &str) -> Result<BigUint, TxError> {
        self.check(field)?;
        let parsed = match self {
            Self::Number(n) => Some(BigUint::from(*n)),
            Self::DecimalString(s) => BigUint::from_str_radix(s, 10).ok(),
            Self::HexString(s) => BigUint::from_str_radix(strip_hex_prefix(s), 16).ok(),
        };
        parsed.ok_or_else(|| TxError::must_be_number(field, self.to_string()))
    }

    /// Parse into a `u64`, rejecting values that do not fit.
    pub fn to_u64(&self, field: &str) -> Result<u64, TxError> {
        self.to_biguint(field)?
            .to_u64()
            .ok_or_else(|| TxError::InvalidRange {
                field: field.to_string(),
                value: self.to_string(),
                from: 0,
                to: u64::MAX,
            })
    }

    /// Parse and check `from <= value <= to`.
    pub fn to_u64_in_range(&self, field: &str, from: u64, to: u64) -> Result<u64, TxError> {
        let out_of_range = || TxError::InvalidRange {
            field: field.to_string(),
            value: self.to_string(),
            from,
            to,
        };
        let value = self.to_biguint(field)?.to_u64().ok_or_else(out_of_range)?;
        if value < from || value > to {
            return Err(out_of_range());
        }
        Ok(value)
    }
}

impl fmt::Display for NumericInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::DecimalString(s) | Self::HexString(s) => f.write_str(s),
        }
    }
}

impl From<u64> for NumericInput {
    fn from(value: u64) -> Self {
        Self::Number(value)
    }
}

impl From<TxType> for NumericInput {
    fn from(value: TxType) -> Self {
        Self::Number(value.as_u16() as u64)
    }
}

impl From<&str> for NumericInput {
    fn from(value: &str) -> Self {
        Self::from_text(value)
    }
}

impl From<String> for NumericInput {
    fn from(value: String) -> Self {
        Self::from_text(value)
    }
}

impl From<&BigUint> for NumericInput {
    fn from(value: &BigUint) -> Self {
        match value.to_u64() {
            Some(n) => Self::Number(n),
            None => Self::DecimalString(value.to_str_radix(10)),
        }
    }
}

impl Serialize for NumericInput {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Number(n) => serializer.serialize_u64(*n),
            Self::DecimalString(s) | Self::HexString(s) => serializer.serialize_str(s),
        }
    }
}

impl<'de> Deserialize<'de> for NumericInput {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct NumericVisitor;

        impl<'de> Visitor<'de> for NumericVisitor {
            type Value = NumericInput;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a number, a decimal string or a 0x-prefixed hex string")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(NumericInput::Number(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                if v < 0 {
                    Ok(NumericInput::DecimalString(v.to_string()))
                } else {
                    Ok(NumericInput::Number(v as u64))
                }
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                if v < 0.0 {
                    Ok(NumericInput::DecimalString(format!("{v}")))
                } else if v.fract() == 0.0 && v <= u64::MAX as f64 {
                    Ok(NumericInput::Number(v as u64))
                } else {
                    Err(E::invalid_value(de::Unexpected::Float(v), &self))
                }
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(NumericInput::from_text(v))
            }
        }

        deserializer.deserialize_any(NumericVisitor)
    }
}

// ---------------------------------------------------------------------------
// TxData
// ---------------------------------------------------------------------------

/// Transaction payload as supplied: hex bytes or a structured JSON value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TxData {
    /// Hex bytes, `0x` optional.
    Hex(String),
    /// Object or array, stored as its JSON text.
    Json(serde_json::Value),
}

impl TxData {
    /// True when the payload carries nothing.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Hex(s) => s.is_empty(),
            Self::Json(v) => v.is_null(),
        }
    }

    /// Shape check for the `data` field.
    pub fn check(&self) -> Result<(), TxError> {
        match self {
            Self::Hex(s) if decode_padded_hex(s).is_none() => Err(TxError::InvalidType {
                field: "data".into(),
                expected: "hex string or object".into(),
            }),
            Self::Json(v) if !(v.is_object() || v.is_array() || v.is_null()) => {
                Err(TxError::InvalidType {
                    field: "data".into(),
                    expected: "hex string or object".into(),
                })
            }
            _ => Ok(()),
        }
    }

    /// Raw payload bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, TxError> {
        self.check()?;
        match self {
            Self::Hex(s) => Ok(decode_padded_hex(s).unwrap_or_default()),
            Self::Json(v) if v.is_null() => Ok(Vec::new()),
            Self::Json(v) => Ok(serde_json::to_vec(v)?),
        }
    }
}

impl From<serde_json::Value> for TxData {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(s) => Self::Hex(s),
            other => Self::Json(other),
        }
    }
}

/// Render payload bytes: `0x`-prefixed lowercase hex, or `""` when empty.
pub fn data_to_hex(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        String::new()
    } else {
        format!("0x{}", hex::encode(bytes))
    }
}

// ---------------------------------------------------------------------------
// TxConfig
// ---------------------------------------------------------------------------

/// Caller-supplied transaction fields. Everything is optional here;
/// validation decides what is mandatory.
///
/// # Examples
///
/// ```
/// use lemo_tx::transaction::{NumericInput, TxConfig};
///
/// let config: TxConfig = serde_json::from_str(
///     r#"{"chainID": 100, "gasPrice": "0x3b9aca00", "amount": "1000"}"#,
/// ).unwrap();
/// assert_eq!(config.chain_id, Some(NumericInput::Number(100)));
/// assert_eq!(config.gas_price, Some(NumericInput::HexString("0x3b9aca00".into())));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TxConfig {
    /// Transaction kind tag.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub tx_type: Option<NumericInput>,
    /// Protocol version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<NumericInput>,
    /// Target chain.
    #[serde(rename = "chainID", skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<NumericInput>,
    /// Sender address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// Recipient address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    /// Recipient name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_name: Option<String>,
    /// Account paying gas in the two-phase protocol.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_payer: Option<String>,
    /// Price per gas, in mo.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<NumericInput>,
    /// Maximum gas.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_limit: Option<NumericInput>,
    /// Transferred value, in mo.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<NumericInput>,
    /// Payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<TxData>,
    /// Unix seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_time: Option<NumericInput>,
    /// Free text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Sender signatures, hex.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sigs: Option<Vec<String>>,
    /// Gas payer signatures, hex.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_payer_sigs: Option<Vec<String>>,
}

impl TxConfig {
    /// A config with only the sender set.
    pub fn from_sender(from: impl Into<String>) -> Self {
        Self {
            from: Some(from.into()),
            ..Self::default()
        }
    }

    /// Parse a JSON document.
    pub fn from_json(json: &str) -> Result<Self, TxError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// `Some` and non-empty.
pub(crate) fn present(value: &Option<NumericInput>) -> Option<&NumericInput> {
    value.as_ref().filter(|v| !v.is_empty())
}

/// `Some` and not the empty string.
pub(crate) fn present_str(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

// ---------------------------------------------------------------------------
// TxJson
// ---------------------------------------------------------------------------

/// Canonical export of a transaction. Numbers are decimal strings and
/// optional fields are absent rather than empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxJson {
    /// Kind tag.
    #[serde(rename = "type")]
    pub tx_type: String,
    /// Protocol version.
    pub version: String,
    /// Target chain; omitted when zero or for broadcast.
    #[serde(rename = "chainID", default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<String>,
    /// Sender address.
    pub from: String,
    /// Price per gas, in mo.
    pub gas_price: String,
    /// Maximum gas.
    pub gas_limit: String,
    /// Transferred value, in mo.
    pub amount: String,
    /// Unix seconds.
    pub expiration_time: String,
    /// Gas payer address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_payer: Option<String>,
    /// Recipient address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    /// Recipient name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_name: Option<String>,
    /// Payload hex.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    /// Free text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Sender signatures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sigs: Option<Vec<String>>,
    /// Gas payer signatures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_payer_sigs: Option<Vec<String>>,
}

impl From<TxJson> for TxConfig {
    fn from(json: TxJson) -> Self {
        Self {
            tx_type: Some(NumericInput::from_text(json.tx_type)),
            version: Some(NumericInput::from_text(json.version)),
            chain_id: json.chain_id.map(NumericInput::from_text),
            from: Some(json.from),
            to: json.to,
            to_name: json.to_name,
            gas_payer: json.gas_payer,
            gas_price: Some(NumericInput::from_text(json.gas_price)),
            gas_limit: Some(NumericInput::from_text(json.gas_limit)),
            amount: Some(NumericInput::from_text(json.amount)),
            data: json.data.map(TxData::Hex),
            expiration_time: Some(NumericInput::from_text(json.expiration_time)),
            message: json.message,
            sigs: json.sigs,
            gas_payer_sigs: json.gas_payer_sigs,
        }
    }
}

// ---------------------------------------------------------------------------
// SigningState
// ---------------------------------------------------------------------------

/// Where a transaction stands in the signing protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SigningState {
    /// No sender signature yet.
    Unsigned,
    /// Fewer sender signatures than the account requires.
    PartiallySigned,
    /// Sender signed, declared gas payer has not.
    GasPending,
    /// Ready to broadcast.
    Complete,
}

impl fmt::Display for SigningState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Zero is serialized as the empty byte string; everything else as
/// big-endian bytes with no leading zeros.
pub(crate) fn uint_bytes(value: &BigUint) -> Vec<u8> {
    if value.is_zero() {
        Vec::new()
    } else {
        value.to_bytes_be()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tx_type_roundtrip() {
        for tag in 0u16..=10 {
            assert_eq!(TxType::from_u16(tag).unwrap().as_u16(), tag);
        }
        assert_eq!(TxType::from_u16(11), None);
    }

    #[test]
    fn numeric_from_json_shapes() {
        let n: NumericInput = serde_json::from_str("42").unwrap();
        assert_eq!(n, NumericInput::Number(42));
        let d: NumericInput = serde_json::from_str("\"42\"").unwrap();
        assert_eq!(d, NumericInput::DecimalString("42".into()));
        let h: NumericInput = serde_json::from_str("\"0x2a\"").unwrap();
        assert_eq!(h, NumericInput::HexString("0x2a".into()));
        let neg: NumericInput = serde_json::from_str("-3").unwrap();
        assert_eq!(neg, NumericInput::DecimalString("-3".into()));
        assert!(serde_json::from_str::<NumericInput>("1.5").is_err());
        assert!(serde_json::from_str::<NumericInput>("true").is_err());
    }

    #[test]
    fn numeric_parse_all_forms() {
        assert_eq!(NumericInput::Number(7).to_u64("f").unwrap(), 7);
        assert_eq!(NumericInput::from("123").to_u64("f").unwrap(), 123);
        assert_eq!(NumericInput::from("0xff").to_u64("f").unwrap(), 255);
        assert_eq!(
            NumericInput::from("0x3b9aca00").to_biguint("f").unwrap(),
            BigUint::from(1_000_000_000u64)
        );
    }

    #[test]
    fn numeric_negative_before_shape() {
        let err = NumericInput::from("-1").check("amount").unwrap_err();
        assert!(matches!(err, TxError::Negative { ref field } if field == "amount"));
        let err = NumericInput::from("-abc").check("amount").unwrap_err();
        assert!(matches!(err, TxError::Negative { .. }));
    }

    #[test]
    fn numeric_rejects_garbage() {
        for bad in ["abc", "1.5", "0x", "0xzz", " 1"] {
            let err = NumericInput::from(bad).check("gasLimit").unwrap_err();
            assert!(
                matches!(err, TxError::MustBeNumber { .. }),
                "{bad} gave {err:?}"
            );
        }
    }

    #[test]
    fn numeric_range() {
        assert_eq!(
            NumericInput::from("0xffff")
                .to_u64_in_range("chainID", 1, 0xffff)
                .unwrap(),
            0xffff
        );
        assert!(matches!(
            NumericInput::Number(0).to_u64_in_range("chainID", 1, 0xffff),
            Err(TxError::InvalidRange { .. })
        ));
        assert!(matches!(
            NumericInput::from("0x10000").to_u64_in_range("chainID", 1, 0xffff),
            Err(TxError::InvalidRange { .. })
        ));
        assert!(matches!(
            NumericInput::from("99999999999999999999999").to_u64("gasLimit"),
            Err(TxError::InvalidRange { .. })
        ));
    }

    #[test]
    fn big_numbers_survive() {
        let text = "123456789012345678901234567890";
        let n = NumericInput::from(text).to_biguint("amount").unwrap();
        assert_eq!(n.to_str_radix(10), text);
        assert_eq!(NumericInput::from(&n), NumericInput::DecimalString(text.into()));
    }

    #[test]
    fn tx_data_forms() {
        let hex = TxData::Hex("0x0102".into());
        assert_eq!(hex.to_bytes().unwrap(), vec![1, 2]);
        let odd = TxData::Hex("abc".into());
        assert_eq!(odd.to_bytes().unwrap(), vec![0x0a, 0xbc]);
        let json = TxData::Json(serde_json::json!({"a": 1}));
        assert_eq!(json.to_bytes().unwrap(), br#"{"a":1}"#.to_vec());
        assert!(TxData::Hex("xyz".into()).check().is_err());
        assert!(TxData::Json(serde_json::json!(5)).check().is_err());
    }

    #[test]
    fn tx_data_deserializes_untagged() {
        let c: TxConfig = serde_json::from_str(r#"{"data":"0x01"}"#).unwrap();
        assert_eq!(c.data, Some(TxData::Hex("0x01".into())));
        let c: TxConfig = serde_json::from_str(r#"{"data":{"k":"v"}}"#).unwrap();
        assert_eq!(c.data, Some(TxData::Json(serde_json::json!({"k": "v"}))));
    }

    #[test]
    fn data_hex_rendering() {
        assert_eq!(data_to_hex(&[]), "");
        assert_eq!(data_to_hex(&[0x0a, 0xBC]), "0x0abc");
    }

    #[test]
    fn tx_config_uses_wire_names() {
        let config = TxConfig {
            tx_type: Some(TxType::Vote.into()),
            chain_id: Some(100u64.into()),
            to_name: Some("alice".into()),
            gas_payer_sigs: Some(vec![]),
            ..TxConfig::default()
        };
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["type"], 2);
        assert_eq!(json["chainID"], 100);
        assert_eq!(json["toName"], "alice");
        assert!(json.get("gasPayerSigs").is_some());
        assert!(json.get("from").is_none());
    }

    #[test]
    fn uint_bytes_trims() {
        assert!(uint_bytes(&BigUint::zero()).is_empty());
        assert_eq!(uint_bytes(&BigUint::from(0x0100u32)), vec![1, 0]);
    }
}
