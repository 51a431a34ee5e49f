//! Structural validation of caller-supplied transaction fields.
//!
//! Every check here is pure and runs before any [`super::Transaction`]
//! exists, so a failing config never produces a half-built object. Checks
//! run in a fixed order and the first failure is returned.
//!
//! The payload-specific validators live next to their value objects in
//! [`super::payload`] and reuse the helpers below.

use crate::address::Address;
use crate::config::{MAX_TX_MESSAGE_LENGTH, MAX_TX_TO_NAME_LENGTH, TX_SIG_BYTE_LENGTH};
use crate::crypto::signatures::strip_hex_prefix;
use crate::error::TxError;

use super::types::{present, present_str, NumericInput, TxConfig};

/// Validate a transaction config.
///
/// 1. `chainID` — numeric, `[1, 0xFFFF]`, only when given.
/// 2. `from` — required, well-formed address.
/// 3. `type` / `version` — numeric, `[0, 0xFFFF]` / `[0, 0xFF]`.
/// 4. `to` / `gasPayer` — well-formed addresses when given.
/// 5. `toName` — at most 100 characters from `[A-Za-z0-9_.-]`.
/// 6. `gasPrice` / `gasLimit` / `amount` / `expirationTime` — non-negative numbers.
/// 7. `data` — hex string or JSON object.
/// 8. `message` — at most 1024 characters.
/// 9. `sigs[i]` / `gasPayerSigs[i]` — hex, at most 65 bytes.
pub fn validate_tx_config(config: &TxConfig) -> Result<(), TxError> {
    if let Some(chain_id) = present(&config.chain_id) {
        chain_id.to_u64_in_range("chainID", 1, 0xffff)?;
    }

    let from = present_str(&config.from).ok_or_else(|| TxError::required("from"))?;
    check_address(from)?;

    if let Some(tx_type) = present(&config.tx_type) {
        tx_type.to_u64_in_range("type", 0, 0xffff)?;
    }
    if let Some(version) = present(&config.version) {
        version.to_u64_in_range("version", 0, 0xff)?;
    }

    if let Some(to) = present_str(&config.to) {
        check_address(to)?;
    }
    if let Some(gas_payer) = present_str(&config.gas_payer) {
        check_address(gas_payer)?;
    }

    if let Some(to_name) = present_str(&config.to_name) {
        check_max_length(to_name, "toName", MAX_TX_TO_NAME_LENGTH)?;
        check_to_name(to_name)?;
    }

    check_optional_numeric(&config.gas_price, "gasPrice")?;
    check_optional_numeric(&config.gas_limit, "gasLimit")?;
    check_optional_numeric(&config.amount, "amount")?;

    if let Some(data) = config.data.as_ref().filter(|d| !d.is_empty()) {
        data.check()?;
    }

    check_optional_numeric(&config.expiration_time, "expirationTime")?;

    if let Some(message) = present_str(&config.message) {
        check_max_length(message, "message", MAX_TX_MESSAGE_LENGTH)?;
    }

    if let Some(sigs) = &config.sigs {
        check_signatures(sigs, "sigs")?;
    }
    if let Some(sigs) = &config.gas_payer_sigs {
        check_signatures(sigs, "gasPayerSigs")?;
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Field checks
// ---------------------------------------------------------------------------

pub(crate) fn check_address(text: &str) -> Result<Address, TxError> {
    Ok(Address::parse(text)?)
}

pub(crate) fn check_optional_numeric(
    value: &Option<NumericInput>,
    field: &str,
) -> Result<(), TxError> {
    match present(value) {
        Some(v) => v.check(field),
        None => Ok(()),
    }
}

/// At most `max` characters (not bytes).
pub(crate) fn check_max_length(value: &str, field: &str, max: usize) -> Result<(), TxError> {
    let actual = value.chars().count();
    if actual > max {
        return Err(TxError::InvalidMaxLength {
            field: field.to_string(),
            max,
            actual,
        });
    }
    Ok(())
}

/// Exactly `expected` characters.
pub(crate) fn check_exact_length(value: &str, field: &str, expected: usize) -> Result<(), TxError> {
    let actual = value.chars().count();
    if actual != expected {
        return Err(TxError::InvalidLength {
            field: field.to_string(),
            value: value.to_string(),
            expected,
            actual,
        });
    }
    Ok(())
}

/// `0x` followed by hex digits only, e.g. asset codes.
pub(crate) fn check_prefixed_hex(value: &str, field: &str) -> Result<(), TxError> {
    let digits = value.strip_prefix("0x").ok_or_else(|| TxError::InvalidType {
        field: field.to_string(),
        expected: "0x-prefixed hex string".into(),
    })?;
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(TxError::InvalidType {
            field: field.to_string(),
            expected: "0x-prefixed hex string".into(),
        });
    }
    Ok(())
}

/// Hex digits with an optional `0x` prefix.
pub(crate) fn check_hex(value: &str, field: &str) -> Result<(), TxError> {
    if !strip_hex_prefix(value).bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(TxError::must_be_number(field, value));
    }
    Ok(())
}

fn check_to_name(value: &str) -> Result<(), TxError> {
    let valid = value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if !valid {
        return Err(TxError::InvalidToName {
            value: value.to_string(),
        });
    }
    Ok(())
}

fn check_signatures(sigs: &[String], field: &str) -> Result<(), TxError> {
    for (index, sig) in sigs.iter().enumerate() {
        let name = format!("{field}[{index}]");
        if !strip_hex_prefix(sig).bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(TxError::InvalidType {
                field: name,
                expected: "hex string".into(),
            });
        }
        let actual = strip_hex_prefix(sig).len().div_ceil(2);
        if actual > TX_SIG_BYTE_LENGTH {
            return Err(TxError::InvalidMaxBytes {
                field: name,
                value: sig.clone(),
                max: TX_SIG_BYTE_LENGTH,
                actual,
            });
        }
    }
    Ok(())
}

/// `local@domain.tld`: the local part is word characters, hyphens and single
/// dots; the domain has at least one dotted label and a 2–4 character
/// alphanumeric top-level label.
pub(crate) fn check_email(value: &str) -> Result<(), TxError> {
    let invalid = || TxError::InvalidEmail {
        value: value.to_string(),
    };
    let is_word = |c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-';

    let (local, domain) = value.split_once('@').ok_or_else(invalid)?;

    if local.is_empty() || local.starts_with('.') || local.contains("..") {
        return Err(invalid());
    }
    if !local.chars().all(|c| is_word(c) || c == '.') {
        return Err(invalid());
    }

    let labels: Vec<&str> = domain.split('.').collect();
    let (tld, hosts) = labels.split_last().ok_or_else(invalid)?;
    if hosts.is_empty() || hosts.iter().any(|l| l.is_empty() || !l.chars().all(is_word)) {
        return Err(invalid());
    }
    if !(2..=4).contains(&tld.len()) || !tld.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(invalid());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
