//! # Deep Links
//!
//! `lemo://` URIs hand a payment or a sign request from one application to
//! another (a dapp to a wallet, a QR code to a phone). Field names are
//! shortened to one or two letters:
//!
//! ```text
//! ty v  c       f    t  tn     p        gp       gl       a      d    e              m       s    gs           r
//! type version chainID from to toName gasPayer gasPrice gasLimit amount data expirationTime message sigs gasPayerSigs receiver
//! ```
//!
//! On the wire `gp` is in Gmo (10⁹ mo), `a` in LEMO (10¹⁸ mo) and `e` in
//! seconds; the decoded [`TxConfig`] carries mo and milliseconds. `m` is
//! base64url without padding. Repeated `s` / `gs` keys (or their `s[]` /
//! `gs[]` spellings) decode to a list in the order they appear.
//!
//! The wire form carries values, not input shapes: decoded numbers are
//! [`NumericInput::Number`] whenever they fit in a `u64`, so a decimal or
//! hex string on the way in comes back as the same value in native form.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use num_bigint::BigUint;
use num_traits::Num;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::form_urlencoded;

use crate::config::{
    AMOUNT_UNIT_DECIMALS, GAS_PRICE_UNIT_DECIMALS, PAY_DEEP_LINK_PREFIX, SIGN_DEEP_LINK_PREFIX,
};
use crate::error::TxError;
use crate::transaction::types::{data_to_hex, present, present_str, NumericInput, TxConfig, TxData};
use crate::transaction::validation::{check_address, check_hex};

/// Milliseconds in the decoded form, seconds on the wire.
const EXPIRATION_UNIT_DECIMALS: u32 = 3;

/// A decoded deep link.
#[derive(Debug, Clone, PartialEq)]
pub enum DeepLink {
    /// `lemo://pay/tx?…`
    Pay(TxConfig),
    /// `lemo://sign/msg?…`
    Sign(SignRequest),
}

/// Ask a wallet to sign a text message or a hex blob.
///
/// Exactly one of `message` and `data` must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Hex string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    /// Expected signer address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signer: Option<String>,
    /// Where the wallet should send the result.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receiver: Option<String>,
}

impl SignRequest {
    pub fn validate(&self) -> Result<(), TxError> {
        match (present_str(&self.message), present_str(&self.data)) {
            (Some(_), None) => {}
            (None, Some(data)) => check_hex(data, "data")?,
            _ => return Err(TxError::InvalidSignDeepLink),
        }
        if let Some(signer) = present_str(&self.signer) {
            check_address(signer)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Encode a payment request.
///
/// Each present field is checked on its own; no field is required, so a
/// link may leave the sender for the wallet to fill in.
///
/// # Examples
///
/// ```
/// use lemo_tx::deeplink::{create_pay_deep_link, parse_deep_link, DeepLink};
/// use lemo_tx::transaction::TxConfig;
///
/// let config = TxConfig {
///     gas_price: Some(3_000_000_000u64.into()),
///     message: Some("coffee".into()),
///     ..TxConfig::default()
/// };
/// let uri = create_pay_deep_link(&config).unwrap();
/// assert_eq!(uri, "lemo://pay/tx?gp=3&m=Y29mZmVl");
/// assert_eq!(parse_deep_link(&uri).unwrap(), DeepLink::Pay(config));
/// ```
pub fn create_pay_deep_link(config: &TxConfig) -> Result<String, TxError> {
    let mut query = form_urlencoded::Serializer::new(String::new());

    if let Some(v) = present(&config.tx_type) {
        query.append_pair("ty", &v.to_u64_in_range("type", 0, 0xffff)?.to_string());
    }
    if let Some(v) = present(&config.version) {
        query.append_pair("v", &v.to_u64_in_range("version", 0, 0xff)?.to_string());
    }
    if let Some(v) = present(&config.chain_id) {
        query.append_pair("c", &v.to_u64_in_range("chainID", 1, 0xffff)?.to_string());
    }
    for (key, value) in [("f", &config.from), ("t", &config.to)] {
        if let Some(address) = present_str(value) {
            check_address(address)?;
            query.append_pair(key, address);
        }
    }
    if let Some(name) = present_str(&config.to_name) {
        query.append_pair("tn", name);
    }
    if let Some(payer) = present_str(&config.gas_payer) {
        check_address(payer)?;
        query.append_pair("p", payer);
    }
    if let Some(v) = present(&config.gas_price) {
        let price = v.to_biguint("gasPrice")?;
        query.append_pair("gp", &format_scaled(&price, GAS_PRICE_UNIT_DECIMALS));
    }
    if let Some(v) = present(&config.gas_limit) {
        query.append_pair("gl", &v.to_u64("gasLimit")?.to_string());
    }
    if let Some(v) = present(&config.amount) {
        let amount = v.to_biguint("amount")?;
        query.append_pair("a", &format_scaled(&amount, AMOUNT_UNIT_DECIMALS));
    }
    if let Some(data) = config.data.as_ref().filter(|d| !d.is_empty()) {
        query.append_pair("d", &data_to_hex(&data.to_bytes()?));
    }
    if let Some(v) = present(&config.expiration_time) {
        let millis = v.to_biguint("expirationTime")?;
        query.append_pair("e", &format_scaled(&millis, EXPIRATION_UNIT_DECIMALS));
    }
    if let Some(message) = present_str(&config.message) {
        query.append_pair("m", &URL_SAFE_NO_PAD.encode(message));
    }
    for sig in config.sigs.iter().flatten() {
        query.append_pair("s", sig);
    }
    for sig in config.gas_payer_sigs.iter().flatten() {
        query.append_pair("gs", sig);
    }

    Ok(format!("{PAY_DEEP_LINK_PREFIX}{}", query.finish()))
}

/// Encode a sign request.
pub fn create_sign_deep_link(request: &SignRequest) -> Result<String, TxError> {
    request.validate()?;
    let mut query = form_urlencoded::Serializer::new(String::new());

    if let Some(message) = present_str(&request.message) {
        query.append_pair("m", &URL_SAFE_NO_PAD.encode(message));
    }
    if let Some(data) = present_str(&request.data) {
        query.append_pair("d", &URL_SAFE_NO_PAD.encode(data));
    }
    if let Some(signer) = present_str(&request.signer) {
        query.append_pair("f", signer);
    }
    if let Some(receiver) = present_str(&request.receiver) {
        query.append_pair("r", receiver);
    }

    Ok(format!("{SIGN_DEEP_LINK_PREFIX}{}", query.finish()))
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Decode either kind of deep link.
pub fn parse_deep_link(uri: &str) -> Result<DeepLink, TxError> {
    let invalid = || TxError::InvalidDeepLink {
        uri: uri.to_string(),
    };
    let (head, query) = uri.split_once('?').ok_or_else(invalid)?;
    let prefix = &uri[..head.len() + 1];

    let link = if prefix == PAY_DEEP_LINK_PREFIX {
        if query.is_empty() {
            return Err(invalid());
        }
        DeepLink::Pay(parse_pay(uri, query)?)
    } else if prefix == SIGN_DEEP_LINK_PREFIX {
        if query.is_empty() {
            return Err(invalid());
        }
        DeepLink::Sign(parse_sign(uri, query)?)
    } else {
        return Err(TxError::InvalidDeepLinkType {
            prefix: prefix.to_string(),
        });
    };
    debug!(uri, "parsed deep link");
    Ok(link)
}

fn parse_pay(uri: &str, query: &str) -> Result<TxConfig, TxError> {
    let mut config = TxConfig::default();

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        let value = value.into_owned();
        match key.as_ref() {
            "ty" => config.tx_type = Some(integer(value)),
            "v" => config.version = Some(integer(value)),
            "c" => config.chain_id = Some(integer(value)),
            "f" => config.from = Some(value),
            "t" => config.to = Some(value),
            "tn" => config.to_name = Some(value),
            "p" => config.gas_payer = Some(value),
            "gp" => {
                let price = parse_scaled(&value, GAS_PRICE_UNIT_DECIMALS)?;
                config.gas_price = Some(NumericInput::from(&price));
            }
            "gl" => config.gas_limit = Some(integer(value)),
            "a" => {
                let amount = parse_scaled(&value, AMOUNT_UNIT_DECIMALS)?;
                config.amount = Some(NumericInput::from(&amount));
            }
            "d" => config.data = Some(TxData::Hex(value)),
            "e" => {
                let millis = parse_scaled(&value, EXPIRATION_UNIT_DECIMALS)?;
                config.expiration_time = Some(NumericInput::from(&millis));
            }
            "m" => config.message = Some(decode_text(uri, &value)?),
            "s" | "s[]" => config.sigs.get_or_insert_with(Vec::new).push(value),
            "gs" | "gs[]" => config.gas_payer_sigs.get_or_insert_with(Vec::new).push(value),
            _ => {}
        }
    }
    Ok(config)
}

fn parse_sign(uri: &str, query: &str) -> Result<SignRequest, TxError> {
    let mut request = SignRequest::default();

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            "m" => request.message = Some(decode_text(uri, &value)?),
            "d" => request.data = Some(decode_text(uri, &value)?),
            "f" => request.signer = Some(value.into_owned()),
            "r" => request.receiver = Some(value.into_owned()),
            _ => {}
        }
    }
    request.validate()?;
    Ok(request)
}

/// Integers stay native when they parse; anything else is kept as text for
/// the validator to report.
fn integer(value: String) -> NumericInput {
    match value.parse::<u64>() {
        Ok(n) => NumericInput::Number(n),
        Err(_) => NumericInput::from_text(value),
    }
}

fn decode_text(uri: &str, value: &str) -> Result<String, TxError> {
    let invalid = || TxError::InvalidDeepLink {
        uri: uri.to_string(),
    };
    let bytes = URL_SAFE_NO_PAD.decode(value).map_err(|_| invalid())?;
    String::from_utf8(bytes).map_err(|_| invalid())
}

// ---------------------------------------------------------------------------
// Scaled decimals
// ---------------------------------------------------------------------------

/// Parse a decimal with at most `decimals` fraction digits and scale it by
/// `10^decimals`: `parse_scaled("2.5", 9)` is 2 500 000 000.
pub fn parse_scaled(text: &str, decimals: u32) -> Result<BigUint, TxError> {
    let wrong = || TxError::MoneyFormat {
        value: text.to_string(),
    };
    let (int, frac) = text.split_once('.').unwrap_or((text, ""));
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());

    if (int.is_empty() && frac.is_empty()) || !all_digits(int) || !all_digits(frac) {
        return Err(wrong());
    }
    if frac.len() > decimals as usize {
        return Err(wrong());
    }

    let digits = format!("{int}{frac:0<width$}", width = decimals as usize);
    BigUint::from_str_radix(&digits, 10).map_err(|_| wrong())
}

/// Inverse of [`parse_scaled`], with trailing fraction zeros dropped.
pub fn format_scaled(value: &BigUint, decimals: u32) -> String {
    let decimals = decimals as usize;
    let digits = value.to_str_radix(10);
    if decimals == 0 {
        return digits;
    }

    let padded = format!("{digits:0>width$}", width = decimals + 1);
    let (int, frac) = padded.split_at(padded.len() - decimals);
    let frac = frac.trim_end_matches('0');
    if frac.is_empty() {
        int.to_string()
    } else {
        format!("{int}.{frac}")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
