//! Kind-specific payload value objects.
//!
//! Each special transaction carries a small JSON document in its `data`
//! field. The structs below are those documents: callers fill them in, the
//! factory calls `validate` and then serializes them into the payload.
//! Field declaration order is serialization order, and serialization order
//! is part of the hashed bytes.

use serde::{Deserialize, Serialize};

use crate::config::{
    MAX_ASSET_DESCRIPTION_LENGTH, MAX_DECIMAL_DIGITS, MAX_DEPUTY_FIELD_LENGTH,
    MAX_DEPUTY_LONG_FIELD_LENGTH, NODE_ID_LENGTH, TX_ASSET_CODE_LENGTH, TX_ASSET_ID_LENGTH,
};
use crate::crypto::signatures::decode_padded_hex;
use crate::error::TxError;

use super::types::{NumericInput, TxConfig};
use super::validation::{
    check_address, check_email, check_exact_length, check_hex, check_max_length,
    check_prefixed_hex,
};

// ---------------------------------------------------------------------------
// Candidate
// ---------------------------------------------------------------------------

/// Candidate registration or edit, as supplied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CandidateInfo {
    /// `false` withdraws the candidacy. Defaults to `true`.
    pub is_candidate: Option<bool>,
    /// Node display name.
    pub name: Option<String>,
    /// Operating team.
    pub team_name: Option<String>,
    /// Account receiving mining rewards.
    pub income_address: Option<String>,
    /// Block-signing public key: 64 bytes as 128 hex characters, no prefix.
    #[serde(rename = "nodeID")]
    pub node_id: String,
    /// IP or domain of the node.
    pub host: String,
    /// Port of the node.
    pub port: Option<NumericInput>,
    pub introduction: Option<String>,
    /// Support contact.
    pub email: Option<String>,
}

/// The candidate document as it lands in the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateProfile {
    /// `"true"` or `"false"`.
    pub is_candidate: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub income_address: Option<String>,
    #[serde(rename = "nodeID")]
    pub node_id: String,
    pub host: String,
    /// Decimal port number.
    pub port: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub introduction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl CandidateInfo {
    pub fn validate(&self) -> Result<(), TxError> {
        check_exact_length(&self.node_id, "nodeID", NODE_ID_LENGTH)?;
        if !self.node_id.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(TxError::InvalidType {
                field: "nodeID".into(),
                expected: "hex string without 0x prefix".into(),
            });
        }

        if self.host.is_empty() {
            return Err(TxError::required("host"));
        }
        check_max_length(&self.host, "host", MAX_DEPUTY_FIELD_LENGTH)?;

        let port = self.port.as_ref().ok_or_else(|| TxError::required("port"))?;
        port.to_u64_in_range("port", 1, 0xffff)?;

        if let Some(name) = non_empty(&self.name) {
            check_max_length(name, "name", MAX_DEPUTY_FIELD_LENGTH)?;
        }
        if let Some(team) = non_empty(&self.team_name) {
            check_max_length(team, "teamName", MAX_DEPUTY_FIELD_LENGTH)?;
        }
        if let Some(income) = non_empty(&self.income_address) {
            check_address(income)?;
        }
        if let Some(intro) = non_empty(&self.introduction) {
            check_max_length(intro, "introduction", MAX_DEPUTY_LONG_FIELD_LENGTH)?;
        }
        if let Some(email) = non_empty(&self.email) {
            check_max_length(email, "email", MAX_DEPUTY_FIELD_LENGTH)?;
            check_email(email)?;
        }
        Ok(())
    }

    /// Validate and normalize into the payload document.
    pub fn to_profile(&self) -> Result<CandidateProfile, TxError> {
        self.validate()?;
        let port = self
            .port
            .as_ref()
            .ok_or_else(|| TxError::required("port"))?
            .to_u64_in_range("port", 1, 0xffff)?;

        Ok(CandidateProfile {
            is_candidate: self.is_candidate.unwrap_or(true).to_string(),
            name: self.name.clone(),
            team_name: self.team_name.clone(),
            income_address: self.income_address.clone(),
            node_id: self.node_id.clone(),
            host: self.host.clone(),
            port: port.to_string(),
            introduction: self.introduction.clone(),
            email: self.email.clone(),
        })
    }
}

// ---------------------------------------------------------------------------
// Assets
// ---------------------------------------------------------------------------

/// Freeze flag of an asset profile: a bool, or the strings `"true"` /
/// `"false"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FreezeFlag {
    Bool(bool),
    Text(String),
}

impl FreezeFlag {
    /// The flag as a bool, rejecting any other text.
    pub fn as_bool(&self) -> Result<bool, TxError> {
        match self {
            Self::Bool(b) => Ok(*b),
            Self::Text(t) if t == "true" => Ok(true),
            Self::Text(t) if t == "false" => Ok(false),
            Self::Text(_) => Err(TxError::InvalidSymbol {
                field: "freeze".into(),
            }),
        }
    }

    fn normalized(&self) -> Result<Self, TxError> {
        Ok(Self::Text(self.as_bool()?.to_string()))
    }
}

/// Descriptive profile of a new asset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssetProfile {
    pub name: String,
    pub symbol: String,
    pub description: String,
    /// Numeric string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_gas_limit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freeze: Option<FreezeFlag>,
}

/// Asset definition for a CreateAsset transaction.
///
/// # Examples
///
/// ```
/// use lemo_tx::transaction::{AssetProfile, CreateAssetInfo};
///
/// let info = CreateAssetInfo {
///     category: Some(1u64.into()),
///     decimal: Some(18u64.into()),
///     is_replenishable: true,
///     is_divisible: true,
///     profile: AssetProfile {
///         name: "Demo Asset".into(),
///         symbol: "DT".into(),
///         ..AssetProfile::default()
///     },
/// };
/// info.validate().unwrap();
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateAssetInfo {
    /// 1, 2 or 3.
    pub category: Option<NumericInput>,
    /// Decimal places, 0 to 18.
    pub decimal: Option<NumericInput>,
    pub is_replenishable: bool,
    pub is_divisible: bool,
    pub profile: AssetProfile,
}

impl CreateAssetInfo {
    pub fn validate(&self) -> Result<(), TxError> {
        let category = self
            .category
            .as_ref()
            .ok_or_else(|| TxError::required("category"))?;
        category.to_u64_in_range("category", 1, 3)?;

        let decimal = self
            .decimal
            .as_ref()
            .ok_or_else(|| TxError::required("decimal"))?;
        decimal.to_u64_in_range("decimal", 0, MAX_DECIMAL_DIGITS)?;

        check_max_length(
            &self.profile.description,
            "description",
            MAX_ASSET_DESCRIPTION_LENGTH,
        )?;
        check_gas_limit_hint(&self.profile.suggested_gas_limit)?;
        if let Some(freeze) = &self.profile.freeze {
            freeze.as_bool()?;
        }
        Ok(())
    }

    /// Validate and normalize: numbers become plain numbers and `freeze`
    /// defaults to `"false"`.
    pub fn to_payload(&self) -> Result<Self, TxError> {
        self.validate()?;
        let as_number = |v: &Option<NumericInput>, field: &str| -> Result<_, TxError> {
            Ok(match v {
                Some(n) => Some(NumericInput::Number(n.to_u64(field)?)),
                None => None,
            })
        };
        let freeze = match &self.profile.freeze {
            Some(flag) => flag.normalized()?,
            None => FreezeFlag::Text("false".into()),
        };

        Ok(Self {
            category: as_number(&self.category, "category")?,
            decimal: as_number(&self.decimal, "decimal")?,
            profile: AssetProfile {
                freeze: Some(freeze),
                ..self.profile.clone()
            },
            ..self.clone()
        })
    }
}

/// Issue units of an existing asset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IssueAssetInfo {
    /// `0x` + 64 hex characters.
    pub asset_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_data: Option<String>,
    /// Non-negative decimal string; hex is not accepted.
    pub supply_amount: Option<String>,
}

impl IssueAssetInfo {
    pub fn validate(&self) -> Result<(), TxError> {
        check_asset_key(&self.asset_code, "assetCode", TX_ASSET_CODE_LENGTH)?;
        if let Some(meta) = non_empty(&self.meta_data) {
            check_max_length(meta, "metaData", MAX_ASSET_DESCRIPTION_LENGTH)?;
        }

        let supply = self
            .supply_amount
            .as_deref()
            .ok_or_else(|| TxError::required("supplyAmount"))?;
        if supply.starts_with('-') {
            return Err(TxError::Negative {
                field: "supplyAmount".into(),
            });
        }
        if supply.starts_with("0x") || supply.starts_with("0X") {
            return Err(TxError::NotDecimal {
                field: "supplyAmount".into(),
            });
        }
        NumericInput::from_text(supply).check("supplyAmount")
    }
}

/// Replenish an issued asset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReplenishAssetInfo {
    pub asset_code: String,
    pub asset_id: String,
    pub replenish_amount: Option<NumericInput>,
}

impl ReplenishAssetInfo {
    pub fn validate(&self) -> Result<(), TxError> {
        check_asset_key(&self.asset_code, "assetCode", TX_ASSET_CODE_LENGTH)?;
        check_asset_key(&self.asset_id, "assetId", TX_ASSET_ID_LENGTH)?;
        self.replenish_amount
            .as_ref()
            .ok_or_else(|| TxError::required("replenishAmount"))?
            .check("replenishAmount")
    }
}

/// Partial asset profile for a ModifyAsset transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_gas_limit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freeze: Option<FreezeFlag>,
}

/// Edit an asset's profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModifyAssetInfo {
    pub asset_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_profile: Option<UpdateProfile>,
}

impl ModifyAssetInfo {
    pub fn validate(&self) -> Result<(), TxError> {
        check_asset_key(&self.asset_code, "assetCode", TX_ASSET_CODE_LENGTH)?;
        let patch = self
            .update_profile
            .as_ref()
            .ok_or(TxError::EmptyUpdateProfile)?;
        if let Some(description) = non_empty(&patch.description) {
            check_max_length(description, "description", MAX_ASSET_DESCRIPTION_LENGTH)?;
        }
        check_gas_limit_hint(&patch.suggested_gas_limit)?;
        if let Some(freeze) = &patch.freeze {
            freeze.as_bool()?;
        }
        Ok(())
    }

    /// Validate and normalize `freeze` to a `"true"` / `"false"` string.
    pub fn to_payload(&self) -> Result<Self, TxError> {
        self.validate()?;
        let mut out = self.clone();
        if let Some(patch) = out.update_profile.as_mut() {
            patch.freeze = patch.freeze.as_ref().map(FreezeFlag::normalized).transpose()?;
        }
        Ok(out)
    }
}

/// Move issued asset units.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransferAssetInfo {
    /// `0x` + 64 hex characters.
    pub asset_id: String,
    /// Non-negative numeric string.
    pub transfer_amount: String,
}

impl TransferAssetInfo {
    pub fn validate(&self) -> Result<(), TxError> {
        check_asset_key(&self.asset_id, "assetId", TX_ASSET_ID_LENGTH)?;
        NumericInput::from_text(self.transfer_amount.as_str()).check("transferAmount")
    }
}

fn check_asset_key(value: &str, field: &str, length: usize) -> Result<(), TxError> {
    if value.is_empty() {
        return Err(TxError::required(field));
    }
    check_exact_length(value, field, length)?;
    check_prefixed_hex(value, field)
}

fn check_gas_limit_hint(value: &Option<String>) -> Result<(), TxError> {
    match non_empty(value) {
        Some(limit) => NumericInput::from_text(limit).check("suggestedGasLimit"),
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Signers
// ---------------------------------------------------------------------------

/// One entry of a multisig signer list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerWeight {
    pub address: String,
    pub weight: i64,
}

/// Replacement signer list for a ModifySigners transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifySignersInfo {
    pub signers: Vec<SignerWeight>,
}

impl ModifySignersInfo {
    pub fn validate(&self) -> Result<(), TxError> {
        if self.signers.is_empty() {
            return Err(TxError::required("signers"));
        }
        for (index, signer) in self.signers.iter().enumerate() {
            check_address(&signer.address)?;
            if signer.weight < 0 {
                return Err(TxError::Negative {
                    field: format!("signers[{index}].weight"),
                });
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Contract creation
// ---------------------------------------------------------------------------

/// Bytecode and constructor arguments of a contract deployment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContractCreation {
    pub code_hex: String,
    pub constructor_args_hex: String,
}

impl ContractCreation {
    pub fn validate(&self) -> Result<(), TxError> {
        check_hex(&self.code_hex, "codeHex")?;
        check_hex(&self.constructor_args_hex, "constructorArgsHex")
    }

    /// Code bytes followed by argument bytes, as `0x` hex. Each part is
    /// left-padded to whole bytes on its own.
    pub fn to_data_hex(&self) -> Result<String, TxError> {
        self.validate()?;
        let mut bytes = decode_padded_hex(&self.code_hex)
            .ok_or_else(|| TxError::must_be_number("codeHex", self.code_hex.as_str()))?;
        let args = decode_padded_hex(&self.constructor_args_hex).ok_or_else(|| {
            TxError::must_be_number("constructorArgsHex", self.constructor_args_hex.as_str())
        })?;
        bytes.extend_from_slice(&args);
        Ok(format!("0x{}", hex::encode(bytes)))
    }
}

// ---------------------------------------------------------------------------
// Box members
// ---------------------------------------------------------------------------

/// A box member: an exported JSON string (usually already signed) or a
/// config to be normalized in place.
#[derive(Debug, Clone, PartialEq)]
pub enum SubTx {
    Text(String),
    Object(TxConfig),
}

impl From<String> for SubTx {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for SubTx {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<TxConfig> for SubTx {
    fn from(config: TxConfig) -> Self {
        Self::Object(config)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
