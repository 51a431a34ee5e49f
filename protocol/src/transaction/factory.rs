//! Builders for every transaction kind.
//!
//! [`TxFactory`] owns the network defaults and exposes one `create_*` /
//! `sign_*` pair per kind. `create_*` returns the unsigned
//! [`Transaction`]; `sign_*` signs it with the given key and returns the
//! exported JSON, ready to hand to a node or to the next signer.
//!
//! Every builder validates its payload and forces the kind-specific fields
//! before a transaction is constructed, so a failing builder never leaves a
//! half-built transaction behind.

use num_traits::Zero;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::ChainConfig;
use crate::crypto::PrivateKey;
use crate::error::TxError;

use super::payload::{
    CandidateInfo, ContractCreation, CreateAssetInfo, IssueAssetInfo, ModifyAssetInfo,
    ModifySignersInfo, ReplenishAssetInfo, SubTx, TransferAssetInfo,
};
use super::tx::Transaction;
use super::types::{present, present_str, NumericInput, TxConfig, TxData, TxJson, TxType};
use super::validation::{check_address, validate_tx_config};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BoxPayload {
    sub_tx_list: Vec<TxJson>,
}

/// Transaction builders bound to one network.
///
/// # Examples
///
/// ```
/// use lemo_tx::config::{ChainConfig, CHAIN_ID_DEV_NET};
/// use lemo_tx::crypto::PrivateKey;
/// use lemo_tx::transaction::{TxConfig, TxFactory, TxType};
///
/// let factory = TxFactory::new(ChainConfig::with_chain_id(CHAIN_ID_DEV_NET));
/// let key = PrivateKey::generate();
///
/// let vote = factory
///     .create_vote(TxConfig::from_sender(key.address().to_string()))
///     .unwrap();
/// assert_eq!(vote.kind(), Some(TxType::Vote));
/// assert_eq!(vote.chain_id(), CHAIN_ID_DEV_NET);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TxFactory {
    chain: ChainConfig,
}

impl TxFactory {
    pub fn new(chain: ChainConfig) -> Self {
        Self { chain }
    }

    pub fn chain(&self) -> &ChainConfig {
        &self.chain
    }

    // -----------------------------------------------------------------------
    // Plain & vote
    // -----------------------------------------------------------------------

    /// An ordinary transaction, fields taken as given.
    pub fn create(&self, config: TxConfig) -> Result<Transaction, TxError> {
        self.build(config)
    }

    pub fn sign(&self, key: &PrivateKey, config: TxConfig) -> Result<String, TxError> {
        sign_json(key, self.create(config)?)
    }

    /// Point the sender's vote at `to`. Amount and data are cleared.
    pub fn create_vote(&self, config: TxConfig) -> Result<Transaction, TxError> {
        self.build(TxConfig {
            tx_type: Some(TxType::Vote.into()),
            amount: None,
            data: None,
            ..config
        })
    }

    pub fn sign_vote(&self, key: &PrivateKey, config: TxConfig) -> Result<String, TxError> {
        sign_json(key, self.create_vote(config)?)
    }

    // -----------------------------------------------------------------------
    // Candidate
    // -----------------------------------------------------------------------

    /// Register or edit a consensus candidate. `to` and `toName` are cleared.
    pub fn create_candidate(
        &self,
        config: TxConfig,
        info: &CandidateInfo,
    ) -> Result<Transaction, TxError> {
        let profile = info.to_profile()?;
        self.build(TxConfig {
            tx_type: Some(TxType::Candidate.into()),
            to: None,
            to_name: None,
            data: Some(json_data(&profile)?),
            ..config
        })
    }

    pub fn sign_candidate(
        &self,
        key: &PrivateKey,
        config: TxConfig,
        info: &CandidateInfo,
    ) -> Result<String, TxError> {
        sign_json(key, self.create_candidate(config, info)?)
    }

    // -----------------------------------------------------------------------
    // Assets
    // -----------------------------------------------------------------------

    /// Define a new asset. `to`, `toName` and `amount` are cleared.
    pub fn create_asset(
        &self,
        config: TxConfig,
        info: &CreateAssetInfo,
    ) -> Result<Transaction, TxError> {
        let payload = info.to_payload()?;
        self.build(TxConfig {
            tx_type: Some(TxType::CreateAsset.into()),
            to: None,
            to_name: None,
            amount: None,
            data: Some(json_data(&payload)?),
            ..config
        })
    }

    pub fn sign_create_asset(
        &self,
        key: &PrivateKey,
        config: TxConfig,
        info: &CreateAssetInfo,
    ) -> Result<String, TxError> {
        sign_json(key, self.create_asset(config, info)?)
    }

    /// Issue units of an asset to `to`. `amount` is cleared.
    pub fn create_issue_asset(
        &self,
        config: TxConfig,
        info: &IssueAssetInfo,
    ) -> Result<Transaction, TxError> {
        info.validate()?;
        self.build(TxConfig {
            tx_type: Some(TxType::IssueAsset.into()),
            amount: None,
            data: Some(json_data(info)?),
            ..config
        })
    }

    pub fn sign_issue_asset(
        &self,
        key: &PrivateKey,
        config: TxConfig,
        info: &IssueAssetInfo,
    ) -> Result<String, TxError> {
        sign_json(key, self.create_issue_asset(config, info)?)
    }

    pub fn create_replenish_asset(
        &self,
        config: TxConfig,
        info: &ReplenishAssetInfo,
    ) -> Result<Transaction, TxError> {
        info.validate()?;
        self.build(TxConfig {
            tx_type: Some(TxType::ReplenishAsset.into()),
            data: Some(json_data(info)?),
            ..config
        })
    }

    pub fn sign_replenish_asset(
        &self,
        key: &PrivateKey,
        config: TxConfig,
        info: &ReplenishAssetInfo,
    ) -> Result<String, TxError> {
        sign_json(key, self.create_replenish_asset(config, info)?)
    }

    pub fn create_modify_asset(
        &self,
        config: TxConfig,
        info: &ModifyAssetInfo,
    ) -> Result<Transaction, TxError> {
        let payload = info.to_payload()?;
        self.build(TxConfig {
            tx_type: Some(TxType::ModifyAsset.into()),
            data: Some(json_data(&payload)?),
            ..config
        })
    }

    pub fn sign_modify_asset(
        &self,
        key: &PrivateKey,
        config: TxConfig,
        info: &ModifyAssetInfo,
    ) -> Result<String, TxError> {
        sign_json(key, self.create_modify_asset(config, info)?)
    }

    /// Move asset units to `to`. `amount` is cleared.
    pub fn create_transfer_asset(
        &self,
        config: TxConfig,
        info: &TransferAssetInfo,
    ) -> Result<Transaction, TxError> {
        info.validate()?;
        self.build(TxConfig {
            tx_type: Some(TxType::TransferAsset.into()),
            amount: None,
            data: Some(json_data(info)?),
            ..config
        })
    }

    pub fn sign_transfer_asset(
        &self,
        key: &PrivateKey,
        config: TxConfig,
        info: &TransferAssetInfo,
    ) -> Result<String, TxError> {
        sign_json(key, self.create_transfer_asset(config, info)?)
    }

    // -----------------------------------------------------------------------
    // Gas payer protocol
    // -----------------------------------------------------------------------

    /// A transaction whose gas `payer` covers. Gas terms are reset to the
    /// defaults; the payer sets the real ones when reimbursing.
    pub fn create_no_gas(&self, config: TxConfig, payer: &str) -> Result<Transaction, TxError> {
        check_address(payer)?;
        self.build(TxConfig {
            gas_payer: Some(payer.to_string()),
            gas_price: None,
            gas_limit: None,
            ..config
        })
    }

    /// Sender half: sign the no-gas hash and export.
    pub fn sign_no_gas(
        &self,
        key: &PrivateKey,
        config: TxConfig,
        payer: &str,
    ) -> Result<String, TxError> {
        let mut tx = self.create_no_gas(config, payer)?;
        tx.sign_no_gas_with(key)?;
        tx.to_json_string()
    }

    /// Inject the final gas terms into a sender-signed no-gas export.
    pub fn create_reimbursement(
        &self,
        no_gas_json: &str,
        gas_price: impl Into<NumericInput>,
        gas_limit: impl Into<NumericInput>,
    ) -> Result<Transaction, TxError> {
        let config = TxConfig::from_json(no_gas_json)?;
        let payer = present_str(&config.gas_payer).ok_or_else(|| TxError::required("gasPayer"))?;
        check_address(payer)?;

        let gas_price = gas_price.into();
        let gas_limit = gas_limit.into();
        gas_price.check("gasPrice")?;
        gas_limit.check("gasLimit")?;

        self.build(TxConfig {
            gas_price: Some(gas_price),
            gas_limit: Some(gas_limit),
            ..config
        })
    }

    /// Payer half: check that `key` is the declared payer, set the gas
    /// terms, gas-sign and export.
    pub fn sign_reimbursement(
        &self,
        key: &PrivateKey,
        no_gas_json: &str,
        gas_price: impl Into<NumericInput>,
        gas_limit: impl Into<NumericInput>,
    ) -> Result<String, TxError> {
        let config = TxConfig::from_json(no_gas_json)?;
        let declared = present_str(&config.gas_payer).ok_or_else(|| TxError::required("gasPayer"))?;
        let payer = check_address(declared)?;
        if payer != key.address() {
            warn!(declared = %payer, signer = %key.address(), "gas payer key mismatch");
            return Err(TxError::AddressConflict {
                address: declared.to_string(),
            });
        }

        let mut tx = self.create_reimbursement(no_gas_json, gas_price, gas_limit)?;
        tx.sign_gas_with(key)?;
        tx.to_json_string()
    }

    // -----------------------------------------------------------------------
    // Multisig, box, contracts
    // -----------------------------------------------------------------------

    pub fn create_modify_signers(
        &self,
        config: TxConfig,
        info: &ModifySignersInfo,
    ) -> Result<Transaction, TxError> {
        info.validate()?;
        self.build(TxConfig {
            tx_type: Some(TxType::ModifySigners.into()),
            data: Some(json_data(info)?),
            ..config
        })
    }

    pub fn sign_modify_signers(
        &self,
        key: &PrivateKey,
        config: TxConfig,
        info: &ModifySignersInfo,
    ) -> Result<String, TxError> {
        sign_json(key, self.create_modify_signers(config, info)?)
    }

    /// Bundle `sub_txs` into one box transaction.
    ///
    /// Members are normalized and embedded in their exported form. When the
    /// envelope has no `expirationTime` it takes the earliest member
    /// expiration. A member of kind Box is rejected.
    pub fn create_box(&self, config: TxConfig, sub_txs: Vec<SubTx>) -> Result<Transaction, TxError> {
        let mut members = Vec::with_capacity(sub_txs.len());
        for sub in sub_txs {
            // Text members are embedded as signed, without chain substitution.
            let member = match sub {
                SubTx::Text(text) => {
                    TxConfig::from_json(&text).map_err(|_| TxError::InvalidBoxTransaction)?
                }
                SubTx::Object(member) => self.with_chain(member),
            };
            if is_box(&member) {
                warn!("box transaction listed as a box member");
                return Err(TxError::InvalidBoxTransaction);
            }
            validate_tx_config(&member)?;
            members.push(Transaction::with_depth(member, &self.chain, 1)?);
        }

        // Zero means absent, as it does for any other transaction.
        let given = present(&config.expiration_time)
            .filter(|v| !v.to_biguint("expirationTime").is_ok_and(|n| n.is_zero()));
        let expiration_time = match given {
            Some(given) => Some(given.clone()),
            None => members
                .iter()
                .map(Transaction::expiration_time)
                .min()
                .map(NumericInput::from),
        };
        debug!(members = members.len(), "building box transaction");

        let payload = BoxPayload {
            sub_tx_list: members.iter().map(Transaction::to_json).collect(),
        };
        self.build(TxConfig {
            tx_type: Some(TxType::Box.into()),
            data: Some(json_data(&payload)?),
            expiration_time,
            ..config
        })
    }

    pub fn sign_box(
        &self,
        key: &PrivateKey,
        config: TxConfig,
        sub_txs: Vec<SubTx>,
    ) -> Result<String, TxError> {
        sign_json(key, self.create_box(config, sub_txs)?)
    }

    /// Deploy a contract: payload is the code followed by the encoded
    /// constructor arguments.
    pub fn create_contract_creation(
        &self,
        config: TxConfig,
        contract: &ContractCreation,
    ) -> Result<Transaction, TxError> {
        let data = contract.to_data_hex()?;
        self.build(TxConfig {
            tx_type: Some(TxType::CreateContract.into()),
            data: Some(TxData::Hex(data)),
            ..config
        })
    }

    pub fn sign_contract_creation(
        &self,
        key: &PrivateKey,
        config: TxConfig,
        contract: &ContractCreation,
    ) -> Result<String, TxError> {
        sign_json(key, self.create_contract_creation(config, contract)?)
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn with_chain(&self, mut config: TxConfig) -> TxConfig {
        if present(&config.chain_id).is_none() {
            config.chain_id = Some(u64::from(self.chain.chain_id).into());
        }
        config
    }

    fn build(&self, config: TxConfig) -> Result<Transaction, TxError> {
        Transaction::new(self.with_chain(config), &self.chain)
    }
}

fn sign_json(key: &PrivateKey, mut tx: Transaction) -> Result<String, TxError> {
    tx.sign_with(key)?;
    tx.to_json_string()
}

/// Serialize straight to bytes so the payload keeps field declaration order.
fn json_data<T: Serialize>(value: &T) -> Result<TxData, TxError> {
    let bytes = serde_json::to_vec(value)?;
    Ok(TxData::Hex(format!("0x{}", hex::encode(bytes))))
}

fn is_box(config: &TxConfig) -> bool {
    present(&config.tx_type)
        .and_then(|t| t.to_u64("type").ok())
        .is_some_and(|t| t == u64::from(TxType::Box.as_u16()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::payload::{AssetProfile, SignerWeight};
    use crate::transaction::signing::{GasSigner, Signer};
    use crate::transaction::types::TxJson;

    const ASSET: &str = "0xd0befd3850c574b7f6ad6f7943fe19b212affb90162978adc2193a035ced8884";

    fn factory() -> TxFactory {
        TxFactory::new(ChainConfig::with_chain_id(100))
    }

    fn config_for(key: &PrivateKey) -> TxConfig {
        TxConfig {
            to: Some(PrivateKey::generate().address().to_string()),
            to_name: Some("bob".into()),
            amount: Some("100".into()),
            data: Some(TxData::Hex("0x0c".into())),
            ..TxConfig::from_sender(key.address().to_string())
        }
    }

    fn payload_json(tx: &Transaction) -> serde_json::Value {
        serde_json::from_slice(tx.data()).unwrap()
    }

    #[test]
    fn factory_substitutes_chain_id() {
        let key = PrivateKey::generate();
        let tx = factory().create(TxConfig::from_sender(key.address().to_string())).unwrap();
        assert_eq!(tx.chain_id(), 100);

        let explicit = TxConfig {
            chain_id: Some(7u64.into()),
            ..TxConfig::from_sender(key.address().to_string())
        };
        assert_eq!(factory().create(explicit).unwrap().chain_id(), 7);
    }

    #[test]
    fn sign_exports_recoverable_json() {
        let key = PrivateKey::generate();
        let json = factory().sign(&key, config_for(&key)).unwrap();
        let tx = Transaction::from_json(&json, factory().chain()).unwrap();
        assert_eq!(Signer::recover(&tx).unwrap(), vec![key.address()]);
    }

    #[test]
    fn vote_clears_amount_and_data() {
        let key = PrivateKey::generate();
        let tx = factory().create_vote(config_for(&key)).unwrap();
        assert_eq!(tx.kind(), Some(TxType::Vote));
        assert!(tx.data().is_empty());
        assert_eq!(tx.to_json().amount, "0");
        assert!(tx.to().is_some());
    }

    #[test]
    fn candidate_clears_recipient() {
        let key = PrivateKey::generate();
        let info = CandidateInfo {
            node_id: "ab".repeat(64),
            host: "node.lemochain.com".into(),
            port: Some(7001u64.into()),
            ..CandidateInfo::default()
        };
        let tx = factory().create_candidate(config_for(&key), &info).unwrap();
        assert_eq!(tx.kind(), Some(TxType::Candidate));
        assert!(tx.to().is_none());
        assert!(tx.to_name().is_empty());
        let data = payload_json(&tx);
        assert_eq!(data["isCandidate"], "true");
        assert_eq!(data["port"], "7001");
    }

    #[test]
    fn create_asset_clears_fields() {
        let key = PrivateKey::generate();
        let info = CreateAssetInfo {
            category: Some(1u64.into()),
            decimal: Some(18u64.into()),
            is_replenishable: true,
            is_divisible: true,
            profile: AssetProfile {
                name: "Demo Asset".into(),
                symbol: "DT".into(),
                ..AssetProfile::default()
            },
        };
        let tx = factory().create_asset(config_for(&key), &info).unwrap();
        assert_eq!(tx.kind(), Some(TxType::CreateAsset));
        assert!(tx.to().is_none());
        assert_eq!(tx.to_json().amount, "0");
        assert_eq!(payload_json(&tx)["profile"]["freeze"], "false");
    }

    #[test]
    fn issue_and_transfer_clear_amount() {
        let key = PrivateKey::generate();
        let issue = IssueAssetInfo {
            asset_code: ASSET.into(),
            meta_data: None,
            supply_amount: Some("100000".into()),
        };
        let tx = factory().create_issue_asset(config_for(&key), &issue).unwrap();
        assert_eq!(tx.kind(), Some(TxType::IssueAsset));
        assert_eq!(tx.to_json().amount, "0");
        assert_eq!(tx.to_name(), "bob");

        let transfer = TransferAssetInfo {
            asset_id: ASSET.into(),
            transfer_amount: "5".into(),
        };
        let tx = factory().create_transfer_asset(config_for(&key), &transfer).unwrap();
        assert_eq!(tx.kind(), Some(TxType::TransferAsset));
        assert_eq!(tx.to_json().amount, "0");
        assert_eq!(payload_json(&tx)["transferAmount"], "5");
    }

    #[test]
    fn transfer_asset_short_id_fails_before_build() {
        let key = PrivateKey::generate();
        let transfer = TransferAssetInfo {
            asset_id: ASSET[..64].into(),
            transfer_amount: "5".into(),
        };
        let err = factory()
            .create_transfer_asset(config_for(&key), &transfer)
            .unwrap_err();
        assert!(matches!(err, TxError::InvalidLength { ref field, .. } if field == "assetId"));
    }

    #[test]
    fn replenish_and_modify_asset() {
        let key = PrivateKey::generate();
        let replenish = ReplenishAssetInfo {
            asset_code: ASSET.into(),
            asset_id: ASSET.into(),
            replenish_amount: Some("100000".into()),
        };
        let tx = factory().create_replenish_asset(config_for(&key), &replenish).unwrap();
        assert_eq!(tx.kind(), Some(TxType::ReplenishAsset));
        assert_eq!(tx.to_json().amount, "100");

        let modify = ModifyAssetInfo {
            asset_code: ASSET.into(),
            update_profile: None,
        };
        assert!(matches!(
            factory().create_modify_asset(config_for(&key), &modify),
            Err(TxError::EmptyUpdateProfile)
        ));
    }

    #[test]
    fn modify_signers_payload() {
        let key = PrivateKey::generate();
        let info = ModifySignersInfo {
            signers: vec![SignerWeight {
                address: key.address().to_string(),
                weight: 100,
            }],
        };
        let tx = factory().create_modify_signers(config_for(&key), &info).unwrap();
        assert_eq!(tx.kind(), Some(TxType::ModifySigners));
        assert_eq!(payload_json(&tx)["signers"][0]["weight"], 100);
    }

    #[test]
    fn contract_creation_payload() {
        let key = PrivateKey::generate();
        let contract = ContractCreation {
            code_hex: "0x6080".into(),
            constructor_args_hex: "0x0001".into(),
        };
        let tx = factory()
            .create_contract_creation(config_for(&key), &contract)
            .unwrap();
        assert_eq!(tx.kind(), Some(TxType::CreateContract));
        assert_eq!(tx.data(), &[0x60, 0x80, 0x00, 0x01]);
    }

    #[test]
    fn no_gas_then_reimbursement() {
        let sender = PrivateKey::generate();
        let payer = PrivateKey::generate();
        let payer_text = payer.address().to_string();

        let config = TxConfig {
            gas_price: Some(1u64.into()),
            ..config_for(&sender)
        };
        let no_gas = factory().sign_no_gas(&sender, config, &payer_text).unwrap();
        let parsed: TxJson = serde_json::from_str(&no_gas).unwrap();
        assert_eq!(parsed.gas_price, "3000000000");
        assert_eq!(parsed.gas_payer.as_deref(), Some(payer_text.as_str()));

        let signed = factory()
            .sign_reimbursement(&payer, &no_gas, 2_000_000_000u64, "50000")
            .unwrap();
        let tx = Transaction::from_json(&signed, factory().chain()).unwrap();
        assert_eq!(tx.gas_limit(), 50_000);
        assert_eq!(GasSigner::recover_no_gas(&tx).unwrap(), vec![sender.address()]);
        assert_eq!(GasSigner::recover_gas_payers(&tx).unwrap(), vec![payer.address()]);
    }

    #[test]
    fn reimbursement_rejects_wrong_payer() {
        let sender = PrivateKey::generate();
        let payer = PrivateKey::generate();
        let no_gas = factory()
            .sign_no_gas(&sender, config_for(&sender), &payer.address().to_string())
            .unwrap();

        let err = factory()
            .sign_reimbursement(&sender, &no_gas, 1u64, 1u64)
            .unwrap_err();
        assert!(matches!(err, TxError::AddressConflict { .. }));
    }

    #[test]
    fn reimbursement_requires_gas_payer() {
        let key = PrivateKey::generate();
        let plain = factory().sign(&key, config_for(&key)).unwrap();
        assert!(matches!(
            factory().create_reimbursement(&plain, 1u64, 1u64),
            Err(TxError::FieldRequired { ref field }) if field == "gasPayer"
        ));
    }

    #[test]
    fn box_takes_earliest_member_expiration() {
        let key = PrivateKey::generate();
        let early = TxConfig {
            expiration_time: Some(1_700_000_000u64.into()),
            ..config_for(&key)
        };
        let late = TxConfig {
            expiration_time: Some(1_700_000_900u64.into()),
            ..config_for(&key)
        };
        let signed_late = factory().sign(&key, late).unwrap();

        let tx = factory()
            .create_box(
                TxConfig::from_sender(key.address().to_string()),
                vec![SubTx::from(signed_late), SubTx::from(early)],
            )
            .unwrap();
        assert_eq!(tx.kind(), Some(TxType::Box));
        assert_eq!(tx.expiration_time(), 1_700_000_000);
        assert_eq!(tx.sub_transactions().len(), 2);
        assert_eq!(tx.sub_transactions()[0].sigs().len(), 1);
    }

    #[test]
    fn box_with_zero_expiration_takes_member_expiration() {
        let key = PrivateKey::generate();
        let member = TxConfig {
            expiration_time: Some(1_700_000_000u64.into()),
            ..config_for(&key)
        };
        for zero in [NumericInput::Number(0), NumericInput::from("0")] {
            let envelope = TxConfig {
                expiration_time: Some(zero.clone()),
                ..TxConfig::from_sender(key.address().to_string())
            };
            let tx = factory()
                .create_box(envelope, vec![member.clone().into()])
                .unwrap();
            assert_eq!(tx.expiration_time(), 1_700_000_000, "{zero:?}");
        }
    }

    #[test]
    fn box_keeps_explicit_expiration() {
        let key = PrivateKey::generate();
        let member = TxConfig {
            expiration_time: Some(1_700_000_000u64.into()),
            ..config_for(&key)
        };
        let envelope = TxConfig {
            expiration_time: Some(1_600_000_000u64.into()),
            ..TxConfig::from_sender(key.address().to_string())
        };
        let tx = factory().create_box(envelope, vec![member.into()]).unwrap();
        assert_eq!(tx.expiration_time(), 1_600_000_000);
    }

    #[test]
    fn box_rejects_box_member() {
        let key = PrivateKey::generate();
        let member = factory().sign(&key, config_for(&key)).unwrap();
        let inner = factory()
            .sign_box(
                &key,
                TxConfig::from_sender(key.address().to_string()),
                vec![member.as_str().into()],
            )
            .unwrap();

        let err = factory()
            .create_box(
                TxConfig::from_sender(key.address().to_string()),
                vec![member.into(), inner.into()],
            )
            .unwrap_err();
        assert!(matches!(err, TxError::InvalidBoxTransaction));
    }

    #[test]
    fn box_hash_survives_export() {
        let key = PrivateKey::generate();
        let member = TxConfig {
            expiration_time: Some(1_700_000_000u64.into()),
            ..config_for(&key)
        };
        let json = factory()
            .sign_box(
                &key,
                TxConfig::from_sender(key.address().to_string()),
                vec![member.into()],
            )
            .unwrap();
        let tx = Transaction::from_json(&json, factory().chain()).unwrap();
        let again = Transaction::from_json(&tx.to_json_string().unwrap(), factory().chain()).unwrap();
        assert_eq!(tx.hash().unwrap(), again.hash().unwrap());
        assert_eq!(Signer::recover(&tx).unwrap(), vec![key.address()]);
    }
}
