//! Transaction signing and signer recovery.
//!
//! Signing is a separate step from building because the key may belong to
//! somebody else entirely: in the gas-payer protocol the sender and the
//! payer sign the same transaction on different machines.
//!
//! Three hash domains are involved:
//!
//! | Who              | Hash                       | Appended to    |
//! |------------------|----------------------------|----------------|
//! | sender           | `hash_for_sign`            | `sigs`         |
//! | sender, payer on | `hash_for_no_gas_sign`     | `sigs`         |
//! | gas payer        | `hash_for_gas_sign`        | `gasPayerSigs` |
//!
//! The no-gas hash leaves out gas price and gas limit so the payer can fix
//! them later without invalidating the sender's signature. The gas hash
//! covers the sender signatures, which binds the payer to exactly what the
//! sender approved.

use tracing::debug;

use crate::address::Address;
use crate::crypto::{recover_address, PrivateKey, Signature};
use crate::error::TxError;

use super::encoding::RecordMode;
use super::tx::Transaction;

/// Signs and recovers over the regular sign-hash.
pub struct Signer;

impl Signer {
    /// Produce the sender signature over `hash_for_sign`.
    ///
    /// The transaction is not modified; see [`Transaction::sign_with`] for
    /// the appending variant.
    pub fn sign(tx: &Transaction, key: &PrivateKey) -> Result<Signature, TxError> {
        let hash = tx.digest(RecordMode::Sign, 0)?;
        let sig = key.sign_hash(&hash)?;
        debug!(signer = %key.address(), hash = %hex::encode(hash), "signed transaction");
        Ok(sig)
    }

    /// Recover the address behind every entry of `sigs`, in order.
    pub fn recover(tx: &Transaction) -> Result<Vec<Address>, TxError> {
        let hash = tx.digest(RecordMode::Sign, 0)?;
        recover_all(&hash, tx.sigs())
    }
}

/// The two halves of the gas-payer protocol.
pub struct GasSigner;

impl GasSigner {
    /// Sender signature over `hash_for_no_gas_sign`.
    pub fn sign_no_gas(tx: &Transaction, key: &PrivateKey) -> Result<Signature, TxError> {
        let hash = tx.digest(RecordMode::NoGas, 0)?;
        let sig = key.sign_hash(&hash)?;
        debug!(signer = %key.address(), hash = %hex::encode(hash), "signed without gas terms");
        Ok(sig)
    }

    /// Gas payer signature over `hash_for_gas_sign`.
    pub fn sign_gas(tx: &Transaction, key: &PrivateKey) -> Result<Signature, TxError> {
        let hash = tx.gas_digest();
        let sig = key.sign_hash(&hash)?;
        debug!(payer = %key.address(), hash = %hex::encode(hash), "signed gas terms");
        Ok(sig)
    }

    /// Recover the senders of a transaction signed without gas terms.
    pub fn recover_no_gas(tx: &Transaction) -> Result<Vec<Address>, TxError> {
        let hash = tx.digest(RecordMode::NoGas, 0)?;
        recover_all(&hash, tx.sigs())
    }

    /// Recover the addresses behind `gasPayerSigs`.
    pub fn recover_gas_payers(tx: &Transaction) -> Result<Vec<Address>, TxError> {
        recover_all(&tx.gas_digest(), tx.gas_payer_sigs())
    }
}

fn recover_all(hash: &[u8; 32], sigs: &[Signature]) -> Result<Vec<Address>, TxError> {
    sigs.iter()
        .map(|sig| {
            recover_address(hash, sig).map_err(|e| TxError::InvalidSignature {
                reason: e.to_string(),
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChainConfig;
    use crate::transaction::types::TxConfig;

    fn unsigned(key: &PrivateKey, payer: Option<&PrivateKey>) -> Transaction {
        let config = TxConfig {
            gas_payer: payer.map(|p| p.address().to_string()),
            expiration_time: Some(1_700_000_000u64.into()),
            ..TxConfig::from_sender(key.address().to_string())
        };
        Transaction::new(config, &ChainConfig::default()).unwrap()
    }

    #[test]
    fn sign_recovers_sender() {
        let key = PrivateKey::generate();
        let mut tx = unsigned(&key, None);
        tx.sign_with(&key).unwrap();
        assert_eq!(Signer::recover(&tx).unwrap(), vec![key.address()]);
    }

    #[test]
    fn signing_twice_is_idempotent() {
        let key = PrivateKey::generate();
        let mut tx = unsigned(&key, None);
        let first = tx.sign_with(&key).unwrap();
        let second = tx.sign_with(&key).unwrap();
        assert_eq!(first, second);
        assert_eq!(tx.sigs().len(), 1);
    }

    #[test]
    fn sign_does_not_mutate() {
        let key = PrivateKey::generate();
        let tx = unsigned(&key, None);
        Signer::sign(&tx, &key).unwrap();
        assert!(tx.sigs().is_empty());
    }

    #[test]
    fn multisig_recovers_in_order() {
        let a = PrivateKey::generate();
        let b = PrivateKey::generate();
        let mut tx = unsigned(&a, None);
        tx.sign_with(&a).unwrap();
        tx.sign_with(&b).unwrap();
        assert_eq!(Signer::recover(&tx).unwrap(), vec![a.address(), b.address()]);
    }

    #[test]
    fn garbage_signature_is_invalid() {
        let key = PrivateKey::generate();
        let mut tx = unsigned(&key, None);
        // r = s = 0 is not a valid signature.
        tx.add_signature(Signature::from_bytes([0u8; 65]));
        assert!(matches!(
            Signer::recover(&tx),
            Err(TxError::InvalidSignature { .. })
        ));
    }

    #[test]
    fn gas_protocol_roundtrip() {
        let sender = PrivateKey::generate();
        let payer = PrivateKey::generate();
        let mut tx = unsigned(&sender, Some(&payer));

        tx.sign_no_gas_with(&sender).unwrap();
        tx.sign_gas_with(&payer).unwrap();

        assert_eq!(GasSigner::recover_no_gas(&tx).unwrap(), vec![sender.address()]);
        assert_eq!(GasSigner::recover_gas_payers(&tx).unwrap(), vec![payer.address()]);
        // The no-gas signature does not verify under the regular sign-hash.
        assert_ne!(Signer::recover(&tx).unwrap(), vec![sender.address()]);
    }

    #[test]
    fn no_gas_hash_ignores_gas_terms() {
        let key = PrivateKey::generate();
        let base = TxConfig {
            expiration_time: Some(1_700_000_000u64.into()),
            ..TxConfig::from_sender(key.address().to_string())
        };
        let cheap = Transaction::new(
            TxConfig {
                gas_price: Some(1u64.into()),
                ..base.clone()
            },
            &ChainConfig::default(),
        )
        .unwrap();
        let dear = Transaction::new(
            TxConfig {
                gas_price: Some(9u64.into()),
                gas_limit: Some(99u64.into()),
                ..base
            },
            &ChainConfig::default(),
        )
        .unwrap();

        assert_eq!(
            cheap.hash_for_no_gas_sign().unwrap(),
            dear.hash_for_no_gas_sign().unwrap()
        );
        assert_ne!(cheap.hash_for_sign().unwrap(), dear.hash_for_sign().unwrap());
        assert_ne!(cheap.hash_for_gas_sign(), dear.hash_for_gas_sign());
    }
}
