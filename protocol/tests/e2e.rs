//! End-to-end tests for the LemoChain transaction library.
//!
//! These walk a transaction through the whole public surface: building it
//! with the factory, signing it, handing it to another party as JSON or as a
//! deep link, counter-signing it and recovering every signer. Each test
//! stands alone; keys are generated fresh unless a fixed vector is needed.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use lemo_tx::config::{ChainConfig, CHAIN_ID_DEV_NET};
use lemo_tx::crypto::PrivateKey;
use lemo_tx::deeplink::{create_pay_deep_link, parse_deep_link, DeepLink};
use lemo_tx::transaction::{
    GasSigner, Signer, SigningState, SubTx, Transaction, TransferAssetInfo, TxConfig, TxFactory,
    TxType,
};
use lemo_tx::{Address, ErrorKind, TxError};

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

/// Log to the test writer when `RUST_LOG` is set.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn dev_factory() -> TxFactory {
    TxFactory::new(ChainConfig::with_chain_id(CHAIN_ID_DEV_NET))
}

/// Sender of the fixed hash vectors.
fn vector_sender() -> Address {
    let mut bytes = [0u8; 20];
    hex::decode_to_slice("7e5f4552091a69125d5dfcb7b8c2659029395bdf", &mut bytes).unwrap();
    Address::from_bytes(bytes)
}

fn transfer(from: &PrivateKey, to: &PrivateKey, amount: &str) -> TxConfig {
    TxConfig {
        to: Some(to.address().to_string()),
        amount: Some(amount.into()),
        expiration_time: Some(1_700_000_000u64.into()),
        ..TxConfig::from_sender(from.address().to_string())
    }
}

// ---------------------------------------------------------------------------
// 1. Canonical Hashes
// ---------------------------------------------------------------------------

#[test]
fn default_transfer_matches_chain_hashes() -> Result<()> {
    init_tracing();
    let config = TxConfig {
        expiration_time: Some(1_544_584_596u64.into()),
        ..TxConfig::from_sender(vector_sender().to_string())
    };
    let tx = dev_factory().create(config)?;

    assert_eq!(tx.chain_id(), CHAIN_ID_DEV_NET);
    assert_eq!(
        tx.hash()?,
        "0x9a4892aa56bb06857a45c5f0b777a48ad6a3419330994b5f0737edb35cc29561"
    );
    assert_eq!(
        tx.hash_for_sign()?,
        "0xbf2cbddd83ed182c5f2b71fdbfa5e9f96e2532e6f49b57c2e1c7fcf44e0e78d5"
    );
    assert_eq!(
        tx.hash_for_no_gas_sign()?,
        "0xf50566dd81026b9bdd35fedae0ddf6dac7277a8a0caa626e388d7a1a41623245"
    );
    assert_eq!(
        tx.hash_for_gas_sign(),
        "0xe214256fc4c70b7e4976e78ef2d46060c5c669e4e3d58a0860c03b3d42adf096"
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// 2. Sign, Export, Reimport
// ---------------------------------------------------------------------------

#[test]
fn signed_json_survives_reimport() -> Result<()> {
    init_tracing();
    let alice = PrivateKey::generate();
    let bob = PrivateKey::generate();
    let factory = dev_factory();

    let json = factory.sign(&alice, transfer(&alice, &bob, "1000000000000000000"))?;
    let tx = Transaction::from_json(&json, factory.chain())?;

    assert_eq!(tx.kind(), Some(TxType::Ordinary));
    assert_eq!(tx.to(), Some(&bob.address()));
    assert_eq!(tx.amount().to_str_radix(10), "1000000000000000000");
    assert_eq!(Signer::recover(&tx)?, vec![alice.address()]);
    assert_eq!(tx.signing_state(1), SigningState::Complete);

    // Re-exporting the reimported transaction is byte-identical.
    assert_eq!(tx.to_json_string()?, json);
    Ok(())
}

#[test]
fn resigning_does_not_duplicate() -> Result<()> {
    let alice = PrivateKey::generate();
    let bob = PrivateKey::generate();
    let mut tx = dev_factory().create(transfer(&alice, &bob, "5"))?;

    let before = tx.hash()?;
    tx.sign_with(&alice)?;
    let once = tx.hash()?;
    tx.sign_with(&alice)?;

    assert_ne!(before, once);
    assert_eq!(tx.hash()?, once);
    assert_eq!(tx.sigs().len(), 1);
    Ok(())
}

// ---------------------------------------------------------------------------
// 3. Gas Payer Protocol
// ---------------------------------------------------------------------------

#[test]
fn gas_payer_reimburses_sender() -> Result<()> {
    init_tracing();
    let sender = PrivateKey::generate();
    let payer = PrivateKey::generate();
    let bob = PrivateKey::generate();
    let factory = dev_factory();
    let payer_address = payer.address().to_string();

    // Sender signs without gas terms and ships the JSON to the payer.
    let no_gas_json = factory.sign_no_gas(&sender, transfer(&sender, &bob, "7"), &payer_address)?;
    let pending = Transaction::from_json(&no_gas_json, factory.chain())?;
    assert_eq!(pending.signing_state(1), SigningState::GasPending);

    // Payer fixes the gas terms and counter-signs.
    let final_json = factory.sign_reimbursement(&payer, &no_gas_json, 2_000_000_000u64, 30_000u64)?;
    let tx = Transaction::from_json(&final_json, factory.chain())?;

    assert_eq!(tx.gas_price().to_str_radix(10), "2000000000");
    assert_eq!(tx.gas_limit(), 30_000);
    assert_eq!(tx.gas_payer(), Some(&payer.address()));
    assert_eq!(GasSigner::recover_no_gas(&tx)?, vec![sender.address()]);
    assert_eq!(GasSigner::recover_gas_payers(&tx)?, vec![payer.address()]);
    assert_eq!(tx.signing_state(1), SigningState::Complete);
    Ok(())
}

#[test]
fn only_the_declared_payer_may_reimburse() -> Result<()> {
    let sender = PrivateKey::generate();
    let payer = PrivateKey::generate();
    let intruder = PrivateKey::generate();
    let factory = dev_factory();

    let no_gas_json = factory.sign_no_gas(
        &sender,
        transfer(&sender, &payer, "1"),
        &payer.address().to_string(),
    )?;
    let err = factory
        .sign_reimbursement(&intruder, &no_gas_json, 1u64, 21_000u64)
        .unwrap_err();

    assert!(matches!(err, TxError::AddressConflict { .. }));
    assert_eq!(err.kind(), ErrorKind::Conflict);
    Ok(())
}

// ---------------------------------------------------------------------------
// 4. Box Transactions
// ---------------------------------------------------------------------------

#[test]
fn box_bundles_signed_members() -> Result<()> {
    init_tracing();
    let alice = PrivateKey::generate();
    let bob = PrivateKey::generate();
    let factory = dev_factory();

    let first = factory.sign(&alice, transfer(&alice, &bob, "1"))?;
    let second = TxConfig {
        expiration_time: Some(1_600_000_000u64.into()),
        ..transfer(&alice, &bob, "2")
    };
    let boxed_json = factory.sign_box(
        &alice,
        TxConfig::from_sender(alice.address().to_string()),
        vec![SubTx::from(first), SubTx::from(second)],
    )?;

    let tx = Transaction::from_json(&boxed_json, factory.chain())?;
    assert_eq!(tx.kind(), Some(TxType::Box));
    assert_eq!(tx.sub_transactions().len(), 2);
    assert_eq!(tx.expiration_time(), 1_600_000_000);
    assert_eq!(Signer::recover(&tx.sub_transactions()[0])?, vec![alice.address()]);
    assert_eq!(Signer::recover(&tx)?, vec![alice.address()]);
    Ok(())
}

#[test]
fn boxes_do_not_nest() -> Result<()> {
    let alice = PrivateKey::generate();
    let bob = PrivateKey::generate();
    let factory = dev_factory();

    let inner = factory.sign_box(
        &alice,
        TxConfig::from_sender(alice.address().to_string()),
        vec![SubTx::from(transfer(&alice, &bob, "1"))],
    )?;
    let err = factory
        .create_box(
            TxConfig::from_sender(alice.address().to_string()),
            vec![SubTx::from(inner)],
        )
        .unwrap_err();
    assert!(matches!(err, TxError::InvalidBoxTransaction));
    Ok(())
}

// ---------------------------------------------------------------------------
// 5. Deep Links
// ---------------------------------------------------------------------------

#[test]
fn pay_link_becomes_signable_transaction() -> Result<()> {
    init_tracing();
    let alice = PrivateKey::generate();
    let shop = PrivateKey::generate();
    let factory = dev_factory();

    let request = TxConfig {
        to: Some(shop.address().to_string()),
        amount: Some(2_500_000_000_000_000_000u64.into()),
        message: Some("order #42".into()),
        ..TxConfig::default()
    };
    let uri = create_pay_deep_link(&request)?;
    assert!(uri.contains("a=2.5"));

    let DeepLink::Pay(received) = parse_deep_link(&uri)? else {
        panic!("expected a pay link");
    };
    assert_eq!(received, request);

    // The wallet fills in the sender and signs.
    let mut tx = factory.create(TxConfig {
        from: Some(alice.address().to_string()),
        ..received
    })?;
    tx.sign_with(&alice)?;
    assert_eq!(tx.to(), Some(&shop.address()));
    assert_eq!(tx.message(), "order #42");
    assert_eq!(Signer::recover(&tx)?, vec![alice.address()]);
    Ok(())
}

// ---------------------------------------------------------------------------
// 6. Payload Validation
// ---------------------------------------------------------------------------

#[test]
fn transfer_asset_rejects_short_asset_id() {
    let alice = PrivateKey::generate();
    let bob = PrivateKey::generate();
    let info = TransferAssetInfo {
        asset_id: "0x1234".into(),
        transfer_amount: "100".into(),
    };

    let err = dev_factory()
        .create_transfer_asset(transfer(&alice, &bob, "0"), &info)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Length);
}

#[test]
fn malformed_sender_address_is_rejected() {
    let err = dev_factory()
        .create(TxConfig::from_sender("Lemo0000"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Address);
}
