//! End-to-end walk through the verification pipeline against a fabricated
//! ledger: build and sign a transfer, anchor it in a small accumulator,
//! then verify inclusion and decode an account blob.

use mica_common::account::{AccountResource, EventHandle};
use mica_common::codec::encode;
use mica_common::crypto::Account;
use mica_common::hash::{domain_hash2, HashDomain, ACCUMULATOR_PLACEHOLDER};
use mica_common::transaction::{RawTransaction, TransactionInfo};
use mica_verify::{
    decode_account_blob, transaction_hash, verify_transaction_inclusion, AccumulatorProof, Config,
};

use anyhow::Result;
use log::{info, LevelFilter};
use simple_logger::SimpleLogger;

fn main() -> Result<()> {
    SimpleLogger::new()
        .with_level(LevelFilter::Debug)
        .env()
        .init()?;
    let config = Config::default();
    let version = config.protocol_version;

    let sender = Account::generate();
    let recipient = Account::generate();
    info!("sender address: {}", sender.address_hex());
    info!("recipient address: {}", recipient.address_hex());

    let raw_txn = RawTransaction::new_transfer(
        sender.address,
        0,
        recipient.address,
        1_000,
        140_000,
        0,
        1_700_000_000,
    );
    let signed = sender.sign_transaction(raw_txn);

    // The ledger side: execution summary for our transaction at version 2
    // of a three-version ledger.
    let txn_info = TransactionInfo {
        signed_transaction_hash: transaction_hash(&signed, version),
        state_root_hash: [0x11; 32],
        event_root_hash: [0x22; 32],
        gas_used: 0,
        major_status: 4001,
    };
    let leaf = txn_info.hash(version);
    let neighbors = domain_hash2(HashDomain::TransactionAccumulator, &[0x01; 32], &[0x02; 32]);
    let level1 = domain_hash2(
        HashDomain::TransactionAccumulator,
        &leaf,
        &ACCUMULATOR_PLACEHOLDER,
    );
    let root = domain_hash2(HashDomain::TransactionAccumulator, &neighbors, &level1);

    let proof = AccumulatorProof::new(0b10, vec![neighbors]);
    verify_transaction_inclusion(&signed, &txn_info, 2, &proof, root, version)?;
    info!("transaction inclusion verified against root {}", hex::encode(root));

    // And the account side: a fabricated state blob for the sender.
    let resource_path = config.resource_path_bytes()?;
    let resource = AccountResource {
        authentication_key: sender.address,
        balance: 99_000,
        delegated_key_rotation_capability: false,
        delegated_withdrawal_capability: false,
        received_events: EventHandle::empty(),
        sent_events: EventHandle {
            count: 1,
            key: vec![0xE2; 8],
        },
        sequence_number: 1,
    };
    let value = encode(&resource);
    let mut blob = Vec::new();
    blob.extend_from_slice(&1u32.to_le_bytes());
    blob.extend_from_slice(&(resource_path.len() as u32).to_le_bytes());
    blob.extend_from_slice(&resource_path);
    blob.extend_from_slice(&(value.len() as u32).to_le_bytes());
    blob.extend_from_slice(&value);

    let decoded = decode_account_blob(&blob, sender.address, &resource_path, version)?;
    info!(
        "account decoded: balance {}, sequence number {}",
        decoded.balance, decoded.sequence_number
    );
    Ok(())
}
