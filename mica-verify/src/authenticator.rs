//! Transaction authenticity checks.
//!
//! Confirms the link between a signed transaction, the hash the ledger
//! claims for it, and the accumulator root the leaf is anchored under.

use crate::accumulator::AccumulatorProof;
use crate::error::VerifyError;

use mica_common::codec::{encode, Encoder};
use mica_common::hash::{domain_hash, HashDomain};
use mica_common::transaction::{SignedTransaction, TransactionInfo};
use mica_common::{HashDigest, ProtocolVersion};

use log::trace;

/// Recomputes the hash the ledger stores for a signed transaction.
pub fn transaction_hash(signed_txn: &SignedTransaction, version: ProtocolVersion) -> HashDigest {
    match version {
        // Legacy wire era: three individually length-prefixed fields.
        ProtocolVersion::V1 => {
            let mut enc = Encoder::new();
            enc.write_bytes(&encode(&signed_txn.raw_txn));
            enc.write_bytes(&signed_txn.public_key);
            enc.write_bytes(&signed_txn.signature);
            domain_hash(HashDomain::SignedTransaction, &enc.into_bytes())
        }
        // Current era: the canonical record bytes as one opaque string.
        ProtocolVersion::V2 => domain_hash(HashDomain::SignedTransaction, &encode(signed_txn)),
    }
}

pub fn verify_transaction_hash(
    signed_txn: &SignedTransaction,
    claimed: HashDigest,
    version: ProtocolVersion,
) -> Result<(), VerifyError> {
    if transaction_hash(signed_txn, version) != claimed {
        return Err(VerifyError::HashMismatch);
    }
    Ok(())
}

/// Full inclusion check for one ledger answer: the signed transaction
/// matches the leaf's claimed hash, and the leaf sits at `position` under
/// the trusted accumulator `root`.
pub fn verify_transaction_inclusion(
    signed_txn: &SignedTransaction,
    txn_info: &TransactionInfo,
    position: u64,
    proof: &AccumulatorProof,
    root: HashDigest,
    version: ProtocolVersion,
) -> Result<(), VerifyError> {
    verify_transaction_hash(signed_txn, txn_info.signed_transaction_hash, version)?;
    let leaf = txn_info.hash(version);
    trace!(
        "verifying leaf {} at position {}",
        hex::encode(leaf),
        position
    );
    proof.verify(leaf, position, root)
}
