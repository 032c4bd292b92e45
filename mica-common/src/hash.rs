//! Domain-separated hashing.
//!
//! Every record this crate hashes goes through [`domain_hash`] with one of
//! the closed set of [`HashDomain`] labels. The prefix keeps a valid hash of
//! one record kind from being replayed as a hash of another kind, so the
//! bare hash function is deliberately not exported.

use crate::HashDigest;

use sha3::{Digest, Keccak256};

/// Suffix mixed into every domain prefix. Wire constant of the ledger
/// protocol, reproduced byte-for-byte.
pub const HASH_MAGIC_SUFFIX: &[u8] = b"@@$$LIBRA$$@@";

/// Stand-in hash for accumulator siblings the proof marks as default.
pub const ACCUMULATOR_PLACEHOLDER: HashDigest = *b"ACCUMULATOR_PLACEHOLDER_HASH\x00\x00\x00\x00";

/// The closed set of record kinds this core ever hashes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashDomain {
    RawTransaction,
    SignedTransaction,
    TransactionInfo,
    TransactionAccumulator,
}

impl HashDomain {
    fn label(self) -> &'static [u8] {
        match self {
            HashDomain::RawTransaction => b"RawTransaction",
            HashDomain::SignedTransaction => b"SignedTransaction",
            HashDomain::TransactionInfo => b"TransactionInfo",
            HashDomain::TransactionAccumulator => b"TransactionAccumulator",
        }
    }

    /// `keccak256(label ++ magic suffix)`, prepended to every payload hashed
    /// under this domain.
    pub fn prefix(self) -> HashDigest {
        let mut hasher = Keccak256::new();
        hasher.update(self.label());
        hasher.update(HASH_MAGIC_SUFFIX);
        hasher.finalize().into()
    }
}

/// `keccak256(prefix(domain) ++ payload)`.
pub fn domain_hash(domain: HashDomain, payload: &[u8]) -> HashDigest {
    let mut hasher = Keccak256::new();
    hasher.update(domain.prefix());
    hasher.update(payload);
    hasher.finalize().into()
}

/// Two-part payload variant, used for accumulator node combining without an
/// intermediate concatenation.
pub fn domain_hash2(domain: HashDomain, left: &[u8], right: &[u8]) -> HashDigest {
    let mut hasher = Keccak256::new();
    hasher.update(domain.prefix());
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}

/// Ledger addresses are the plain keccak-256 of the ed25519 public key.
/// This is the one sanctioned non-domain use of the hash function: an
/// address is an identifier, not a record hash.
pub fn public_key_hash(key: &[u8]) -> HashDigest {
    let mut hasher = Keccak256::new();
    hasher.update(key);
    hasher.finalize().into()
}

#[cfg(test)]
mod hash_test {
    use super::*;

    #[test]
    fn keccak_anchor_test() {
        // Well-known keccak-256 of the empty string, pinning the hash
        // function choice.
        assert_eq!(
            hex::encode(public_key_hash(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn domain_separation_test() {
        let payload = b"same payload";
        let a = domain_hash(HashDomain::RawTransaction, payload);
        let b = domain_hash(HashDomain::SignedTransaction, payload);
        let c = domain_hash(HashDomain::TransactionInfo, payload);
        let d = domain_hash(HashDomain::TransactionAccumulator, payload);
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
        assert_ne!(b, c);
        assert_ne!(b, d);
        assert_ne!(c, d);
    }

    #[test]
    fn domain_hash_is_prefixed_test() {
        // A domain hash must never equal the bare hash of the same payload.
        let payload = b"payload";
        assert_ne!(
            domain_hash(HashDomain::TransactionInfo, payload),
            public_key_hash(payload)
        );
    }

    #[test]
    fn domain_hash2_concat_test() {
        let left = [1u8; 32];
        let right = [2u8; 32];
        let mut concat = Vec::new();
        concat.extend_from_slice(&left);
        concat.extend_from_slice(&right);
        assert_eq!(
            domain_hash2(HashDomain::TransactionAccumulator, &left, &right),
            domain_hash(HashDomain::TransactionAccumulator, &concat)
        );
    }

    #[test]
    fn placeholder_layout_test() {
        assert_eq!(ACCUMULATOR_PLACEHOLDER.len(), 32);
        assert!(ACCUMULATOR_PLACEHOLDER.starts_with(b"ACCUMULATOR_PLACEHOLDER_HASH"));
    }
}
