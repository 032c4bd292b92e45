//! Accumulator inclusion proof verification.

use crate::error::VerifyError;

use mica_common::hash::{domain_hash2, HashDomain, ACCUMULATOR_PLACEHOLDER};
use mica_common::HashDigest;

use log::debug;

/// Compact inclusion proof against the transaction accumulator.
///
/// Bit `i` of `bitmap` says whether a non-default sibling exists at tree
/// level `i`, counting from the leaf. `siblings` holds exactly the
/// non-default ones, ordered nearest-the-root first; verification walks from
/// the leaf upward and therefore consumes the list from the tail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccumulatorProof {
    pub bitmap: u64,
    pub siblings: Vec<HashDigest>,
}

impl AccumulatorProof {
    pub fn new(bitmap: u64, siblings: Vec<HashDigest>) -> Self {
        Self { bitmap, siblings }
    }

    /// Reconstructs the root from `leaf` sitting at `position` and compares
    /// it against `expected_root`.
    ///
    /// Succeeds only if the sibling list is consumed exactly and the
    /// reconstructed root matches. A zero bitmap means the leaf is the root
    /// itself. Depth is bounded by the bitmap width, so adversarial input
    /// cannot make this loop unboundedly.
    pub fn verify(
        &self,
        leaf: HashDigest,
        position: u64,
        expected_root: HashDigest,
    ) -> Result<(), VerifyError> {
        if self.bitmap.count_ones() as usize != self.siblings.len() {
            debug!(
                "sibling count {} does not match bitmap popcount {}",
                self.siblings.len(),
                self.bitmap.count_ones()
            );
            return Err(VerifyError::ProofMismatch);
        }

        let mut result = leaf;
        let mut bitmap = self.bitmap;
        let mut position = position;
        let mut rest = self.siblings.as_slice();

        while bitmap > 0 {
            let sibling = if bitmap & 1 == 0 {
                ACCUMULATOR_PLACEHOLDER
            } else {
                match rest.split_last() {
                    Some((last, head)) => {
                        rest = head;
                        *last
                    }
                    None => return Err(VerifyError::ProofMismatch),
                }
            };
            // Even position: the running node is the left child.
            result = if position & 1 == 0 {
                domain_hash2(HashDomain::TransactionAccumulator, &result, &sibling)
            } else {
                domain_hash2(HashDomain::TransactionAccumulator, &sibling, &result)
            };
            bitmap >>= 1;
            position >>= 1;
        }

        if !rest.is_empty() {
            debug!("{} siblings left unconsumed", rest.len());
            return Err(VerifyError::ProofMismatch);
        }
        if result != expected_root {
            debug!(
                "root mismatch: reconstructed {}, expected {}",
                hex::encode(result),
                hex::encode(expected_root)
            );
            return Err(VerifyError::ProofMismatch);
        }
        Ok(())
    }
}

#[cfg(test)]
mod accumulator_test {
    use super::*;

    fn node(left: HashDigest, right: HashDigest) -> HashDigest {
        domain_hash2(HashDomain::TransactionAccumulator, &left, &right)
    }

    #[test]
    fn single_leaf_test() {
        let leaf = [3u8; 32];
        // Zero bitmap: the leaf already is the root.
        AccumulatorProof::new(0, vec![]).verify(leaf, 0, leaf).unwrap();
        assert!(AccumulatorProof::new(0, vec![])
            .verify(leaf, 0, [4u8; 32])
            .is_err());
    }

    #[test]
    fn three_leaf_tree_test() {
        // Tree over versions 0..=2; slot 3 holds the default placeholder.
        //
        //            root
        //           /    \
        //         n01    n2p
        //        /  \    /  \
        //      l0    l1 l2   *
        let l0 = [0u8; 32];
        let l1 = [1u8; 32];
        let l2 = [2u8; 32];
        let n01 = node(l0, l1);
        let n2p = node(l2, ACCUMULATOR_PLACEHOLDER);
        let root = node(n01, n2p);

        // Leaf 0: non-default siblings at both levels, root-nearest first.
        AccumulatorProof::new(0b11, vec![n2p, l1])
            .verify(l0, 0, root)
            .unwrap();
        // Leaf 1 sits on the right at level 0.
        AccumulatorProof::new(0b11, vec![n2p, l0])
            .verify(l1, 1, root)
            .unwrap();
        // Leaf 2: placeholder sibling at level 0, so only one entry.
        AccumulatorProof::new(0b10, vec![n01])
            .verify(l2, 2, root)
            .unwrap();
    }

    #[test]
    fn worked_example_test() {
        // bitmap 0b101, position 0b110, siblings [S_hi, S_lo].
        let leaf = [0xAA; 32];
        let s_hi = [0xBB; 32];
        let s_lo = [0xCC; 32];

        let step1 = node(leaf, s_lo);
        let step2 = node(ACCUMULATOR_PLACEHOLDER, step1);
        let root = node(s_hi, step2);

        AccumulatorProof::new(0b101, vec![s_hi, s_lo])
            .verify(leaf, 0b110, root)
            .unwrap();
    }

    #[test]
    fn byte_flip_test() {
        let l0 = [7u8; 32];
        let l1 = [8u8; 32];
        let root = node(l0, l1);
        let proof = AccumulatorProof::new(0b1, vec![l1]);
        proof.verify(l0, 0, root).unwrap();

        for byte in 0..32 {
            let mut leaf = l0;
            leaf[byte] ^= 0x01;
            assert!(proof.verify(leaf, 0, root).is_err());

            let mut bad_root = root;
            bad_root[byte] ^= 0x01;
            assert!(proof.verify(l0, 0, bad_root).is_err());

            let mut sibling = l1;
            sibling[byte] ^= 0x01;
            assert!(AccumulatorProof::new(0b1, vec![sibling])
                .verify(l0, 0, root)
                .is_err());
        }
    }

    #[test]
    fn sibling_count_mismatch_test() {
        let leaf = [1u8; 32];
        let root = node(leaf, ACCUMULATOR_PLACEHOLDER);
        // bitmap claims no non-default siblings but one is supplied.
        assert!(AccumulatorProof::new(0b10, vec![[5u8; 32]])
            .verify(leaf, 0, root)
            .is_err());
        // bitmap claims two but only one is supplied.
        assert!(AccumulatorProof::new(0b11, vec![[5u8; 32]])
            .verify(leaf, 0, root)
            .is_err());
    }

    #[test]
    fn position_side_test() {
        // The same leaf and sibling at mirrored positions give different
        // roots.
        let leaf = [1u8; 32];
        let sibling = [2u8; 32];
        let left_root = node(leaf, sibling);
        let right_root = node(sibling, leaf);
        assert_ne!(left_root, right_root);
        AccumulatorProof::new(0b1, vec![sibling])
            .verify(leaf, 0, left_root)
            .unwrap();
        AccumulatorProof::new(0b1, vec![sibling])
            .verify(leaf, 1, right_root)
            .unwrap();
    }
}
