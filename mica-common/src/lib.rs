pub mod account;
pub mod codec;
pub mod crypto;
pub mod error;
pub mod hash;
pub mod transaction;

use serde::{Deserialize, Serialize};

pub const ADDRESS_LENGTH: usize = 32;
pub const ED25519_PUBLIC_KEY_LENGTH: usize = 32;
pub const ED25519_SIGNATURE_LENGTH: usize = 64;

pub type Address = [u8; ADDRESS_LENGTH];
pub type HashDigest = [u8; 32];
pub type PublicKeyBytes = [u8; ED25519_PUBLIC_KEY_LENGTH];
pub type SignatureBytes = [u8; ED25519_SIGNATURE_LENGTH];

/// Wire era of the ledger protocol. Two eras exist in the wild and differ in
/// how signed transactions are hashed and how account state blobs are laid
/// out; every era-sensitive operation dispatches on this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProtocolVersion {
    V1,
    V2,
}
