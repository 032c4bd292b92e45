use mica_common::error::CodecError;

use thiserror::Error;

/// Terminal verification failures. Any of these means the proof material
/// cannot be trusted; there is no retry or downgrade inside this crate.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("malformed data: {0}")]
    MalformedData(#[from] CodecError),
    #[error("reconstructed accumulator root does not match the expected root")]
    ProofMismatch,
    #[error("transaction hash does not match the hash claimed by the ledger")]
    HashMismatch,
    #[error("account state blob matches no supported schema")]
    UnsupportedSchemaVersion,
}
