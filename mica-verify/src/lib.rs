pub mod account_state;
pub mod accumulator;
pub mod authenticator;
pub mod config;
pub mod error;

pub use account_state::{decode_account_blob, decode_account_blob_auto};
pub use accumulator::AccumulatorProof;
pub use authenticator::{transaction_hash, verify_transaction_hash, verify_transaction_inclusion};
pub use config::Config;
pub use error::VerifyError;
