use thiserror::Error;

/// Decode failures of the canonical codec. Every variant is a malformed-data
/// condition: the caller must treat the input as untrustworthy, there is no
/// recovery.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("input underflow: needed {needed} bytes, {remaining} remaining")]
    Underflow { needed: usize, remaining: usize },
    #[error("length prefix {0} exceeds remaining input")]
    BadLengthPrefix(u32),
    #[error("unknown discriminant {tag} for {kind}")]
    UnknownDiscriminant { kind: &'static str, tag: u8 },
    #[error("invalid boolean byte {0:#04x}")]
    InvalidBool(u8),
    #[error("byte string is not valid utf-8")]
    InvalidUtf8,
    #[error("{field} must be {expected} bytes, got {got}")]
    BadFieldLength {
        field: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("{0} trailing bytes after value")]
    TrailingBytes(usize),
}
