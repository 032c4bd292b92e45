//! Transaction data model and its canonical wire encoding.

use crate::codec::{self, CanonicalDecode, CanonicalEncode, Decoder, Encoder};
use crate::error::CodecError;
use crate::hash::{domain_hash, HashDomain};
use crate::{Address, HashDigest, ProtocolVersion, PublicKeyBytes, SignatureBytes};

/// Compiled peer-to-peer transfer program, as emitted by the ledger's
/// standard library build. Opaque bytecode; only its hash-stable bytes
/// matter here.
pub const TRANSFER_OPCODE: &str = "4c49425241564d0a010007014a00000004000000034e000000060000000d54000000060000000e5a0000000600000005600000002900000004890000002000000008a90000000f00000000000001000200010300020002040200030204020300063c53454c463e0c4c696272614163636f756e74046d61696e0f7061795f66726f6d5f73656e6465720000000000000000000000000000000000000000000000000000000000000000000100020004000c000c0113010102";

/// Typed argument of a transaction program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionArgument {
    U64(u64),
    Address(Address),
    String(String),
    ByteArray(Vec<u8>),
}

impl CanonicalEncode for TransactionArgument {
    fn encode(&self, enc: &mut Encoder) {
        match self {
            TransactionArgument::U64(val) => {
                enc.write_variant(0);
                enc.write_u64(*val);
            }
            TransactionArgument::Address(addr) => {
                enc.write_variant(1);
                enc.write_fixed(addr);
            }
            TransactionArgument::String(val) => {
                enc.write_variant(2);
                enc.write_str(val);
            }
            TransactionArgument::ByteArray(bytes) => {
                enc.write_variant(3);
                enc.write_bytes(bytes);
            }
        }
    }
}

impl CanonicalDecode for TransactionArgument {
    fn decode(dec: &mut Decoder) -> Result<Self, CodecError> {
        match dec.read_u8()? {
            0 => Ok(TransactionArgument::U64(dec.read_u64()?)),
            1 => Ok(TransactionArgument::Address(dec.read_fixed()?)),
            2 => Ok(TransactionArgument::String(dec.read_string()?)),
            3 => Ok(TransactionArgument::ByteArray(dec.read_bytes()?)),
            tag => Err(CodecError::UnknownDiscriminant {
                kind: "TransactionArgument",
                tag,
            }),
        }
    }
}

/// Single mutation of a state cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp {
    Deletion,
    Value(Vec<u8>),
}

impl CanonicalEncode for WriteOp {
    fn encode(&self, enc: &mut Encoder) {
        match self {
            WriteOp::Deletion => enc.write_variant(0),
            WriteOp::Value(bytes) => {
                enc.write_variant(1);
                enc.write_bytes(bytes);
            }
        }
    }
}

impl CanonicalDecode for WriteOp {
    fn decode(dec: &mut Decoder) -> Result<Self, CodecError> {
        match dec.read_u8()? {
            0 => Ok(WriteOp::Deletion),
            1 => Ok(WriteOp::Value(dec.read_bytes()?)),
            tag => Err(CodecError::UnknownDiscriminant {
                kind: "WriteOp",
                tag,
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPath {
    pub address: Address,
    pub path: Vec<u8>,
}

impl CanonicalEncode for AccessPath {
    fn encode(&self, enc: &mut Encoder) {
        enc.write_fixed(&self.address);
        enc.write_bytes(&self.path);
    }
}

impl CanonicalDecode for AccessPath {
    fn decode(dec: &mut Decoder) -> Result<Self, CodecError> {
        Ok(AccessPath {
            address: dec.read_fixed()?,
            path: dec.read_bytes()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub code: Vec<u8>,
    pub args: Vec<TransactionArgument>,
    pub modules: Vec<Vec<u8>>,
}

impl CanonicalEncode for Program {
    fn encode(&self, enc: &mut Encoder) {
        enc.write_bytes(&self.code);
        enc.write_seq(&self.args);
        enc.write_seq(&self.modules);
    }
}

impl CanonicalDecode for Program {
    fn decode(dec: &mut Decoder) -> Result<Self, CodecError> {
        Ok(Program {
            code: dec.read_bytes()?,
            args: dec.read_seq()?,
            modules: dec.read_seq()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteSet {
    pub write_set: Vec<(AccessPath, WriteOp)>,
}

impl CanonicalEncode for WriteSet {
    fn encode(&self, enc: &mut Encoder) {
        enc.write_seq(&self.write_set);
    }
}

impl CanonicalDecode for WriteSet {
    fn decode(dec: &mut Decoder) -> Result<Self, CodecError> {
        Ok(WriteSet {
            write_set: dec.read_seq()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    pub code: Vec<u8>,
    pub args: Vec<TransactionArgument>,
}

impl CanonicalEncode for Script {
    fn encode(&self, enc: &mut Encoder) {
        enc.write_bytes(&self.code);
        enc.write_seq(&self.args);
    }
}

impl CanonicalDecode for Script {
    fn decode(dec: &mut Decoder) -> Result<Self, CodecError> {
        Ok(Script {
            code: dec.read_bytes()?,
            args: dec.read_seq()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    pub code: Vec<u8>,
}

impl CanonicalEncode for Module {
    fn encode(&self, enc: &mut Encoder) {
        enc.write_bytes(&self.code);
    }
}

impl CanonicalDecode for Module {
    fn decode(dec: &mut Decoder) -> Result<Self, CodecError> {
        Ok(Module {
            code: dec.read_bytes()?,
        })
    }
}

/// What a transaction executes. Closed set; discriminants are wire values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionPayload {
    Program(Program),
    WriteSet(WriteSet),
    Script(Script),
    Module(Module),
}

impl CanonicalEncode for TransactionPayload {
    fn encode(&self, enc: &mut Encoder) {
        match self {
            TransactionPayload::Program(program) => {
                enc.write_variant(0);
                program.encode(enc);
            }
            TransactionPayload::WriteSet(write_set) => {
                enc.write_variant(1);
                write_set.encode(enc);
            }
            TransactionPayload::Script(script) => {
                enc.write_variant(2);
                script.encode(enc);
            }
            TransactionPayload::Module(module) => {
                enc.write_variant(3);
                module.encode(enc);
            }
        }
    }
}

impl CanonicalDecode for TransactionPayload {
    fn decode(dec: &mut Decoder) -> Result<Self, CodecError> {
        match dec.read_u8()? {
            0 => Ok(TransactionPayload::Program(Program::decode(dec)?)),
            1 => Ok(TransactionPayload::WriteSet(WriteSet::decode(dec)?)),
            2 => Ok(TransactionPayload::Script(Script::decode(dec)?)),
            3 => Ok(TransactionPayload::Module(Module::decode(dec)?)),
            tag => Err(CodecError::UnknownDiscriminant {
                kind: "TransactionPayload",
                tag,
            }),
        }
    }
}

/// Unsigned transaction as built by the sender. Immutable once constructed;
/// consumed only to compute its hash and to serialize for transmission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTransaction {
    pub sender: Address,
    pub sequence_number: u64,
    pub payload: TransactionPayload,
    pub max_gas_amount: u64,
    pub gas_unit_price: u64,
    pub expiration_time: u64,
}

impl RawTransaction {
    /// Peer-to-peer transfer using the embedded compiled transfer program.
    pub fn new_transfer(
        sender: Address,
        sequence_number: u64,
        recipient: Address,
        amount: u64,
        max_gas_amount: u64,
        gas_unit_price: u64,
        expiration_time: u64,
    ) -> Self {
        let code = hex::decode(TRANSFER_OPCODE).expect("transfer opcode constant is valid hex");
        Self {
            sender,
            sequence_number,
            payload: TransactionPayload::Program(Program {
                code,
                args: vec![
                    TransactionArgument::Address(recipient),
                    TransactionArgument::U64(amount),
                ],
                modules: vec![],
            }),
            max_gas_amount,
            gas_unit_price,
            expiration_time,
        }
    }

    /// Domain hash of the canonical bytes; this is what gets signed.
    pub fn hash(&self) -> HashDigest {
        domain_hash(HashDomain::RawTransaction, &codec::encode(self))
    }
}

impl CanonicalEncode for RawTransaction {
    fn encode(&self, enc: &mut Encoder) {
        enc.write_fixed(&self.sender);
        enc.write_u64(self.sequence_number);
        self.payload.encode(enc);
        enc.write_u64(self.max_gas_amount);
        enc.write_u64(self.gas_unit_price);
        enc.write_u64(self.expiration_time);
    }
}

impl CanonicalDecode for RawTransaction {
    fn decode(dec: &mut Decoder) -> Result<Self, CodecError> {
        Ok(RawTransaction {
            sender: dec.read_fixed()?,
            sequence_number: dec.read_u64()?,
            payload: TransactionPayload::decode(dec)?,
            max_gas_amount: dec.read_u64()?,
            gas_unit_price: dec.read_u64()?,
            expiration_time: dec.read_u64()?,
        })
    }
}

/// A raw transaction bound to the key that authorized it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    pub raw_txn: RawTransaction,
    pub public_key: PublicKeyBytes,
    pub signature: SignatureBytes,
}

impl CanonicalEncode for SignedTransaction {
    fn encode(&self, enc: &mut Encoder) {
        self.raw_txn.encode(enc);
        enc.write_fixed(&self.public_key);
        enc.write_fixed(&self.signature);
    }
}

impl CanonicalDecode for SignedTransaction {
    fn decode(dec: &mut Decoder) -> Result<Self, CodecError> {
        Ok(SignedTransaction {
            raw_txn: RawTransaction::decode(dec)?,
            public_key: dec.read_fixed()?,
            signature: dec.read_fixed()?,
        })
    }
}

/// Execution summary the ledger records per version; the leaf anchored in
/// the transaction accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionInfo {
    pub signed_transaction_hash: HashDigest,
    pub state_root_hash: HashDigest,
    pub event_root_hash: HashDigest,
    pub gas_used: u64,
    pub major_status: u64,
}

impl TransactionInfo {
    /// Leaf hash anchored in the accumulator.
    ///
    /// The legacy preimage length-prefixes each digest and stops after gas
    /// used; major status postdates that wire era. The current preimage is
    /// the canonical encoding of the whole record.
    pub fn hash(&self, version: ProtocolVersion) -> HashDigest {
        let mut enc = Encoder::new();
        match version {
            ProtocolVersion::V1 => {
                enc.write_bytes(&self.signed_transaction_hash);
                enc.write_bytes(&self.state_root_hash);
                enc.write_bytes(&self.event_root_hash);
                enc.write_u64(self.gas_used);
            }
            ProtocolVersion::V2 => self.encode(&mut enc),
        }
        domain_hash(HashDomain::TransactionInfo, &enc.into_bytes())
    }
}

impl CanonicalEncode for TransactionInfo {
    fn encode(&self, enc: &mut Encoder) {
        enc.write_fixed(&self.signed_transaction_hash);
        enc.write_fixed(&self.state_root_hash);
        enc.write_fixed(&self.event_root_hash);
        enc.write_u64(self.gas_used);
        enc.write_u64(self.major_status);
    }
}

impl CanonicalDecode for TransactionInfo {
    fn decode(dec: &mut Decoder) -> Result<Self, CodecError> {
        Ok(TransactionInfo {
            signed_transaction_hash: dec.read_fixed()?,
            state_root_hash: dec.read_fixed()?,
            event_root_hash: dec.read_fixed()?,
            gas_used: dec.read_u64()?,
            major_status: dec.read_u64()?,
        })
    }
}
