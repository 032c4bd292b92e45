//! On-chain account resource model.

use crate::codec::{CanonicalDecode, CanonicalEncode, Decoder, Encoder};
use crate::error::CodecError;
use crate::{Address, ADDRESS_LENGTH};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventHandle {
    pub count: u64,
    pub key: Vec<u8>,
}

impl EventHandle {
    pub fn empty() -> Self {
        Self::default()
    }
}

impl CanonicalEncode for EventHandle {
    fn encode(&self, enc: &mut Encoder) {
        enc.write_u64(self.count);
        enc.write_bytes(&self.key);
    }
}

impl CanonicalDecode for EventHandle {
    fn decode(dec: &mut Decoder) -> Result<Self, CodecError> {
        Ok(EventHandle {
            count: dec.read_u64()?,
            key: dec.read_bytes()?,
        })
    }
}

/// The account resource published under every created account. Read-only
/// input here; the ledger owns the authoritative copy.
///
/// The authentication key is 32 bytes in memory but length-prefixed on the
/// wire, a quirk of the ledger's state layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountResource {
    pub authentication_key: Address,
    pub balance: u64,
    pub delegated_key_rotation_capability: bool,
    pub delegated_withdrawal_capability: bool,
    pub received_events: EventHandle,
    pub sent_events: EventHandle,
    pub sequence_number: u64,
}

impl AccountResource {
    /// Sentinel for an address the ledger has no state for yet: all-zero
    /// counters and flags, authentication key equal to the queried address.
    pub fn empty(address: Address) -> Self {
        Self {
            authentication_key: address,
            balance: 0,
            delegated_key_rotation_capability: false,
            delegated_withdrawal_capability: false,
            received_events: EventHandle::empty(),
            sent_events: EventHandle::empty(),
            sequence_number: 0,
        }
    }
}

impl CanonicalEncode for AccountResource {
    fn encode(&self, enc: &mut Encoder) {
        enc.write_bytes(&self.authentication_key);
        enc.write_u64(self.balance);
        enc.write_bool(self.delegated_key_rotation_capability);
        enc.write_bool(self.delegated_withdrawal_capability);
        self.received_events.encode(enc);
        self.sent_events.encode(enc);
        enc.write_u64(self.sequence_number);
    }
}

impl CanonicalDecode for AccountResource {
    fn decode(dec: &mut Decoder) -> Result<Self, CodecError> {
        let key = dec.read_bytes()?;
        let authentication_key: Address =
            key.as_slice()
                .try_into()
                .map_err(|_| CodecError::BadFieldLength {
                    field: "authentication_key",
                    expected: ADDRESS_LENGTH,
                    got: key.len(),
                })?;
        Ok(AccountResource {
            authentication_key,
            balance: dec.read_u64()?,
            delegated_key_rotation_capability: dec.read_bool()?,
            delegated_withdrawal_capability: dec.read_bool()?,
            received_events: EventHandle::decode(dec)?,
            sent_events: EventHandle::decode(dec)?,
            sequence_number: dec.read_u64()?,
        })
    }
}
