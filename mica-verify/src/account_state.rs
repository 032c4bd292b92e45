//! Account state blob decoding.
//!
//! The ledger answers an account query with an opaque blob whose layout
//! changed between wire eras. The current era encodes the whole account
//! state as a canonical map from path to value and publishes the account
//! resource under one well-known path; the legacy era is a flat cursor
//! layout with a single key/value pair.

use crate::error::VerifyError;

use mica_common::account::{AccountResource, EventHandle};
use mica_common::codec::{decode, Decoder};
use mica_common::error::CodecError;
use mica_common::{Address, ProtocolVersion, ADDRESS_LENGTH};

use std::collections::BTreeMap;

use log::debug;

/// Decodes an account state blob under an explicitly known protocol
/// version. A zero-length blob means the account does not exist yet and
/// yields the empty sentinel for the queried address.
pub fn decode_account_blob(
    blob: &[u8],
    address: Address,
    resource_path: &[u8],
    version: ProtocolVersion,
) -> Result<AccountResource, VerifyError> {
    if blob.is_empty() {
        return Ok(AccountResource::empty(address));
    }
    let resource = match version {
        ProtocolVersion::V1 => decode_flat_blob(blob)?,
        ProtocolVersion::V2 => decode_map_blob(blob, address, resource_path)?,
    };
    Ok(resource)
}

/// Schema-sniffing variant for callers that do not know the era: tries the
/// map schema first, then the legacy flat layout. Only a blob rejected by
/// both is reported as an unsupported schema.
pub fn decode_account_blob_auto(
    blob: &[u8],
    address: Address,
    resource_path: &[u8],
) -> Result<AccountResource, VerifyError> {
    if blob.is_empty() {
        return Ok(AccountResource::empty(address));
    }
    match decode_map_blob(blob, address, resource_path) {
        Ok(resource) => Ok(resource),
        Err(map_err) => {
            debug!("map schema rejected blob: {}", map_err);
            decode_flat_blob(blob).map_err(|flat_err| {
                debug!("flat schema rejected blob: {}", flat_err);
                VerifyError::UnsupportedSchemaVersion
            })
        }
    }
}

/// Current era: the blob is a canonically encoded ordered map of path bytes
/// to value bytes. The account resource is the strict decode of the value
/// at the well-known path; a well-formed map without that path means the
/// resource has not been published yet.
fn decode_map_blob(
    blob: &[u8],
    address: Address,
    resource_path: &[u8],
) -> Result<AccountResource, CodecError> {
    let mut dec = Decoder::new(blob);
    let count = dec.read_u32()?;
    if count as usize > dec.remaining() {
        return Err(CodecError::BadLengthPrefix(count));
    }
    let mut entries = BTreeMap::new();
    for _ in 0..count {
        let key = dec.read_bytes()?;
        let value = dec.read_bytes()?;
        entries.insert(key, value);
    }
    dec.finish()?;

    match entries.get(resource_path) {
        Some(value) => decode::<AccountResource>(value),
        None => Ok(AccountResource::empty(address)),
    }
}

/// Legacy era: a flat cursor layout holding exactly one key/value pair,
/// with the account resource fields laid out sequentially inside the value.
/// This era predates the key rotation capability, which decodes as false.
fn decode_flat_blob(blob: &[u8]) -> Result<AccountResource, CodecError> {
    let mut dec = Decoder::new(blob);
    let _entries = dec.read_u32()?;
    let _path = dec.read_bytes()?;
    let value = dec.read_bytes()?;

    let mut val = Decoder::new(&value);
    let key = val.read_bytes()?;
    let authentication_key: Address =
        key.as_slice()
            .try_into()
            .map_err(|_| CodecError::BadFieldLength {
                field: "authentication_key",
                expected: ADDRESS_LENGTH,
                got: key.len(),
            })?;
    let balance = val.read_u64()?;
    let delegated_withdrawal_capability = val.read_bool()?;
    let received_events = EventHandle {
        count: val.read_u64()?,
        key: val.read_bytes()?,
    };
    let sent_events = EventHandle {
        count: val.read_u64()?,
        key: val.read_bytes()?,
    };
    let sequence_number = val.read_u64()?;

    Ok(AccountResource {
        authentication_key,
        balance,
        delegated_key_rotation_capability: false,
        delegated_withdrawal_capability,
        received_events,
        sent_events,
        sequence_number,
    })
}
