//! Canonical binary codec.
//!
//! The single deterministic encoding used both as the wire format and as the
//! hash preimage for every record in this crate. The rules are a
//! compatibility contract with the remote ledger and cannot change:
//! little-endian integers, 4-byte little-endian length prefixes for
//! variable-length sequences, fixed-width byte arrays written verbatim,
//! struct fields in declaration order, and a single discriminant byte for
//! tagged variants.

use crate::error::CodecError;

use bytes::{Buf, BufMut, BytesMut};

pub trait CanonicalEncode {
    fn encode(&self, enc: &mut Encoder);
}

pub trait CanonicalDecode: Sized {
    fn decode(dec: &mut Decoder) -> Result<Self, CodecError>;
}

pub fn encode<T: CanonicalEncode>(value: &T) -> Vec<u8> {
    let mut enc = Encoder::new();
    value.encode(&mut enc);
    enc.into_bytes()
}

/// Strict decode: the value must consume the whole buffer. Unconsumed
/// trailing bytes are rejected; use a [`Decoder`] directly to read a value
/// out of a longer stream.
pub fn decode<T: CanonicalDecode>(bytes: &[u8]) -> Result<T, CodecError> {
    let mut dec = Decoder::new(bytes);
    let value = T::decode(&mut dec)?;
    dec.finish()?;
    Ok(value)
}

#[derive(Debug, Default)]
pub struct Encoder {
    buf: BytesMut,
}

impl Encoder {
    pub fn new() -> Self {
        Self {
            buf: BytesMut::new(),
        }
    }

    pub fn write_u8(&mut self, val: u8) {
        self.buf.put_u8(val);
    }

    pub fn write_u16(&mut self, val: u16) {
        self.buf.put_u16_le(val);
    }

    pub fn write_u32(&mut self, val: u32) {
        self.buf.put_u32_le(val);
    }

    pub fn write_u64(&mut self, val: u64) {
        self.buf.put_u64_le(val);
    }

    pub fn write_bool(&mut self, val: bool) {
        self.buf.put_u8(val as u8);
    }

    /// Fixed-width field, written verbatim with no length prefix.
    pub fn write_fixed(&mut self, bytes: &[u8]) {
        self.buf.put_slice(bytes);
    }

    /// Variable-length byte string: 4-byte little-endian length, then the
    /// raw bytes.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        let len = u32::try_from(bytes.len()).expect("sequence longer than u32::MAX");
        self.buf.put_u32_le(len);
        self.buf.put_slice(bytes);
    }

    pub fn write_str(&mut self, val: &str) {
        self.write_bytes(val.as_bytes());
    }

    /// Repeated field: 4-byte little-endian element count, then each element
    /// in order.
    pub fn write_seq<T: CanonicalEncode>(&mut self, items: &[T]) {
        let len = u32::try_from(items.len()).expect("sequence longer than u32::MAX");
        self.buf.put_u32_le(len);
        for item in items {
            item.encode(self);
        }
    }

    /// Discriminant byte of a tagged variant.
    pub fn write_variant(&mut self, tag: u8) {
        self.buf.put_u8(tag);
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf.to_vec()
    }
}

#[derive(Debug)]
pub struct Decoder<'a> {
    buf: &'a [u8],
}

impl<'a> Decoder<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    pub fn remaining(&self) -> usize {
        self.buf.len()
    }

    fn need(&self, needed: usize) -> Result<(), CodecError> {
        if self.buf.remaining() < needed {
            return Err(CodecError::Underflow {
                needed,
                remaining: self.buf.remaining(),
            });
        }
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8, CodecError> {
        self.need(1)?;
        Ok(self.buf.get_u8())
    }

    pub fn read_u16(&mut self) -> Result<u16, CodecError> {
        self.need(2)?;
        Ok(self.buf.get_u16_le())
    }

    pub fn read_u32(&mut self) -> Result<u32, CodecError> {
        self.need(4)?;
        Ok(self.buf.get_u32_le())
    }

    pub fn read_u64(&mut self) -> Result<u64, CodecError> {
        self.need(8)?;
        Ok(self.buf.get_u64_le())
    }

    pub fn read_bool(&mut self) -> Result<bool, CodecError> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(CodecError::InvalidBool(other)),
        }
    }

    pub fn read_fixed<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        self.need(N)?;
        let mut out = [0u8; N];
        self.buf.copy_to_slice(&mut out);
        Ok(out)
    }

    pub fn read_bytes(&mut self) -> Result<Vec<u8>, CodecError> {
        let len = self.read_u32()?;
        if len as usize > self.buf.remaining() {
            return Err(CodecError::BadLengthPrefix(len));
        }
        let mut out = vec![0u8; len as usize];
        self.buf.copy_to_slice(&mut out);
        Ok(out)
    }

    pub fn read_string(&mut self) -> Result<String, CodecError> {
        String::from_utf8(self.read_bytes()?).map_err(|_| CodecError::InvalidUtf8)
    }

    pub fn read_seq<T: CanonicalDecode>(&mut self) -> Result<Vec<T>, CodecError> {
        let len = self.read_u32()?;
        // Every element encodes to at least one byte, so a count beyond the
        // remaining byte count is malformed before any allocation happens.
        if len as usize > self.buf.remaining() {
            return Err(CodecError::BadLengthPrefix(len));
        }
        let mut out = Vec::with_capacity(len as usize);
        for _ in 0..len {
            out.push(T::decode(self)?);
        }
        Ok(out)
    }

    /// Strict-mode tail check: fails unless the buffer is fully consumed.
    pub fn finish(self) -> Result<(), CodecError> {
        if !self.buf.is_empty() {
            return Err(CodecError::TrailingBytes(self.buf.len()));
        }
        Ok(())
    }
}

impl CanonicalEncode for u8 {
    fn encode(&self, enc: &mut Encoder) {
        enc.write_u8(*self);
    }
}

impl CanonicalDecode for u8 {
    fn decode(dec: &mut Decoder) -> Result<Self, CodecError> {
        dec.read_u8()
    }
}

impl CanonicalEncode for u16 {
    fn encode(&self, enc: &mut Encoder) {
        enc.write_u16(*self);
    }
}

impl CanonicalDecode for u16 {
    fn decode(dec: &mut Decoder) -> Result<Self, CodecError> {
        dec.read_u16()
    }
}

impl CanonicalEncode for u32 {
    fn encode(&self, enc: &mut Encoder) {
        enc.write_u32(*self);
    }
}

impl CanonicalDecode for u32 {
    fn decode(dec: &mut Decoder) -> Result<Self, CodecError> {
        dec.read_u32()
    }
}

impl CanonicalEncode for u64 {
    fn encode(&self, enc: &mut Encoder) {
        enc.write_u64(*self);
    }
}

impl CanonicalDecode for u64 {
    fn decode(dec: &mut Decoder) -> Result<Self, CodecError> {
        dec.read_u64()
    }
}

impl CanonicalEncode for bool {
    fn encode(&self, enc: &mut Encoder) {
        enc.write_bool(*self);
    }
}

impl CanonicalDecode for bool {
    fn decode(dec: &mut Decoder) -> Result<Self, CodecError> {
        dec.read_bool()
    }
}

impl<const N: usize> CanonicalEncode for [u8; N] {
    fn encode(&self, enc: &mut Encoder) {
        enc.write_fixed(self);
    }
}

impl<const N: usize> CanonicalDecode for [u8; N] {
    fn decode(dec: &mut Decoder) -> Result<Self, CodecError> {
        dec.read_fixed()
    }
}

impl CanonicalEncode for Vec<u8> {
    fn encode(&self, enc: &mut Encoder) {
        enc.write_bytes(self);
    }
}

impl CanonicalDecode for Vec<u8> {
    fn decode(dec: &mut Decoder) -> Result<Self, CodecError> {
        dec.read_bytes()
    }
}

impl CanonicalEncode for String {
    fn encode(&self, enc: &mut Encoder) {
        enc.write_str(self);
    }
}

impl CanonicalDecode for String {
    fn decode(dec: &mut Decoder) -> Result<Self, CodecError> {
        dec.read_string()
    }
}

impl<A: CanonicalEncode, B: CanonicalEncode> CanonicalEncode for (A, B) {
    fn encode(&self, enc: &mut Encoder) {
        self.0.encode(enc);
        self.1.encode(enc);
    }
}

impl<A: CanonicalDecode, B: CanonicalDecode> CanonicalDecode for (A, B) {
    fn decode(dec: &mut Decoder) -> Result<Self, CodecError> {
        Ok((A::decode(dec)?, B::decode(dec)?))
    }
}

#[cfg(test)]
mod codec_test {
    use super::*;

    #[test]
    fn integer_layout_test() {
        let mut enc = Encoder::new();
        enc.write_u8(0xAB);
        enc.write_u16(0x0102);
        enc.write_u32(0xDEADBEEF);
        enc.write_u64(0x01020304_05060708);
        assert_eq!(
            enc.into_bytes(),
            vec![
                0xAB, 0x02, 0x01, 0xEF, 0xBE, 0xAD, 0xDE, 0x08, 0x07, 0x06, 0x05, 0x04, 0x03,
                0x02, 0x01
            ]
        );
    }

    #[test]
    fn bytes_length_prefix_test() {
        let mut enc = Encoder::new();
        enc.write_bytes(&[0xCA, 0xFE]);
        assert_eq!(enc.into_bytes(), vec![0x02, 0x00, 0x00, 0x00, 0xCA, 0xFE]);
    }

    #[test]
    fn fixed_no_prefix_test() {
        assert_eq!(encode(&[0x11u8; 4]), vec![0x11; 4]);
    }

    #[test]
    fn round_trip_test() {
        assert_eq!(decode::<u64>(&encode(&42u64)).unwrap(), 42);
        assert_eq!(decode::<bool>(&encode(&true)).unwrap(), true);
        assert_eq!(
            decode::<Vec<u8>>(&encode(&vec![1u8, 2, 3])).unwrap(),
            vec![1, 2, 3]
        );
        assert_eq!(
            decode::<String>(&encode(&"hello".to_string())).unwrap(),
            "hello"
        );
        assert_eq!(decode::<[u8; 32]>(&encode(&[7u8; 32])).unwrap(), [7u8; 32]);
        assert_eq!(
            decode::<(u64, Vec<u8>)>(&encode(&(9u64, vec![4u8]))).unwrap(),
            (9, vec![4])
        );
    }

    #[test]
    fn seq_round_trip_test() {
        let items = vec![vec![1u8, 2], vec![], vec![3u8]];
        let mut enc = Encoder::new();
        enc.write_seq(&items);
        let bytes = enc.into_bytes();
        let mut dec = Decoder::new(&bytes);
        assert_eq!(dec.read_seq::<Vec<u8>>().unwrap(), items);
        dec.finish().unwrap();
    }

    #[test]
    fn strict_trailing_bytes_test() {
        let mut bytes = encode(&7u64);
        bytes.push(0);
        assert_eq!(decode::<u64>(&bytes), Err(CodecError::TrailingBytes(1)));
    }

    #[test]
    fn underflow_test() {
        assert_eq!(
            decode::<u64>(&[0x01, 0x02]),
            Err(CodecError::Underflow {
                needed: 8,
                remaining: 2
            })
        );
    }

    #[test]
    fn bad_length_prefix_test() {
        // Claims 16 bytes of payload, carries one.
        let bytes = [0x10, 0x00, 0x00, 0x00, 0xFF];
        assert_eq!(
            decode::<Vec<u8>>(&bytes),
            Err(CodecError::BadLengthPrefix(16))
        );
    }

    #[test]
    fn invalid_bool_test() {
        assert_eq!(decode::<bool>(&[2]), Err(CodecError::InvalidBool(2)));
    }

    #[test]
    fn invalid_utf8_test() {
        let bytes = [0x02, 0x00, 0x00, 0x00, 0xFF, 0xFE];
        assert_eq!(decode::<String>(&bytes), Err(CodecError::InvalidUtf8));
    }
}
