//! Shared helpers for reading sequential binary data from byte slices.
//!
//! Parsing functions in this crate take a `&mut &[u8]` and advance it past
//! whatever they consume, so a caller can keep decoding from where the last
//! field ended.

use bitcoin::consensus::encode::VarInt;
use bitcoin::consensus::Decodable;

use crate::chain::error::ParseError;

/// Bitcoin CompactSize (varint) reader.
pub struct CompactSize;

impl CompactSize {
    /// Reads a CompactSize-encoded integer, advancing `data` past it.
    pub fn read(data: &mut &[u8]) -> Result<u64, ParseError> {
        let VarInt(value) = VarInt::consensus_decode(data)?;
        Ok(value)
    }
}

/// Reads exactly `len` bytes, advancing `data` past them.
///
/// `field` names the field being read and is included in the error when the
/// buffer holds fewer than `len` bytes.
pub fn read_bytes(data: &mut &[u8], len: usize, field: &'static str) -> Result<Vec<u8>, ParseError> {
    if data.len() < len {
        return Err(ParseError::UnexpectedEof {
            field,
            expected: len,
            actual: data.len(),
        });
    }
    let (head, tail) = data.split_at(len);
    *data = tail;
    Ok(head.to_vec())
}
