//! Tag-length-value payload codec for records.
//!
//! Wire layout per non-empty field `i` (0-indexed):
//!
//! ```text
//! varint(((i + 1) << 3) | 2) | varint(len) | len bytes
//! ```
//!
//! This is the protobuf encoding of a message whose `bytes` fields are numbered
//! `1..=N`, so payloads interoperate with protobuf readers of the same row
//! schema. Empty fields are omitted and decode back to empty. Fields are always
//! written in ordinal order, which makes encoding deterministic; decoding
//! accepts any order and skips field numbers it does not know.

use crate::error::{Error, Result};
use crate::record::Record;

const WIRE_VARINT: u8 = 0;
const WIRE_FIXED64: u8 = 1;
const WIRE_LEN: u8 = 2;
const WIRE_FIXED32: u8 = 5;

/// A u64 varint never needs more than ten bytes.
const MAX_VARINT_LEN: usize = 10;

//--- Varints ---

/// Appends `value` as a little-endian base-128 varint.
#[inline]
pub fn write_varint(out: &mut Vec<u8>, mut value: u64) {
    while value >= 0x80 {
        out.push((value as u8) | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
}

/// Number of bytes `write_varint` would emit for `value`.
#[inline]
pub fn varint_len(value: u64) -> usize {
    let bits = 64 - (value | 1).leading_zeros() as usize;
    bits.div_ceil(7)
}

/// Reads a varint starting at `*pos`, advancing `*pos` past it.
#[inline]
pub fn read_varint(buf: &[u8], pos: &mut usize) -> Result<u64> {
    let start = *pos;
    let mut value: u64 = 0;
    for i in 0..MAX_VARINT_LEN {
        let Some(&byte) = buf.get(start + i) else {
            return Err(Error::decode(start, "truncated varint"));
        };
        let low = u64::from(byte & 0x7f);
        if i == MAX_VARINT_LEN - 1 && low > 1 {
            return Err(Error::decode(start, "varint overflows 64 bits"));
        }
        value |= low << (7 * i);
        if byte & 0x80 == 0 {
            *pos = start + i + 1;
            return Ok(value);
        }
    }
    Err(Error::decode(start, "varint longer than 10 bytes"))
}

//--- Encoding ---

#[inline]
fn field_key(ordinal: usize) -> u64 {
    (((ordinal as u64) + 1) << 3) | u64::from(WIRE_LEN)
}

/// Exact payload size `encode` produces for `record`.
pub fn encoded_len<const N: usize>(record: &Record<'_, N>) -> usize {
    record
        .fields()
        .iter()
        .enumerate()
        .filter(|(_, field)| !field.is_empty())
        .map(|(i, field)| {
            varint_len(field_key(i)) + varint_len(field.len() as u64) + field.len()
        })
        .sum()
}

/// Appends the payload for `record` to `out` (existing contents are kept).
pub fn encode_into<const N: usize>(record: &Record<'_, N>, out: &mut Vec<u8>) {
    out.reserve(encoded_len(record));
    for (i, field) in record.fields().iter().enumerate() {
        if field.is_empty() {
            continue;
        }
        write_varint(out, field_key(i));
        write_varint(out, field.len() as u64);
        out.extend_from_slice(field);
    }
}

/// Encodes `record` into a freshly allocated payload.
pub fn encode<const N: usize>(record: &Record<'_, N>) -> Vec<u8> {
    let mut out = Vec::with_capacity(encoded_len(record));
    encode_into(record, &mut out);
    out
}

//--- Decoding ---

fn skip(payload: &[u8], pos: &mut usize, n: usize, offset: usize) -> Result<()> {
    match pos.checked_add(n) {
        Some(end) if end <= payload.len() => {
            *pos = end;
            Ok(())
        }
        _ => Err(Error::decode(offset, "field overruns payload")),
    }
}

/// Decodes a payload into a record whose fields borrow from `payload`.
///
/// Absent fields are empty. Unknown field numbers are skipped for every
/// supported wire type; the last occurrence of a repeated field wins.
pub fn decode<const N: usize>(payload: &[u8]) -> Result<Record<'_, N>> {
    let mut fields: [&[u8]; N] = [&[][..]; N];
    let mut pos = 0;

    while pos < payload.len() {
        let key_offset = pos;
        let key = read_varint(payload, &mut pos)?;
        let field_number = key >> 3;
        let wire_type = (key & 0x7) as u8;
        if field_number == 0 {
            return Err(Error::decode(key_offset, "field number zero"));
        }

        match wire_type {
            WIRE_LEN => {
                let len_offset = pos;
                let len = read_varint(payload, &mut pos)?;
                let len = usize::try_from(len)
                    .map_err(|_| Error::decode(len_offset, "length exceeds address space"))?;
                let start = pos;
                skip(payload, &mut pos, len, len_offset)?;
                if field_number <= N as u64 {
                    fields[(field_number - 1) as usize] = &payload[start..pos];
                } else {
                    tracing::trace!(field_number, len, "skipping unknown field");
                }
            }
            WIRE_VARINT => {
                read_varint(payload, &mut pos)?;
                tracing::trace!(field_number, "skipping varint field");
            }
            WIRE_FIXED64 => skip(payload, &mut pos, 8, key_offset)?,
            WIRE_FIXED32 => skip(payload, &mut pos, 4, key_offset)?,
            _ => return Err(Error::decode(key_offset, "unsupported wire type")),
        }
    }

    Ok(Record::new(fields))
}
