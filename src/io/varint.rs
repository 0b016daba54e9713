//! Variable-length integer encoding (vint/varuint) and the zig-zag mapping
//! used by the `Int` primitive.
//!
//! Wire format: little-endian base-128, continuation bit `0x80` set on every
//! byte but the last (spec §3.1 Invariant B / §6.2). Distinct from protobuf's
//! varint only in that extprot has no separate concept of a "key" varint —
//! the same `encode_varuint`/`decode_varuint` pair backs both prefixes and
//! plain integers.

use bytes::Buf;
use bytes::BufMut;

use crate::error::Error;
use crate::error::Result;

/// Maximum number of bytes a 64-bit varuint can take: `ceil(64/7) == 10`.
pub const MAX_VARINT_BYTES: usize = 10;

/// Encodes `value` as a little-endian base-128 varuint.
#[inline]
pub fn encode_varuint(mut value: u64, buf: &mut impl BufMut) {
    loop {
        if value < 0x80 {
            buf.put_u8(value as u8);
            return;
        }
        buf.put_u8((value as u8 & 0x7f) | 0x80);
        value >>= 7;
    }
}

/// Decodes a little-endian base-128 varuint, failing with
/// [`Error::MalformedVarint`] past 10 bytes and [`Error::TruncatedInput`] on
/// early end of input.
#[inline]
pub fn decode_varuint(buf: &mut impl Buf) -> Result<u64> {
    let mut value: u64 = 0;
    let mut shift: u32 = 0;
    for _ in 0..MAX_VARINT_BYTES {
        if !buf.has_remaining() {
            return Err(Error::truncated("varuint"));
        }
        let byte = buf.get_u8();
        value |= u64::from(byte & 0x7f) << shift;
        if byte & 0x80 == 0 {
            return Ok(value);
        }
        shift += 7;
    }
    Err(Error::MalformedVarint)
}

/// Number of bytes `encode_varuint` would emit for `value`.
#[must_use]
pub const fn encoded_varuint_len(value: u64) -> usize {
    // Every group of 7 bits needs one more byte; the final partial group
    // still needs a byte, hence the `+ 6` before dividing by 7.
    let bits = 64 - value.leading_zeros();
    if bits == 0 { 1 } else { ((bits + 6) / 7) as usize }
}

/// Zig-zag encodes a signed 64-bit integer so small magnitudes of either
/// sign take few bytes once varuint-encoded (spec §3.1 Invariant B).
#[inline]
#[must_use]
pub const fn zigzag_encode(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

/// Inverse of [`zigzag_encode`].
#[inline]
#[must_use]
pub const fn zigzag_decode(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}
