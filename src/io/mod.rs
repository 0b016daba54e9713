//! Byte-stream primitives shared by every wire-type reader/writer: varuint
//! and zig-zag codecs (see [`varint`]) plus little-endian fixed-width reads
//! and writes for `Bits32`/`Bits64_long`/`Bits64_float` (spec §3.1, §6.2).

pub mod varint;

pub use varint::decode_varuint;
pub use varint::encode_varuint;
pub use varint::encoded_varuint_len;
pub use varint::zigzag_decode;
pub use varint::zigzag_encode;

use bytes::Buf;
use bytes::BufMut;

use crate::error::Error;
use crate::error::Result;

/// Reads a single byte, mapping empty input to [`Error::EndOfStream`] rather
/// than [`Error::TruncatedInput`] — callers at a value boundary use this to
/// detect a clean stream end (spec §7, "EndOfStream vs TruncatedInput").
#[inline]
pub fn read_byte_or_eof(buf: &mut impl Buf) -> Result<u8> {
    if !buf.has_remaining() {
        return Err(Error::EndOfStream);
    }
    Ok(buf.get_u8())
}

/// Reads a single byte, treating empty input as a truncation: used once a
/// value has started and more bytes are required to finish it.
#[inline]
pub fn read_byte(buf: &mut impl Buf, what: &str) -> Result<u8> {
    if !buf.has_remaining() {
        return Err(Error::truncated(what));
    }
    Ok(buf.get_u8())
}

/// Reads exactly `len` bytes, failing with [`Error::TruncatedInput`] if
/// fewer remain.
pub fn read_exact(buf: &mut impl Buf, len: usize, what: &str) -> Result<alloc::vec::Vec<u8>> {
    if buf.remaining() < len {
        return Err(Error::truncated(what));
    }
    let mut out = alloc::vec![0u8; len];
    buf.copy_to_slice(&mut out);
    Ok(out)
}

/// Advances past `len` bytes without copying them, for `skip_value` on
/// length-delimited wire types.
pub fn skip_bytes(buf: &mut impl Buf, len: usize, what: &str) -> Result<()> {
    if buf.remaining() < len {
        return Err(Error::truncated(what));
    }
    buf.advance(len);
    Ok(())
}

/// Reads a little-endian `u32` (`Bits32`, spec §3.1 wire type 4).
pub fn read_u32le(buf: &mut impl Buf, what: &str) -> Result<u32> {
    if buf.remaining() < 4 {
        return Err(Error::truncated(what));
    }
    Ok(buf.get_u32_le())
}

/// Writes a little-endian `u32`.
pub fn write_u32le(buf: &mut impl BufMut, value: u32) {
    buf.put_u32_le(value);
}

/// Reads a little-endian `u64` (`Bits64_long`/`Bits64_float`, wire types 6/8).
pub fn read_u64le(buf: &mut impl Buf, what: &str) -> Result<u64> {
    if buf.remaining() < 8 {
        return Err(Error::truncated(what));
    }
    Ok(buf.get_u64_le())
}

/// Writes a little-endian `u64`.
pub fn write_u64le(buf: &mut impl BufMut, value: u64) {
    buf.put_u64_le(value);
}
