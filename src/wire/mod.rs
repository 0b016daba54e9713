//! Wire codec (spec C2): the ten wire types, the `(tag << 4) | wire_type`
//! prefix, and `skip_value`.
//!
//! Grounded on `original_source/extprot/stream.py` for the prefix layout and
//! per-wire-type bodies, and on the teacher's `encoding.rs` for the general
//! shape of a recursion-guarded reader (kept here as [`DecodeContext`]).
//! Unlike protobuf's `(tag << 3) | wire_type` with a 3-bit wire type,
//! extprot packs the wire type into the *low* 4 bits and the tag into the
//! remaining high bits — see `stream.py: read_prefix`/`write_prefix`.

use alloc::vec::Vec;

use bytes::Buf;
use bytes::BufMut;

use crate::error::Error;
use crate::error::Result;
use crate::io;

/// Recursion depth beyond which nested Tuple/Union/Message/collection
/// decoding is refused, guarding against stack overflow on adversarial or
/// corrupt input. Carried over from the teacher's `encoding::DecodeContext`.
pub const RECURSION_LIMIT: u32 = 100;

/// Tracks decode recursion depth across nested composite wire types.
///
/// Every composite reader (`Tuple`, `HTuple`, `Assoc`, `Message`, `Union`
/// payloads) must call [`DecodeContext::enter_recursion`] before decoding
/// its elements and is responsible for decrementing back on return via the
/// guard's `Drop` impl.
#[derive(Debug, Default, Clone, Copy)]
pub struct DecodeContext {
    depth: u32,
}

impl DecodeContext {
    #[must_use]
    pub const fn new() -> Self {
        Self { depth: 0 }
    }

    /// Increments the depth counter, failing if the limit is exceeded.
    ///
    /// The `no-recursion-limit` feature disables the check entirely, for
    /// callers who have already bounded input size some other way.
    pub fn enter_recursion(&mut self) -> Result<()> {
        #[cfg(not(feature = "no-recursion-limit"))]
        {
            if self.depth >= RECURSION_LIMIT {
                return Err(Error::parse("recursion limit exceeded while decoding"));
            }
        }
        self.depth += 1;
        Ok(())
    }

    pub fn exit_recursion(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

/// The ten wire types a value prefix can carry (spec §3.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireType {
    Vint = 0,
    Tuple = 1,
    Bits8 = 2,
    Bytes = 3,
    Bits32 = 4,
    HTuple = 5,
    Bits64Long = 6,
    Assoc = 7,
    Bits64Float = 8,
    Enum = 10,
}

impl WireType {
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        Some(match value {
            0 => Self::Vint,
            1 => Self::Tuple,
            2 => Self::Bits8,
            3 => Self::Bytes,
            4 => Self::Bits32,
            5 => Self::HTuple,
            6 => Self::Bits64Long,
            7 => Self::Assoc,
            8 => Self::Bits64Float,
            10 => Self::Enum,
            _ => return None,
        })
    }

    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

/// A decoded `(tag, wire_type)` prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prefix {
    pub tag: u64,
    pub wire_type: WireType,
}

/// Encodes a `(tag, wire_type)` prefix as `(tag << 4) | wire_type`.
pub fn write_prefix(buf: &mut impl BufMut, tag: u64, wire_type: WireType) {
    let packed = (tag << 4) | u64::from(wire_type.as_u8());
    io::encode_varuint(packed, buf);
}

/// Decodes a `(tag, wire_type)` prefix, returning [`Error::EndOfStream`] if
/// the stream ends cleanly before the prefix (i.e. at a value boundary).
pub fn read_prefix(buf: &mut impl Buf) -> Result<Prefix> {
    if !buf.has_remaining() {
        return Err(Error::EndOfStream);
    }
    let packed = io::decode_varuint(buf)?;
    let tag = packed >> 4;
    let wire_byte = (packed & 0x0f) as u8;
    let wire_type = WireType::from_u8(wire_byte)
        .ok_or_else(|| Error::unexpected_wire_type(alloc::format!("unknown wire type {wire_byte}")))?;
    Ok(Prefix { tag, wire_type })
}

/// Reads and discards one complete value of wire type `wire_type`, used for
/// forward-compatible skipping of unknown tuple/message fields (spec §4
/// skip rule).
pub fn skip_value(buf: &mut impl Buf, wire_type: WireType, ctx: &mut DecodeContext) -> Result<()> {
    match wire_type {
        WireType::Vint | WireType::Enum => {
            io::decode_varuint(buf)?;
        }
        WireType::Bits8 => {
            io::read_byte(buf, "Bits8 payload")?;
        }
        WireType::Bits32 => {
            io::read_u32le(buf, "Bits32 payload")?;
        }
        WireType::Bits64Long | WireType::Bits64Float => {
            io::read_u64le(buf, "Bits64 payload")?;
        }
        WireType::Bytes => {
            let len = io::decode_varuint(buf)? as usize;
            io::skip_bytes(buf, len, "Bytes payload")?;
        }
        WireType::Tuple | WireType::HTuple | WireType::Assoc => {
            ctx.enter_recursion()?;
            let result = skip_length_delimited_composite(buf, wire_type, ctx);
            ctx.exit_recursion();
            result?;
        }
    }
    Ok(())
}

fn skip_length_delimited_composite(buf: &mut impl Buf, wire_type: WireType, ctx: &mut DecodeContext) -> Result<()> {
    let byte_len = io::decode_varuint(buf)? as usize;
    if buf.remaining() < byte_len {
        return Err(Error::truncated("composite payload"));
    }
    let mut body = buf.copy_to_bytes(byte_len);
    let element_count = io::decode_varuint(&mut body)? as usize;
    match wire_type {
        WireType::Tuple => {
            for _ in 0..element_count {
                let prefix = read_prefix(&mut body)?;
                skip_value(&mut body, prefix.wire_type, ctx)?;
            }
        }
        WireType::HTuple => {
            if element_count > 0 {
                let prefix = read_prefix(&mut body)?;
                skip_value(&mut body, prefix.wire_type, ctx)?;
                for _ in 1..element_count {
                    let next = read_prefix(&mut body)?;
                    skip_value(&mut body, next.wire_type, ctx)?;
                }
            }
        }
        WireType::Assoc => {
            for _ in 0..element_count {
                let key_prefix = read_prefix(&mut body)?;
                skip_value(&mut body, key_prefix.wire_type, ctx)?;
                let val_prefix = read_prefix(&mut body)?;
                skip_value(&mut body, val_prefix.wire_type, ctx)?;
            }
        }
        _ => unreachable!("only called for length-delimited composites"),
    }
    Ok(())
}

/// Reads a length-delimited composite body (Tuple/HTuple/Assoc) into an
/// owned buffer along with its declared element count, leaving the caller
/// to interpret the elements according to the declared type. Small values
/// are slurped into memory in one shot (spec §4.2.2).
pub fn read_composite_body(buf: &mut impl Buf, what: &str) -> Result<(usize, Vec<u8>)> {
    let byte_len = io::decode_varuint(buf)? as usize;
    if buf.remaining() < byte_len {
        return Err(Error::truncated(what));
    }
    let mut body = io::read_exact(buf, byte_len, what)?;
    let mut body_slice = &body[..];
    let count = io::decode_varuint(&mut body_slice)? as usize;
    let consumed = byte_len - body_slice.len();
    body.drain(0..consumed);
    Ok((count, body))
}

/// Writes a length-delimited composite: element count followed by
/// `elements`, the whole thing prefixed with its total byte length.
pub fn write_composite_body(buf: &mut impl BufMut, element_count: usize, elements: &[u8]) {
    let mut inner = Vec::with_capacity(elements.len() + 5);
    io::encode_varuint(element_count as u64, &mut inner);
    inner.extend_from_slice(elements);
    io::encode_varuint(inner.len() as u64, buf);
    buf.put_slice(&inner);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_roundtrip() {
        for &(tag, wt) in &[
            (0u64, WireType::Vint),
            (1, WireType::Tuple),
            (200, WireType::Bytes),
            (15, WireType::Enum),
        ] {
            let mut buf = Vec::new();
            write_prefix(&mut buf, tag, wt);
            let mut slice = &buf[..];
            let prefix = read_prefix(&mut slice).unwrap();
            assert_eq!(prefix.tag, tag);
            assert_eq!(prefix.wire_type, wt);
        }
    }

    #[test]
    fn clean_eof_at_prefix_boundary() {
        let mut empty: &[u8] = &[];
        assert_eq!(read_prefix(&mut empty), Err(Error::EndOfStream));
    }

    #[test]
    fn skip_vint_value() {
        let mut buf = Vec::new();
        io::encode_varuint(300, &mut buf);
        let mut slice = &buf[..];
        let mut ctx = DecodeContext::new();
        skip_value(&mut slice, WireType::Vint, &mut ctx).unwrap();
        assert!(slice.is_empty());
    }

    #[test]
    fn skip_tuple_with_nested_fields() {
        // Tuple of two Vint fields: [tag0:Vint, tag1:Vint]
        let mut elements = Vec::new();
        write_prefix(&mut elements, 0, WireType::Vint);
        io::encode_varuint(42, &mut elements);
        write_prefix(&mut elements, 1, WireType::Vint);
        io::encode_varuint(7, &mut elements);

        let mut buf = Vec::new();
        write_composite_body(&mut buf, 2, &elements);

        let mut slice = &buf[..];
        let mut ctx = DecodeContext::new();
        skip_value(&mut slice, WireType::Tuple, &mut ctx).unwrap();
        assert!(slice.is_empty());
    }

    #[test]
    fn read_composite_body_reports_count_and_bytes() {
        let mut elements = Vec::new();
        write_prefix(&mut elements, 0, WireType::Vint);
        io::encode_varuint(9, &mut elements);

        let mut buf = Vec::new();
        write_composite_body(&mut buf, 1, &elements);

        let mut slice = &buf[..];
        let (count, body) = read_composite_body(&mut slice, "tuple").unwrap();
        assert_eq!(count, 1);
        assert_eq!(body, elements);
    }
}
