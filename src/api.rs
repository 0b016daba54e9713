//! Public API (spec C6): `encode`/`decode` over owned buffers, and
//! `write_to`/`read_from`/`skip_one` over arbitrary `bytes::Buf`/`BufMut`
//! streams for callers composing several values into one larger stream.

use alloc::vec::Vec;

use bytes::Buf;
use bytes::BufMut;

use crate::error::Result;
use crate::types::Type;
use crate::value;
use crate::value::Value;
use crate::wire;
use crate::wire::DecodeContext;

/// Validates `value` against `ty` and encodes it to a freshly allocated
/// buffer, prefixed as a standalone value (tag 0).
pub fn encode(value: &Value, ty: &Type) -> Result<Vec<u8>> {
    let converted = value::convert(value, ty)?;
    let mut buf = Vec::new();
    value::encode_tagged(&mut buf, 0, &converted, ty)?;
    Ok(buf)
}

/// Decodes a single complete value of type `ty` from `bytes`. A clean,
/// entirely empty input yields [`crate::error::Error::EndOfStream`]; any
/// other failure partway through a value is `TruncatedInput`,
/// `UnexpectedWireType`, or `Unpromotable`.
pub fn decode(bytes: &[u8], ty: &Type) -> Result<Value> {
    let mut slice = bytes;
    read_from(&mut slice, ty)
}

/// Validates `value` against `ty` and writes it directly to `sink`.
pub fn write_to(sink: &mut impl BufMut, value: &Value, ty: &Type) -> Result<()> {
    let converted = value::convert(value, ty)?;
    value::encode_tagged(sink, 0, &converted, ty)
}

/// Reads a single complete value of type `ty` from `source`, starting a
/// fresh recursion-depth budget for this value.
pub fn read_from(source: &mut impl Buf, ty: &Type) -> Result<Value> {
    let mut ctx = DecodeContext::new();
    value::decode(source, ty, &mut ctx)
}

/// Reads and discards exactly one value from `source` without knowing its
/// declared type, using only the wire-level prefix and length delimiters
/// (spec §4 forward-compatible skip rule). A clean empty `source` yields
/// `EndOfStream`, matching `read_from`'s boundary behavior.
pub fn skip_one(source: &mut impl Buf) -> Result<()> {
    let prefix = wire::read_prefix(source)?;
    let mut ctx = DecodeContext::new();
    wire::skip_value(source, prefix.wire_type, &mut ctx)
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec;

    use super::*;
    use crate::types::TupleType;

    #[test]
    fn encode_decode_roundtrip() {
        let ty = Type::Tuple(Rc::new(TupleType { elements: vec![Type::Bool, Type::Int] }));
        let value = Value::Tuple(vec![Value::Bool(true), Value::Int(-17)]);
        let bytes = encode(&value, &ty).unwrap();
        let decoded = decode(&bytes, &ty).unwrap();
        assert_eq!(decoded, value);
    }

    #[test]
    fn decode_empty_input_is_clean_eof() {
        let err = decode(&[], &Type::Bool).unwrap_err();
        assert!(err.is_end_of_stream());
    }

    #[test]
    fn skip_one_then_read_next_value() {
        let mut buf = Vec::new();
        write_to(&mut buf, &Value::Int(1), &Type::Int).unwrap();
        write_to(&mut buf, &Value::Int(2), &Type::Int).unwrap();

        let mut slice = &buf[..];
        skip_one(&mut slice).unwrap();
        let second = read_from(&mut slice, &Type::Int).unwrap();
        assert_eq!(second, Value::Int(2));
    }
}
