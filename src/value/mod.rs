//! Typed value containers (spec C4): the runtime representation that
//! mirrors the type model in `types`, validating every mutation through the
//! declared element type's conversion rule.
//!
//! Grounded on `original_source/extprot/types.py` (`Message.__eq__`
//! structural equality, the constant-`Option`-has-no-instance rule) and on
//! the teacher's `traits.rs` dispatch-table shape for `encode`/`decode`.

pub mod list;
pub mod map;

use alloc::boxed::Box;
use alloc::format;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::string::ToString;
use alloc::vec;
use alloc::vec::Vec;

use bytes::Buf;
use bytes::BufMut;

pub use list::TypedList;
pub use map::TypedMap;

use crate::error::Error;
use crate::error::Result;
use crate::io;
use crate::types::FieldDef;
use crate::types::Type;
use crate::types::UnionDef;
use crate::types::UnionVariant;
use crate::wire;
use crate::wire::DecodeContext;
use crate::wire::WireType;

/// A constructed union value: which variant, and its payload if any.
#[derive(Debug, Clone)]
pub struct OptionValue {
    pub def: Rc<UnionDef>,
    pub variant_index: usize,
    /// `None` for a constant variant (spec §4.4: no per-instance storage for
    /// constants — the variant index alone identifies the value).
    pub payload: Option<Vec<Value>>,
}

impl PartialEq for OptionValue {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.def, &other.def) && self.variant_index == other.variant_index && self.payload == other.payload
    }
}

impl OptionValue {
    #[must_use]
    pub fn variant(&self) -> &UnionVariant {
        &self.def.variants[self.variant_index]
    }
}

/// A constructed message value: a named field set, tracking which fields
/// have been initialized so [`Error::ImmutableField`] can be enforced on
/// re-assignment (spec §4.4).
#[derive(Debug, Clone)]
pub struct MessageRecord {
    pub def: Rc<crate::types::MessageDef>,
    values: Vec<Option<Value>>,
}

impl MessageRecord {
    #[must_use]
    pub fn new(def: Rc<crate::types::MessageDef>) -> Self {
        let len = def.fields.len();
        Self { def, values: vec![None; len] }
    }

    fn field_index(&self, name: &str) -> Option<usize> {
        self.def.fields.iter().position(|f| f.name == name)
    }

    /// Sets a field by name, enforcing the immutable-after-init rule: once
    /// a non-`mutable` field has a value, reassigning it is an error.
    pub fn set(&mut self, name: &str, value: Value) -> Result<()> {
        let idx = self.field_index(name).ok_or_else(|| Error::type_mismatch(format!("no such field `{name}`")))?;
        let field = &self.def.fields[idx];
        let converted = convert(&value, &field.ty)?;
        if self.values[idx].is_some() && !field.mutable {
            return Err(Error::immutable_field(name.to_string()));
        }
        self.values[idx] = Some(converted);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.field_index(name).and_then(|idx| self.values[idx].as_ref())
    }

    /// True once every field has been assigned, either explicitly or by
    /// default-filling.
    #[must_use]
    pub fn is_fully_initialized(&self) -> bool {
        self.values.iter().all(Option::is_some)
    }

    /// Fills any remaining unset fields from their declared type's default
    /// value (spec §4 default rule), failing if a field's type has none.
    pub fn fill_defaults(&mut self) -> Result<()> {
        for (idx, field) in self.def.fields.iter().enumerate() {
            if self.values[idx].is_none() {
                self.values[idx] = Some(default(&field.ty)?);
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldDef] {
        &self.def.fields
    }

    #[must_use]
    pub fn values(&self) -> &[Option<Value>] {
        &self.values
    }
}

impl PartialEq for MessageRecord {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.def, &other.def) && self.values == other.values
    }
}

/// The runtime value corresponding to a `types::Type` (spec §3.2/§4.4).
///
/// `String` holds an opaque byte string, not validated UTF-8, matching
/// `original_source/extprot/types.py: String.convert` and spec's wording of
/// `String` as a byte sequence.
#[derive(Debug, Clone)]
pub enum Value {
    Bool(bool),
    Byte(u8),
    Int(i64),
    /// Unsigned per spec §9's resolution of the `Long` signedness question.
    Long(u64),
    Float(f64),
    String(Vec<u8>),
    Tuple(Vec<Value>),
    List(TypedList),
    Array(TypedList),
    Assoc(TypedMap),
    Option(OptionValue),
    Message(Box<MessageRecord>),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Byte(a), Value::Byte(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            // Compared bitwise so `Value` can implement `Eq`/`Hash` (needed
            // as an Assoc map key) without IEEE-754's NaN != NaN breaking
            // reflexivity.
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Tuple(a), Value::Tuple(b)) => a == b,
            (Value::List(a), Value::List(b)) | (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Assoc(a), Value::Assoc(b)) => a == b,
            (Value::Option(a), Value::Option(b)) => a == b,
            (Value::Message(a), Value::Message(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl core::hash::Hash for Value {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        core::mem::discriminant(self).hash(state);
        match self {
            Value::Bool(b) => b.hash(state),
            Value::Byte(b) => b.hash(state),
            Value::Int(n) => n.hash(state),
            Value::Long(n) => n.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::String(s) => s.hash(state),
            Value::Tuple(elements) => elements.hash(state),
            Value::List(list) | Value::Array(list) => list.hash(state),
            Value::Assoc(_) | Value::Option(_) | Value::Message(_) => {
                // Composite/union/message keys are not expected in
                // practice; fall back to the discriminant alone rather
                // than requiring every nested type to be hashable.
            }
        }
    }
}

/// Validates and (where needed) coerces `value` against `ty`, mirroring
/// `types.py`'s per-type `convert` methods.
pub fn convert(value: &Value, ty: &Type) -> Result<Value> {
    let resolved = ty.resolved()?;
    match (&resolved, value) {
        (Type::Bool, Value::Bool(b)) => Ok(Value::Bool(*b)),
        (Type::Byte, Value::Byte(b)) => Ok(Value::Byte(*b)),
        (Type::Int, Value::Int(n)) => Ok(Value::Int(*n)),
        (Type::Long, Value::Long(n)) => Ok(Value::Long(*n)),
        (Type::Float, Value::Float(f)) => Ok(Value::Float(*f)),
        (Type::String, Value::String(s)) => Ok(Value::String(s.clone())),
        (Type::Tuple(tt), Value::Tuple(elements)) => {
            if elements.len() != tt.elements.len() {
                return Err(Error::type_mismatch(format!("tuple arity mismatch: expected {}, got {}", tt.elements.len(), elements.len())));
            }
            let converted = elements
                .iter()
                .zip(tt.elements.iter())
                .map(|(v, t)| convert(v, t))
                .collect::<Result<Vec<_>>>()?;
            Ok(Value::Tuple(converted))
        }
        (Type::List(inner), Value::List(list)) | (Type::List(inner), Value::Array(list)) => {
            Ok(Value::List(TypedList::from_values(inner.clone(), list.iter().cloned())?))
        }
        (Type::Array(inner), Value::Array(list)) | (Type::Array(inner), Value::List(list)) => {
            Ok(Value::Array(TypedList::from_values(inner.clone(), list.iter().cloned())?))
        }
        (Type::Assoc(key_ty, val_ty), Value::Assoc(map)) => Ok(Value::Assoc(TypedMap::from_pairs(key_ty.clone(), val_ty.clone(), map.iter().map(|(k, v)| (k.clone(), v.clone())))?)),
        (Type::Union(def), Value::Option(option)) => {
            if !Rc::ptr_eq(def, &option.def) {
                return Err(Error::type_mismatch(format!("value belongs to a different union than `{}`", def.name)));
            }
            Ok(value.clone())
        }
        (Type::Message(def), Value::Message(record)) => {
            if !Rc::ptr_eq(def, &record.def) {
                return Err(Error::type_mismatch(format!("value belongs to a different message than `{}`", def.name)));
            }
            Ok(value.clone())
        }
        _ => Err(Error::type_mismatch(format!("value does not match declared type `{}`", type_name(&resolved)))),
    }
}

fn type_name(ty: &Type) -> String {
    match ty {
        Type::Bool => "bool".to_string(),
        Type::Byte => "byte".to_string(),
        Type::Int => "int".to_string(),
        Type::Long => "long".to_string(),
        Type::Float => "float".to_string(),
        Type::String => "string".to_string(),
        Type::Tuple(_) => "tuple".to_string(),
        Type::List(_) => "list".to_string(),
        Type::Array(_) => "array".to_string(),
        Type::Assoc(_, _) => "assoc".to_string(),
        Type::Union(def) => def.name.clone(),
        Type::Message(def) => def.name.clone(),
        Type::Unbound(slot) => format!("'{}", slot.name),
        Type::Named(slot) => slot.borrow().name.clone(),
    }
}

/// Produces the default value for `ty`, or [`Error::NoDefault`] if none is
/// defined (spec §4 default rule: primitives have a zero-like default,
/// composites default to empty/zero-filled, Union/Message/Unbound have
/// none).
pub fn default(ty: &Type) -> Result<Value> {
    match ty.resolved()? {
        Type::Bool => Ok(Value::Bool(false)),
        Type::Byte => Ok(Value::Byte(0)),
        Type::Int => Ok(Value::Int(0)),
        Type::Long => Ok(Value::Long(0)),
        Type::Float => Ok(Value::Float(0.0)),
        Type::String => Ok(Value::String(Vec::new())),
        Type::Tuple(tt) => {
            let elements = tt.elements.iter().map(default).collect::<Result<Vec<_>>>()?;
            Ok(Value::Tuple(elements))
        }
        Type::List(inner) => Ok(Value::List(TypedList::empty(&inner))),
        Type::Array(inner) => Ok(Value::Array(TypedList::empty(&inner))),
        Type::Assoc(k, v) => Ok(Value::Assoc(TypedMap::empty(&k, &v))),
        resolved @ (Type::Union(_) | Type::Message(_) | Type::Unbound(_)) => Err(Error::no_default(type_name(&resolved))),
        Type::Named(_) => unreachable!("resolved() never returns Named"),
    }
}

/// Encodes `value` (already checked against `ty`) as a complete prefixed
/// wire value under tag `tag`.
pub fn encode_tagged(buf: &mut impl BufMut, tag: u64, value: &Value, ty: &Type) -> Result<()> {
    let resolved = ty.resolved()?;
    match (&resolved, value) {
        (Type::Bool, Value::Bool(b)) => {
            wire::write_prefix(buf, tag, WireType::Bits8);
            buf.put_u8(u8::from(*b));
        }
        (Type::Byte, Value::Byte(b)) => {
            wire::write_prefix(buf, tag, WireType::Bits8);
            buf.put_u8(*b);
        }
        (Type::Int, Value::Int(n)) => {
            wire::write_prefix(buf, tag, WireType::Vint);
            io::encode_varuint(io::zigzag_encode(*n), buf);
        }
        (Type::Long, Value::Long(n)) => {
            wire::write_prefix(buf, tag, WireType::Bits64Long);
            io::write_u64le(buf, *n);
        }
        (Type::Float, Value::Float(f)) => {
            wire::write_prefix(buf, tag, WireType::Bits64Float);
            io::write_u64le(buf, f.to_bits());
        }
        (Type::String, Value::String(s)) => {
            wire::write_prefix(buf, tag, WireType::Bytes);
            io::encode_varuint(s.len() as u64, buf);
            buf.put_slice(s);
        }
        (Type::Tuple(tt), Value::Tuple(elements)) => {
            wire::write_prefix(buf, tag, WireType::Tuple);
            let mut body = Vec::new();
            // Every element of a Tuple/Message body carries tag 0 — position
            // is implicit in declaration order, not in the tag (the tag
            // sequence is reserved for union variant selection). Grounded on
            // `original_source/extprot/serialize.py: SingleTypeDesc.tag = 0`.
            for (element, element_ty) in elements.iter().zip(tt.elements.iter()) {
                encode_tagged(&mut body, 0, element, element_ty)?;
            }
            wire::write_composite_body(buf, elements.len(), &body);
        }
        (Type::List(inner), Value::List(list)) | (Type::Array(inner), Value::Array(list)) => {
            wire::write_prefix(buf, tag, WireType::HTuple);
            let mut body = Vec::new();
            for element in list.iter() {
                encode_tagged(&mut body, 0, element, inner)?;
            }
            wire::write_composite_body(buf, list.len(), &body);
        }
        (Type::Assoc(key_ty, val_ty), Value::Assoc(map)) => {
            wire::write_prefix(buf, tag, WireType::Assoc);
            let mut body = Vec::new();
            for (k, v) in map.iter() {
                encode_tagged(&mut body, 0, k, key_ty)?;
                encode_tagged(&mut body, 0, v, val_ty)?;
            }
            wire::write_composite_body(buf, map.len(), &body);
        }
        (Type::Union(_), Value::Option(option)) => {
            let variant = option.variant();
            if variant.is_constant() {
                wire::write_prefix(buf, variant.tag, WireType::Enum);
            } else {
                wire::write_prefix(buf, variant.tag, WireType::Tuple);
                let fields = variant.fields.as_ref().expect("non-constant variant has fields");
                let payload = option.payload.as_ref().expect("non-constant variant has payload");
                let mut body = Vec::new();
                for (value, field) in payload.iter().zip(fields.iter()) {
                    encode_tagged(&mut body, 0, value, &field.ty)?;
                }
                wire::write_composite_body(buf, payload.len(), &body);
            }
        }
        (Type::Message(_), Value::Message(record)) => {
            wire::write_prefix(buf, tag, WireType::Tuple);
            let mut body = Vec::new();
            let mut count = 0usize;
            for (field, slot) in record.def.fields.iter().zip(record.values.iter()) {
                let value = slot.as_ref().ok_or_else(|| Error::no_default(field.name.clone()))?;
                encode_tagged(&mut body, 0, value, &field.ty)?;
                count += 1;
            }
            wire::write_composite_body(buf, count, &body);
        }
        _ => return Err(Error::type_mismatch("value/type mismatch during encode")),
    }
    Ok(())
}

/// Decodes a value of declared type `ty` from a stream positioned exactly
/// at its prefix. `EndOfStream` is only returned to the top-level caller;
/// once any byte of a value has been consumed, failures become
/// `TruncatedInput`/`UnexpectedWireType`/`Unpromotable`.
pub fn decode(buf: &mut impl Buf, ty: &Type, ctx: &mut DecodeContext) -> Result<Value> {
    let prefix = wire::read_prefix(buf)?;
    decode_with_prefix(buf, ty, prefix.tag, prefix.wire_type, ctx)
}

fn decode_with_prefix(buf: &mut impl Buf, ty: &Type, tag: u64, wt: WireType, ctx: &mut DecodeContext) -> Result<Value> {
    let resolved = ty.resolved()?;
    match (&resolved, wt) {
        (Type::Bool, WireType::Bits8) => Ok(Value::Bool(io::read_byte(buf, "Bool")? != 0)),
        (Type::Byte, WireType::Bits8) => Ok(Value::Byte(io::read_byte(buf, "Byte")?)),
        (Type::Int, WireType::Vint) => Ok(Value::Int(io::zigzag_decode(io::decode_varuint(buf)?))),
        (Type::Long, WireType::Bits64Long) => Ok(Value::Long(io::read_u64le(buf, "Long")?)),
        (Type::Float, WireType::Bits64Float) => Ok(Value::Float(f64::from_bits(io::read_u64le(buf, "Float")?))),
        (Type::String, WireType::Bytes) => {
            let len = io::decode_varuint(buf)? as usize;
            Ok(Value::String(io::read_exact(buf, len, "String")?))
        }
        (Type::Tuple(tt), WireType::Tuple) => {
            ctx.enter_recursion()?;
            let result = decode_tuple_body(buf, &tt.elements, ctx);
            ctx.exit_recursion();
            result.map(Value::Tuple)
        }
        (Type::List(inner), WireType::HTuple) => {
            ctx.enter_recursion()?;
            let result = decode_htuple_body(buf, inner, ctx);
            ctx.exit_recursion();
            Ok(Value::List(TypedList::from_values(inner.clone(), result?.into_iter())?))
        }
        (Type::Array(inner), WireType::HTuple) => {
            ctx.enter_recursion()?;
            let result = decode_htuple_body(buf, inner, ctx);
            ctx.exit_recursion();
            Ok(Value::Array(TypedList::from_values(inner.clone(), result?.into_iter())?))
        }
        (Type::Assoc(key_ty, val_ty), WireType::Assoc) => {
            ctx.enter_recursion()?;
            let result = decode_assoc_body(buf, key_ty, val_ty, ctx);
            ctx.exit_recursion();
            let pairs = result?;
            Ok(Value::Assoc(TypedMap::from_pairs(key_ty.clone(), val_ty.clone(), pairs.into_iter())?))
        }
        (Type::Union(def), WireType::Enum | WireType::Tuple) => {
            ctx.enter_recursion()?;
            let result = decode_union_tagged(buf, def, tag, wt, ctx);
            ctx.exit_recursion();
            // `decode_union_tagged` fails before consuming any payload bytes
            // when no variant's (tag, constant-ness) matches, so it's safe
            // to retry as a promotion against the first non-constant variant
            // (spec §4.2.5: "prefix does not match any known (wire_type,
            // tag)").
            result.or_else(|_| promote_into_union(buf, def, wt, ctx))
        }
        (Type::Message(def), WireType::Tuple) => {
            ctx.enter_recursion()?;
            let result = decode_message(buf, def, ctx);
            ctx.exit_recursion();
            result
        }
        // Primitive-to-composite promotion (spec §4.2.5): a primitive wire
        // value found where a composite type was declared is parsed against
        // the first subtype, with the remaining positions filled from their
        // defaults, for any arity N >= 1.
        (Type::Tuple(tt), _) if is_primitive_wire(wt) && !tt.elements.is_empty() => {
            let first = decode_with_prefix(buf, &tt.elements[0], 0, wt, ctx).map_err(|_| Error::unpromotable("tuple"))?;
            let mut elements = vec![first];
            for element_ty in &tt.elements[1..] {
                elements.push(default(element_ty)?);
            }
            Ok(Value::Tuple(elements))
        }
        (Type::Message(def), _) if is_primitive_wire(wt) && !def.fields.is_empty() => {
            let mut record = MessageRecord::new(def.clone());
            let value = decode_with_prefix(buf, &def.fields[0].ty, 0, wt, ctx).map_err(|_| Error::unpromotable(def.name.clone()))?;
            record.set(&def.fields[0].name, value)?;
            record.fill_defaults()?;
            Ok(Value::Message(Box::new(record)))
        }
        // A primitive value arriving where a Union was declared: the schema
        // evolved a plain field into a union. Promote into the first
        // non-constant variant, same rule as Tuple/Message above (spec
        // §4.2.5 "the declared type is Union").
        (Type::Union(def), _) if is_primitive_wire(wt) => promote_into_union(buf, def, wt, ctx),
        _ => Err(Error::unexpected_wire_type(format!("type `{}` cannot decode wire type {:?}", type_name(&resolved), wt))),
    }
}

const fn is_primitive_wire(wt: WireType) -> bool {
    !matches!(wt, WireType::Tuple | WireType::HTuple | WireType::Assoc)
}

/// Promotes an unrecognized wire value into the union's first non-constant
/// variant, filling the remaining payload slots with their defaults (spec
/// §4.2.5).
fn promote_into_union(buf: &mut impl Buf, def: &Rc<UnionDef>, wt: WireType, ctx: &mut DecodeContext) -> Result<Value> {
    let variant_index = def.variants.iter().position(|v| !v.is_constant()).ok_or_else(|| Error::unpromotable(def.name.clone()))?;
    let fields = def.variants[variant_index].fields.as_ref().expect("non-constant variant has fields");
    let first = decode_with_prefix(buf, &fields[0].ty, 0, wt, ctx).map_err(|_| Error::unpromotable(def.name.clone()))?;
    let mut payload = vec![first];
    for field in &fields[1..] {
        payload.push(default(&field.ty)?);
    }
    Ok(Value::Option(OptionValue { def: def.clone(), variant_index, payload: Some(payload) }))
}

fn decode_tuple_body(buf: &mut impl Buf, element_types: &[Type], ctx: &mut DecodeContext) -> Result<Vec<Value>> {
    let (count, body) = wire::read_composite_body(buf, "tuple")?;
    let mut body_slice = &body[..];
    let mut elements = Vec::with_capacity(count.min(element_types.len()));
    for i in 0..count {
        let prefix = wire::read_prefix(&mut body_slice)?;
        if let Some(element_ty) = element_types.get(i) {
            elements.push(decode_with_prefix(&mut body_slice, element_ty, prefix.tag, prefix.wire_type, ctx)?);
        } else {
            // Extra trailing field from a newer schema: skip (spec forward
            // compatibility skip rule).
            wire::skip_value(&mut body_slice, prefix.wire_type, ctx)?;
        }
    }
    if elements.len() < element_types.len() {
        for element_ty in &element_types[elements.len()..] {
            elements.push(default(element_ty)?);
        }
    }
    Ok(elements)
}

fn decode_htuple_body(buf: &mut impl Buf, element_ty: &Type, ctx: &mut DecodeContext) -> Result<Vec<Value>> {
    let (count, body) = wire::read_composite_body(buf, "list/array")?;
    let mut body_slice = &body[..];
    let mut elements = Vec::with_capacity(count);
    for _ in 0..count {
        let prefix = wire::read_prefix(&mut body_slice)?;
        elements.push(decode_with_prefix(&mut body_slice, element_ty, prefix.tag, prefix.wire_type, ctx)?);
    }
    Ok(elements)
}

fn decode_assoc_body(buf: &mut impl Buf, key_ty: &Type, val_ty: &Type, ctx: &mut DecodeContext) -> Result<Vec<(Value, Value)>> {
    let (count, body) = wire::read_composite_body(buf, "assoc")?;
    let mut body_slice = &body[..];
    let mut pairs = Vec::with_capacity(count);
    for _ in 0..count {
        let key_prefix = wire::read_prefix(&mut body_slice)?;
        let key = decode_with_prefix(&mut body_slice, key_ty, key_prefix.tag, key_prefix.wire_type, ctx)?;
        let val_prefix = wire::read_prefix(&mut body_slice)?;
        let val = decode_with_prefix(&mut body_slice, val_ty, val_prefix.tag, val_prefix.wire_type, ctx)?;
        pairs.push((key, val));
    }
    Ok(pairs)
}

/// Decodes a union value given the already-parsed `(tag, wire_type)`
/// prefix identifying which variant was selected.
pub fn decode_union_tagged(buf: &mut impl Buf, def: &Rc<UnionDef>, tag: u64, wt: WireType, ctx: &mut DecodeContext) -> Result<Value> {
    let wants_constant = matches!(wt, WireType::Enum);
    let variant_index = def
        .variants
        .iter()
        .position(|v| v.tag == tag && v.is_constant() == wants_constant)
        .ok_or_else(|| Error::unexpected_wire_type(format!("no variant of `{}` matches tag {tag}", def.name)))?;
    let variant = &def.variants[variant_index];
    if variant.is_constant() {
        Ok(Value::Option(OptionValue { def: def.clone(), variant_index, payload: None }))
    } else {
        let fields = variant.fields.as_ref().expect("non-constant variant has fields");
        let payload = decode_tuple_body(buf, &fields.iter().map(|f| f.ty.clone()).collect::<Vec<_>>(), ctx)?;
        Ok(Value::Option(OptionValue { def: def.clone(), variant_index, payload: Some(payload) }))
    }
}

fn decode_message(buf: &mut impl Buf, def: &Rc<crate::types::MessageDef>, ctx: &mut DecodeContext) -> Result<Value> {
    let field_types: Vec<Type> = def.fields.iter().map(|f| f.ty.clone()).collect();
    let values = decode_tuple_body(buf, &field_types, ctx)?;
    let mut record = MessageRecord::new(def.clone());
    for (field, value) in def.fields.iter().zip(values) {
        record.set(&field.name, value)?;
    }
    Ok(Value::Message(Box::new(record)))
}
