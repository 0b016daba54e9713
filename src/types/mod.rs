//! Type model (spec C3): the closed set of type constructors extprot
//! schemas can express, tag assignment within unions/messages, and
//! polymorphic binding.
//!
//! Grounded on `original_source/extprot/types.py` for the class hierarchy
//! (`Bool`/`Byte`/`Int`/`Long`/`Float`/`String`/`Tuple`/`List`/`Array`/
//! `Union`/`Option`/`Message`/`Unbound`) and its metaclasses' creation-order
//! tag assignment; the teacher's `traits.rs` confirmed the "every type
//! exposes the same small operation set, so a single recursive walker can
//! dispatch through it" shape this enum follows.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;

use crate::error::Error;
use crate::error::Result;

/// A forward schema reference that has not yet been resolved to a concrete
/// type. Produced by the parser for names used before their declaration,
/// and filled in by the resolution pass (spec §4.5 "Placeholder").
///
/// `Rc<RefCell<_>>` gives the resolver a stable handle it can mutate in
/// place once the referent is known, while every `Type::Named` clone that
/// was handed out earlier observes the same resolution.
#[derive(Debug)]
pub struct NamedSlot {
    pub name: String,
    pub resolved: Option<Type>,
}

impl NamedSlot {
    #[must_use]
    pub const fn unresolved(name: String) -> Self {
        Self { name, resolved: None }
    }
}

/// One field of a [`TupleType`] or [`MessageDef`].
#[derive(Debug, Clone)]
pub struct FieldDef {
    pub name: String,
    pub ty: Type,
    pub mutable: bool,
}

impl FieldDef {
    #[must_use]
    pub const fn new(name: String, ty: Type, mutable: bool) -> Self {
        Self { name, ty, mutable }
    }
}

/// An anonymous positional tuple type (spec §3.2 Tuple).
#[derive(Debug, Clone)]
pub struct TupleType {
    pub elements: Vec<Type>,
}

/// One variant of a [`UnionDef`]: either a constant (payload-less) variant
/// or a non-constant variant carrying a positional payload.
#[derive(Debug, Clone)]
pub struct UnionVariant {
    pub name: String,
    /// `None` for a constant variant, `Some(fields)` for a non-constant one.
    pub fields: Option<Vec<FieldDef>>,
    /// Tag within the variant's own counter: constant variants are numbered
    /// 0..k-1 among themselves (ENUM wire type), non-constant variants are
    /// numbered 0..m-1 among themselves (TUPLE wire type) — spec §4 tagging.
    pub tag: u64,
}

impl UnionVariant {
    #[must_use]
    pub const fn is_constant(&self) -> bool {
        self.fields.is_none()
    }
}

/// A tagged disjoint union (spec §3.2 Union). Variants are never mixed
/// within an individual variant's numbering: constants get an ENUM-wire
/// tag sequence, non-constants get a TUPLE-wire tag sequence, independent
/// of each other and of declaration order overall.
#[derive(Debug, Clone)]
pub struct UnionDef {
    pub name: String,
    pub variants: Vec<UnionVariant>,
}

impl UnionDef {
    /// Builds a union from variants in declaration order, assigning each
    /// the two-counter tag scheme described above.
    pub fn new(name: String, declared: Vec<(String, Option<Vec<FieldDef>>)>) -> Result<Self> {
        let mut constant_tag = 0u64;
        let mut payload_tag = 0u64;
        let mut variants = Vec::with_capacity(declared.len());
        for (variant_name, fields) in declared {
            let tag = if fields.is_none() {
                let t = constant_tag;
                constant_tag += 1;
                t
            } else {
                let t = payload_tag;
                payload_tag += 1;
                t
            };
            variants.push(UnionVariant { name: variant_name, fields, tag });
        }
        if variants.is_empty() {
            return Err(Error::parse("union must declare at least one variant"));
        }
        Ok(Self { name, variants })
    }

    #[must_use]
    pub fn variant_by_name(&self, name: &str) -> Option<(usize, &UnionVariant)> {
        self.variants.iter().enumerate().find(|(_, v)| v.name == name)
    }
}

/// A record type with named, independently mutable/immutable fields (spec
/// §3.2 Message). Always uses its own standalone tag 0 when it appears as a
/// standalone top-level value.
#[derive(Debug, Clone)]
pub struct MessageDef {
    pub name: String,
    pub fields: Vec<FieldDef>,
}

/// A reference to one of this declaration's own polymorphic type
/// parameters (spec §4.3), e.g. the `'a` in `type 'a option = ...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnboundSlot {
    pub name: String,
}

/// The full closed set of type constructors (spec §3.2/§4.3).
#[derive(Debug, Clone)]
pub enum Type {
    Bool,
    Byte,
    Int,
    Long,
    Float,
    String,
    Tuple(Rc<TupleType>),
    List(Rc<Type>),
    Array(Rc<Type>),
    Assoc(Rc<Type>, Rc<Type>),
    Union(Rc<UnionDef>),
    Message(Rc<MessageDef>),
    Unbound(UnboundSlot),
    /// Forward reference awaiting resolution; see [`NamedSlot`].
    Named(Rc<RefCell<NamedSlot>>),
}

impl Type {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Type::Named(Rc::new(RefCell::new(NamedSlot::unresolved(name.into()))))
    }

    /// Follows a chain of [`Type::Named`] placeholders to the first
    /// non-placeholder type, cloning it out. Fails if any link in the chain
    /// is still unresolved.
    pub fn resolved(&self) -> Result<Type> {
        match self {
            Type::Named(slot) => {
                let slot_ref = slot.borrow();
                match &slot_ref.resolved {
                    Some(inner) => inner.resolved(),
                    None => Err(Error::unresolved_name(slot_ref.name.clone())),
                }
            }
            other => Ok(other.clone()),
        }
    }

    /// Substitutes this declaration's `Unbound` slots with concrete types,
    /// in parameter order. Supplying fewer arguments than there are slots
    /// (`args.len() < slot count`) yields a type that is itself still
    /// polymorphic in the remaining slots — partial application, per
    /// `original_source/extprot/types.py: bind`/`_bind_rec`.
    #[must_use]
    pub fn bind(&self, params: &[String], args: &[Type]) -> Type {
        // Only the first `args.len()` parameters are substituted; the rest
        // keep their `Unbound` identity so the result can be bound again.
        let substitution: Vec<(String, Type)> = params.iter().cloned().zip(args.iter().cloned()).collect();
        bind_rec(self, &substitution)
    }

    #[must_use]
    pub const fn is_unbound(&self) -> bool {
        matches!(self, Type::Unbound(_))
    }
}

fn bind_rec(ty: &Type, substitution: &[(String, Type)]) -> Type {
    match ty {
        Type::Unbound(slot) => substitution
            .iter()
            .find(|(name, _)| *name == slot.name)
            .map_or_else(|| ty.clone(), |(_, replacement)| replacement.clone()),
        Type::List(inner) => Type::List(Rc::new(bind_rec(inner, substitution))),
        Type::Array(inner) => Type::Array(Rc::new(bind_rec(inner, substitution))),
        Type::Assoc(k, v) => Type::Assoc(Rc::new(bind_rec(k, substitution)), Rc::new(bind_rec(v, substitution))),
        Type::Tuple(tuple) => {
            let elements = tuple.elements.iter().map(|e| bind_rec(e, substitution)).collect();
            Type::Tuple(Rc::new(TupleType { elements }))
        }
        Type::Named(slot) => {
            let slot_ref = slot.borrow();
            match &slot_ref.resolved {
                Some(inner) => bind_rec(inner, substitution),
                None => ty.clone(),
            }
        }
        Type::Union(def) => {
            let variants = def
                .variants
                .iter()
                .map(|v| UnionVariant {
                    name: v.name.clone(),
                    fields: v.fields.as_ref().map(|fields| bind_fields(fields, substitution)),
                    tag: v.tag,
                })
                .collect();
            Type::Union(Rc::new(UnionDef { name: def.name.clone(), variants }))
        }
        Type::Message(def) => {
            let fields = bind_fields(&def.fields, substitution);
            Type::Message(Rc::new(MessageDef { name: def.name.clone(), fields }))
        }
        Type::Bool | Type::Byte | Type::Int | Type::Long | Type::Float | Type::String => ty.clone(),
    }
}

fn bind_fields(fields: &[FieldDef], substitution: &[(String, Type)]) -> Vec<FieldDef> {
    fields.iter().map(|f| FieldDef::new(f.name.clone(), bind_rec(&f.ty, substitution), f.mutable)).collect()
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec;

    use super::*;

    #[test]
    fn partial_binding_leaves_remaining_slots_unbound() {
        // type ('a, 'b) pair = Tuple of 'a * 'b
        let pair = Type::Tuple(Rc::new(TupleType {
            elements: vec![Type::Unbound(UnboundSlot { name: "a".to_string() }), Type::Unbound(UnboundSlot { name: "b".to_string() })],
        }));
        let params = vec!["a".to_string(), "b".to_string()];
        let bound = pair.bind(&params, &[Type::Int]);
        match bound {
            Type::Tuple(t) => {
                assert!(matches!(t.elements[0], Type::Int));
                assert!(t.elements[1].is_unbound());
            }
            _ => panic!("expected tuple"),
        }
    }

    #[test]
    fn full_binding_substitutes_every_slot() {
        let list_of_a = Type::List(Rc::new(Type::Unbound(UnboundSlot { name: "a".to_string() })));
        let bound = list_of_a.bind(&["a".to_string()], &[Type::String]);
        match bound {
            Type::List(inner) => assert!(matches!(*inner, Type::String)),
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn union_tag_assignment_splits_constant_and_payload_counters() {
        let declared = vec![
            ("Nil".to_string(), None),
            ("Cons".to_string(), Some(vec![FieldDef::new("head".to_string(), Type::Int, false)])),
            ("Empty".to_string(), None),
        ];
        let union = UnionDef::new("list".to_string(), declared).unwrap();
        assert_eq!(union.variants[0].tag, 0); // Nil: first constant
        assert_eq!(union.variants[1].tag, 0); // Cons: first payload
        assert_eq!(union.variants[2].tag, 1); // Empty: second constant
    }

    #[test]
    fn named_slot_resolves_through_chain() {
        let leaf = Type::named("inner");
        if let Type::Named(slot) = &leaf {
            slot.borrow_mut().resolved = Some(Type::Int);
        }
        assert!(matches!(leaf.resolved().unwrap(), Type::Int));
    }

    #[test]
    fn unresolved_named_slot_errors() {
        let leaf = Type::named("missing");
        assert!(leaf.resolved().is_err());
    }
}
