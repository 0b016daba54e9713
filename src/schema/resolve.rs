//! Second compiler pass: turns parsed [`TypeDecl`]s into frozen
//! `types::Type` values, substituting [`crate::types::Type::Named`]
//! placeholders for forward references and filling them in once every
//! declaration has been registered (spec §4.5/§6.1).

use alloc::rc::Rc;
use alloc::string::String;
use alloc::string::ToString;
use alloc::vec::Vec;
use core::cell::RefCell;

use crate::error::Error;
use crate::error::Result;
use crate::schema::ast::TypeBody;
use crate::schema::ast::TypeDecl;
use crate::schema::ast::TypeExpr;
use crate::types::FieldDef;
use crate::types::MessageDef;
use crate::types::NamedSlot;
use crate::types::Type;
use crate::types::TupleType;
use crate::types::UnboundSlot;
use crate::types::UnionDef;

/// A compiled schema: every declared name mapped to its (possibly
/// polymorphic) type skeleton. Mode (a) of spec §4.5 — live type-model
/// objects, not generated source text (mode (b) is out of scope, see
/// `SPEC_FULL.md` §A6).
#[derive(Debug, Default)]
pub struct Namespace {
    entries: Vec<(String, Vec<String>, Type)>,
}

impl Namespace {
    #[must_use]
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Looks up a declared type's `(params, skeleton)` by name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<(&[String], &Type)> {
        self.entries.iter().find(|(n, _, _)| n == name).map(|(_, params, ty)| (params.as_slice(), ty))
    }

    /// Looks up a declared name and, if it takes type arguments, binds
    /// them; used to resolve `Named(name, args)` type expressions.
    pub fn resolve_application(&self, name: &str, args: &[Type]) -> Result<Type> {
        let (params, skeleton) = self.lookup(name).ok_or_else(|| Error::unresolved_name(name.to_string()))?;
        if args.is_empty() {
            Ok(skeleton.clone())
        } else {
            Ok(skeleton.bind(params, args))
        }
    }
}

/// Compiles a sequence of parsed declarations into a [`Namespace`],
/// resolving forward references across the whole set (spec §4.5: parse
/// fully, then resolve, since declarations may reference names declared
/// later in the same source).
pub fn resolve(decls: Vec<TypeDecl>) -> Result<Namespace> {
    let mut namespace = Namespace::new();
    let mut slots = Vec::with_capacity(decls.len());

    // First pass: give every declared name a placeholder slot so forward
    // and mutually-recursive references resolve regardless of declaration
    // order (spec §4.5 "Placeholder").
    for decl in &decls {
        let slot = Rc::new(RefCell::new(NamedSlot::unresolved(decl.name.clone())));
        namespace.entries.push((decl.name.clone(), decl.params.clone(), Type::Named(slot.clone())));
        slots.push(slot);
    }

    // Second pass: resolve each declaration's body against the
    // placeholder-populated namespace, then fill each slot in place so
    // every earlier reference to it (including from within its own body,
    // for a recursive type) observes the real type.
    for (decl, slot) in decls.iter().zip(slots.iter()) {
        let ty = resolve_type_body(decl, &namespace)?;
        slot.borrow_mut().resolved = Some(ty);
    }
    Ok(namespace)
}

fn resolve_type_body(decl: &TypeDecl, namespace: &Namespace) -> Result<Type> {
    match &decl.body {
        TypeBody::Alias(expr) => resolve_type_expr(expr, &decl.params, namespace),
        TypeBody::Message(fields) => {
            let resolved_fields = fields
                .iter()
                .map(|f| Ok(FieldDef::new(f.name.clone(), resolve_type_expr(&f.ty, &decl.params, namespace)?, f.mutable)))
                .collect::<Result<Vec<_>>>()?;
            Ok(Type::Message(Rc::new(MessageDef { name: decl.name.clone(), fields: resolved_fields })))
        }
        TypeBody::Union(variants) => {
            let declared = variants
                .iter()
                .map(|v| {
                    let fields = match &v.payload {
                        None => None,
                        Some(types) => Some(
                            types
                                .iter()
                                .enumerate()
                                .map(|(i, t)| Ok(FieldDef::new(alloc::format!("_{i}"), resolve_type_expr(t, &decl.params, namespace)?, false)))
                                .collect::<Result<Vec<_>>>()?,
                        ),
                    };
                    Ok((v.name.clone(), fields))
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(Type::Union(Rc::new(UnionDef::new(decl.name.clone(), declared)?)))
        }
    }
}

fn resolve_type_expr(expr: &TypeExpr, params: &[String], namespace: &Namespace) -> Result<Type> {
    Ok(match expr {
        TypeExpr::Bool => Type::Bool,
        TypeExpr::Byte => Type::Byte,
        TypeExpr::Int => Type::Int,
        TypeExpr::Long => Type::Long,
        TypeExpr::Float => Type::Float,
        TypeExpr::String => Type::String,
        TypeExpr::Param(name) => {
            if params.iter().any(|p| p == name) {
                Type::Unbound(UnboundSlot { name: name.clone() })
            } else {
                return Err(Error::unresolved_name(alloc::format!("'{name}")));
            }
        }
        TypeExpr::Tuple(elements) => {
            let resolved = elements.iter().map(|e| resolve_type_expr(e, params, namespace)).collect::<Result<Vec<_>>>()?;
            Type::Tuple(Rc::new(TupleType { elements: resolved }))
        }
        TypeExpr::List(inner) => Type::List(Rc::new(resolve_type_expr(inner, params, namespace)?)),
        TypeExpr::Array(inner) => Type::Array(Rc::new(resolve_type_expr(inner, params, namespace)?)),
        TypeExpr::Assoc(k, v) => Type::Assoc(Rc::new(resolve_type_expr(k, params, namespace)?), Rc::new(resolve_type_expr(v, params, namespace)?)),
        TypeExpr::Named(name, args) => {
            let resolved_args = args.iter().map(|a| resolve_type_expr(a, params, namespace)).collect::<Result<Vec<_>>>()?;
            namespace.resolve_application(name, &resolved_args)?
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::lexer::tokenize;
    use crate::schema::parser::parse;

    fn compile(src: &str) -> Namespace {
        resolve(parse(tokenize(src).unwrap()).unwrap()).unwrap()
    }

    #[test]
    fn resolves_self_referential_message() {
        let ns = compile("type node = { value: int; children: [node] }");
        let (_, ty) = ns.lookup("node").unwrap();
        match ty {
            Type::Message(def) => {
                assert_eq!(def.fields.len(), 2);
                assert!(matches!(def.fields[1].ty, Type::List(_)));
            }
            _ => panic!("expected message"),
        }
    }

    #[test]
    fn resolves_mutually_recursive_types() {
        let ns = compile(
            "type tree = Leaf int | Branch forest\n\
             type forest = [tree]",
        );
        assert!(ns.lookup("tree").is_some());
        assert!(ns.lookup("forest").is_some());
    }

    #[test]
    fn unresolved_name_errors() {
        let decls = parse(tokenize("type t = missing_type").unwrap()).unwrap();
        assert!(resolve(decls).is_err());
    }

    #[test]
    fn applies_generic_named_type() {
        let ns = compile(
            "type 'a option = None | Some 'a\n\
             type maybe_int = option<int>",
        );
        let (_, ty) = ns.lookup("maybe_int").unwrap();
        match ty {
            Type::Union(def) => {
                let some_variant = def.variant_by_name("Some").unwrap().1;
                let fields = some_variant.fields.as_ref().unwrap();
                assert!(matches!(fields[0].ty, Type::Int));
            }
            _ => panic!("expected union"),
        }
    }
}
