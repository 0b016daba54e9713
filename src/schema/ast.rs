//! Parsed representation of a schema source, prior to resolution against a
//! namespace. Mirrors the shape of `compiler.py`'s pyparsing grammar
//! (`type_expr`, `type_def`, `field_def`, `simple_message`/`union_message`)
//! without carrying over its parser combinator style.

use alloc::string::String;
use alloc::vec::Vec;

/// A type expression as written in source, before names are resolved.
#[derive(Debug, Clone)]
pub enum TypeExpr {
    Bool,
    Byte,
    Int,
    Long,
    Float,
    String,
    Tuple(Vec<TypeExpr>),
    List(alloc::boxed::Box<TypeExpr>),
    Array(alloc::boxed::Box<TypeExpr>),
    Assoc(alloc::boxed::Box<TypeExpr>, alloc::boxed::Box<TypeExpr>),
    /// Reference to this declaration's own type parameter, e.g. `'a`.
    Param(String),
    /// Reference to another named type, possibly applied to arguments:
    /// `'a list`, `(int, string) pair`.
    Named(String, Vec<TypeExpr>),
}

#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub name: String,
    pub ty: TypeExpr,
    pub mutable: bool,
}

#[derive(Debug, Clone)]
pub struct VariantDecl {
    pub name: String,
    /// `None` for a constant variant, `Some(fields)` for one carrying a
    /// payload (`Name of t1 * t2 * ...`).
    pub payload: Option<Vec<TypeExpr>>,
}

#[derive(Debug, Clone)]
pub enum TypeBody {
    Alias(TypeExpr),
    Message(Vec<FieldDecl>),
    Union(Vec<VariantDecl>),
}

#[derive(Debug, Clone)]
pub struct TypeDecl {
    pub name: String,
    pub params: Vec<String>,
    pub body: TypeBody,
}
