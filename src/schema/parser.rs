//! Recursive-descent parser producing a [`TypeDecl`] AST from a token
//! stream (spec §6.1). Surface syntax matches
//! `original_source/extprot/compiler.py`'s grammar directly: tuples with
//! `*`, prefix-delimited `list`/`array`/named-application forms, and union
//! variant payloads juxtaposed with no separating keyword:
//!
//! ```text
//! type point = { x: int; y: int }
//! type 'a option = None | Some 'a
//! type ('k, 'v) entry = { mutable key: 'k; value: 'v }
//! type row = (int * string * bool)
//! type tags = [string]
//! type matrix = [|[|int|]|]
//! type counts = (string, int) assoc
//! type maybe_int = option<int>
//! ```

use alloc::string::String;
use alloc::string::ToString;
use alloc::vec::Vec;

use crate::error::Error;
use crate::error::Result;
use crate::schema::ast::FieldDecl;
use crate::schema::ast::TypeBody;
use crate::schema::ast::TypeDecl;
use crate::schema::ast::TypeExpr;
use crate::schema::ast::VariantDecl;
use crate::schema::lexer::Token;

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn bump(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        tok
    }

    fn expect(&mut self, expected: &Token) -> Result<()> {
        match self.bump() {
            Some(ref tok) if tok == expected => Ok(()),
            other => Err(Error::parse(alloc::format!("expected {expected:?}, found {other:?}"))),
        }
    }

    fn expect_ident(&mut self) -> Result<String> {
        match self.bump() {
            Some(Token::Ident(name)) => Ok(name),
            other => Err(Error::parse(alloc::format!("expected identifier, found {other:?}"))),
        }
    }

    fn at(&self, token: &Token) -> bool {
        self.peek() == Some(token)
    }

    fn parse_schema(&mut self) -> Result<Vec<TypeDecl>> {
        let mut decls = Vec::new();
        while self.peek().is_some() {
            decls.push(self.parse_type_decl()?);
            if self.at(&Token::Semicolon) {
                self.bump();
            }
        }
        Ok(decls)
    }

    fn parse_type_decl(&mut self) -> Result<TypeDecl> {
        self.expect(&Token::Type)?;
        let params = self.parse_params()?;
        let name = self.expect_ident()?;
        self.expect(&Token::Equals)?;
        let body = self.parse_type_body()?;
        Ok(TypeDecl { name, params, body })
    }

    fn parse_params(&mut self) -> Result<Vec<String>> {
        match self.peek() {
            Some(Token::PIdent(_)) => {
                let Some(Token::PIdent(name)) = self.bump() else { unreachable!() };
                Ok(alloc::vec![name])
            }
            Some(Token::LParen) => {
                // Lookahead: only consume as a parameter list if it is a
                // parenthesized, comma-separated run of PIdents followed by
                // the type name itself (not `=`), distinguishing
                // `('k, 'v) entry = ...` from a parenthesized type_expr
                // body like `type row = (int * string)`.
                let save = self.pos;
                self.bump();
                let mut params = Vec::new();
                let mut ok = true;
                loop {
                    match self.peek() {
                        Some(Token::PIdent(_)) => {
                            let Some(Token::PIdent(name)) = self.bump() else { unreachable!() };
                            params.push(name);
                        }
                        _ => {
                            ok = false;
                            break;
                        }
                    }
                    if self.at(&Token::Comma) {
                        self.bump();
                    } else {
                        break;
                    }
                }
                if ok && self.at(&Token::RParen) {
                    self.bump();
                    if matches!(self.peek(), Some(Token::Ident(_))) {
                        return Ok(params);
                    }
                }
                self.pos = save;
                Ok(Vec::new())
            }
            _ => Ok(Vec::new()),
        }
    }

    fn parse_type_body(&mut self) -> Result<TypeBody> {
        if self.at(&Token::LBrace) {
            return self.parse_message_body().map(TypeBody::Message);
        }
        if self.looks_like_union() {
            return self.parse_union_body().map(TypeBody::Union);
        }
        self.parse_type_expr().map(TypeBody::Alias)
    }

    fn looks_like_union(&self) -> bool {
        // A union starts with a capitalized constructor name, optionally
        // preceded by a leading `|`.
        matches!(self.peek(), Some(Token::Pipe))
            || matches!(self.peek(), Some(Token::Ident(name)) if name.chars().next().is_some_and(char::is_uppercase))
    }

    fn parse_message_body(&mut self) -> Result<Vec<FieldDecl>> {
        self.expect(&Token::LBrace)?;
        let mut fields = Vec::new();
        while !self.at(&Token::RBrace) {
            let mutable = if matches!(self.peek(), Some(Token::Mutable)) {
                self.bump();
                true
            } else {
                false
            };
            let name = self.expect_ident()?;
            self.expect(&Token::Colon)?;
            let ty = self.parse_type_expr()?;
            fields.push(FieldDecl { name, ty, mutable });
            if self.at(&Token::Semicolon) || self.at(&Token::Comma) {
                self.bump();
            } else {
                break;
            }
        }
        self.expect(&Token::RBrace)?;
        Ok(fields)
    }

    fn parse_union_body(&mut self) -> Result<Vec<VariantDecl>> {
        if self.at(&Token::Pipe) {
            self.bump();
        }
        let mut variants = Vec::new();
        loop {
            let name = self.expect_ident()?;
            let mut types = Vec::new();
            while self.starts_type_expr() {
                types.push(self.parse_type_expr()?);
            }
            let payload = if types.is_empty() { None } else { Some(types) };
            variants.push(VariantDecl { name, payload });
            if self.at(&Token::Pipe) {
                self.bump();
            } else {
                break;
            }
        }
        Ok(variants)
    }

    /// True if the next token can begin a `type_expr`, used to decide
    /// whether a union variant's juxtaposed payload list continues.
    fn starts_type_expr(&self) -> bool {
        matches!(self.peek(), Some(Token::PIdent(_)) | Some(Token::Ident(_)) | Some(Token::LParen) | Some(Token::LBracket))
    }

    /// `type_expr := prim | named | tuple | list | array`, all prefix forms:
    /// `[t]` (list), `[|t|]` (array), `name<t>` (named, single argument),
    /// `(t * t ...)` (tuple) or `(t, t) assoc`/`(t, t) ctor`.
    fn parse_type_expr(&mut self) -> Result<TypeExpr> {
        match self.bump() {
            Some(Token::PIdent(name)) => Ok(TypeExpr::Param(name)),
            Some(Token::Ident(name)) => Ok(match name.as_str() {
                "bool" => TypeExpr::Bool,
                "byte" => TypeExpr::Byte,
                "int" => TypeExpr::Int,
                "long" => TypeExpr::Long,
                "float" => TypeExpr::Float,
                "string" => TypeExpr::String,
                _ => {
                    if self.at(&Token::Lt) {
                        self.bump();
                        let arg = self.parse_type_expr()?;
                        self.expect(&Token::Gt)?;
                        TypeExpr::Named(name, alloc::vec![arg])
                    } else {
                        TypeExpr::Named(name, Vec::new())
                    }
                }
            }),
            Some(Token::LBracket) => {
                if self.at(&Token::Pipe) {
                    self.bump();
                    let inner = self.parse_type_expr()?;
                    self.expect(&Token::Pipe)?;
                    self.expect(&Token::RBracket)?;
                    Ok(TypeExpr::Array(alloc::boxed::Box::new(inner)))
                } else {
                    let inner = self.parse_type_expr()?;
                    self.expect(&Token::RBracket)?;
                    Ok(TypeExpr::List(alloc::boxed::Box::new(inner)))
                }
            }
            Some(Token::LParen) => {
                let mut items = alloc::vec![self.parse_type_expr()?];
                let mut is_tuple = false;
                let mut is_args = false;
                loop {
                    if self.at(&Token::Star) {
                        self.bump();
                        is_tuple = true;
                        items.push(self.parse_type_expr()?);
                    } else if self.at(&Token::Comma) {
                        self.bump();
                        is_args = true;
                        items.push(self.parse_type_expr()?);
                    } else {
                        break;
                    }
                }
                self.expect(&Token::RParen)?;
                if is_tuple {
                    Ok(TypeExpr::Tuple(items))
                } else if is_args {
                    // `(k, v) assoc`.
                    match self.peek() {
                        Some(Token::Ident(name)) if name == "assoc" && items.len() == 2 => {
                            self.bump();
                            let mut it = items.into_iter();
                            let k = it.next().expect("checked len == 2");
                            let v = it.next().expect("checked len == 2");
                            Ok(TypeExpr::Assoc(alloc::boxed::Box::new(k), alloc::boxed::Box::new(v)))
                        }
                        other => Err(Error::parse(alloc::format!("expected `assoc` after a two-item argument list, found {other:?}"))),
                    }
                } else {
                    // Plain grouping: `(int)`.
                    Ok(items.into_iter().next().expect("pushed at least one item"))
                }
            }
            other => Err(Error::parse(alloc::format!("expected a type expression, found {other:?}"))),
        }
    }
}

/// Parses a full schema source into an ordered list of type declarations.
pub fn parse(tokens: Vec<Token>) -> Result<Vec<TypeDecl>> {
    let mut parser = Parser { tokens, pos: 0 };
    parser.parse_schema()
}
