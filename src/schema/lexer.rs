//! Tokenizer for the schema grammar (spec §6.1). Whitespace-insensitive,
//! with nested `(* ... *)` comments — grounded on the forward-declared
//! `comment << (...)` pyparsing rule in
//! `original_source/extprot/compiler.py`, which nests rather than stopping
//! at the first `*)`.

use alloc::string::String;
use alloc::string::ToString;
use alloc::vec::Vec;

use crate::error::Error;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Ident(String),
    /// A `'`-prefixed type parameter, e.g. `'a`.
    PIdent(String),
    Type,
    Message,
    Mutable,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Lt,
    Gt,
    Comma,
    Star,
    Pipe,
    Equals,
    Semicolon,
    Colon,
}

struct Lexer<'a> {
    chars: core::iter::Peekable<core::str::CharIndices<'a>>,
    source: &'a str,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self { chars: source.char_indices().peekable(), source }
    }

    fn skip_whitespace_and_comments(&mut self) -> Result<()> {
        loop {
            match self.chars.peek().copied() {
                Some((_, c)) if c.is_whitespace() => {
                    self.chars.next();
                }
                Some((i, '(')) if self.source[i..].starts_with("(*") => {
                    self.consume_nested_comment()?;
                }
                _ => return Ok(()),
            }
        }
    }

    fn consume_nested_comment(&mut self) -> Result<()> {
        // Consume the opening "(*".
        self.chars.next();
        self.chars.next();
        let mut depth = 1usize;
        loop {
            match self.chars.peek().copied() {
                None => return Err(Error::parse("unterminated comment")),
                Some((i, '(')) if self.source[i..].starts_with("(*") => {
                    self.chars.next();
                    self.chars.next();
                    depth += 1;
                }
                Some((i, '*')) if self.source[i..].starts_with("*)") => {
                    self.chars.next();
                    self.chars.next();
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                Some(_) => {
                    self.chars.next();
                }
            }
        }
    }

    fn next_token(&mut self) -> Result<Option<Token>> {
        self.skip_whitespace_and_comments()?;
        let Some((start, c)) = self.chars.peek().copied() else {
            return Ok(None);
        };
        let token = match c {
            '(' => {
                self.chars.next();
                Token::LParen
            }
            ')' => {
                self.chars.next();
                Token::RParen
            }
            '[' => {
                self.chars.next();
                Token::LBracket
            }
            ']' => {
                self.chars.next();
                Token::RBracket
            }
            '{' => {
                self.chars.next();
                Token::LBrace
            }
            '}' => {
                self.chars.next();
                Token::RBrace
            }
            '<' => {
                self.chars.next();
                Token::Lt
            }
            '>' => {
                self.chars.next();
                Token::Gt
            }
            ',' => {
                self.chars.next();
                Token::Comma
            }
            '*' => {
                self.chars.next();
                Token::Star
            }
            '|' => {
                self.chars.next();
                Token::Pipe
            }
            '=' => {
                self.chars.next();
                Token::Equals
            }
            ';' => {
                self.chars.next();
                Token::Semicolon
            }
            ':' => {
                self.chars.next();
                Token::Colon
            }
            '\'' => {
                self.chars.next();
                let ident = self.consume_ident()?;
                Token::PIdent(ident)
            }
            c if c.is_alphabetic() || c == '_' => {
                let ident = self.consume_ident()?;
                match ident.as_str() {
                    "type" => Token::Type,
                    "message" => Token::Message,
                    "mutable" => Token::Mutable,
                    _ => Token::Ident(ident),
                }
            }
            other => return Err(Error::parse(alloc::format!("unexpected character `{other}` at byte {start}"))),
        };
        Ok(Some(token))
    }

    fn consume_ident(&mut self) -> Result<String> {
        let mut ident = String::new();
        while let Some((_, c)) = self.chars.peek().copied() {
            if c.is_alphanumeric() || c == '_' {
                ident.push(c);
                self.chars.next();
            } else {
                break;
            }
        }
        if ident.is_empty() {
            return Err(Error::parse("expected identifier"));
        }
        Ok(ident)
    }
}

/// Tokenizes a full schema source string.
pub fn tokenize(source: &str) -> Result<Vec<Token>> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next_token()? {
        tokens.push(token);
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_simple_type_decl() {
        let tokens = tokenize("type point = { x: int; y: int }").unwrap();
        assert!(tokens.contains(&Token::Type));
        assert!(tokens.contains(&Token::Ident("point".to_string())));
        assert!(tokens.contains(&Token::Ident("x".to_string())));
    }

    #[test]
    fn skips_nested_comments() {
        let tokens = tokenize("(* outer (* inner *) still outer *) type t = int").unwrap();
        assert_eq!(tokens[0], Token::Type);
    }

    #[test]
    fn lexes_type_parameters() {
        let tokens = tokenize("type 'a option = None | Some of 'a").unwrap();
        assert!(tokens.contains(&Token::PIdent("a".to_string())));
    }

    #[test]
    fn unterminated_comment_errors() {
        assert!(tokenize("(* never closed").is_err());
    }
}
