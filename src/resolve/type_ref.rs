//! Lexer and parser for raw EDM type reference strings.
//!
//! Grammar:
//!
//! ```text
//! type_ref := "Collection" "(" type_ref ")"
//!           | NAME                              // e.g. Edm.String, Sales.Item, self.Item
//! ```
//!
//! Nesting is capped at [`MAX_COLLECTION_DEPTH`] wrappers.

use logos::Logos;
use thiserror::Error;

/// Maximum number of nested `Collection(...)` wrappers accepted.
pub const MAX_COLLECTION_DEPTH: usize = 8;

/// Errors for malformed type references.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeRefError {
    #[error("empty type reference")]
    Empty,

    #[error("unexpected '{found}' at offset {offset}")]
    Unexpected { found: String, offset: usize },

    #[error("unclosed 'Collection(' wrapper")]
    Unclosed,

    #[error("collection nested deeper than {max} levels at offset {offset}")]
    TooDeep { max: usize, offset: usize },
}

/// A parsed type reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef<'a> {
    /// A possibly qualified name.
    Named(&'a str),
    /// `Collection(Inner)`.
    Collection(Box<TypeRef<'a>>),
}

impl<'a> TypeRef<'a> {
    /// Parse a raw reference such as `Collection(Sales.Item)`.
    pub fn parse(input: &'a str) -> Result<Self, TypeRefError> {
        let tokens = tokenize(input)?;
        if tokens.is_empty() {
            return Err(TypeRefError::Empty);
        }
        let mut parser = Parser {
            tokens,
            pos: 0,
            depth: 0,
        };
        let parsed = parser.type_ref()?;
        if let Some(extra) = parser.peek() {
            return Err(TypeRefError::Unexpected {
                found: extra.text.to_string(),
                offset: extra.offset,
            });
        }
        Ok(parsed)
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, Self::Collection(_))
    }

    /// The innermost element name, with every collection wrapper removed.
    pub fn element_name(&self) -> &'a str {
        match self {
            Self::Named(name) => name,
            Self::Collection(inner) => inner.element_name(),
        }
    }
}

// ============================================================================
// LEXER
// ============================================================================

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n]+")]
enum LogosToken {
    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[regex(r"[^ \t\r\n()]+")]
    Name,
}

#[derive(Debug, Clone, Copy)]
struct Token<'a> {
    kind: LogosToken,
    text: &'a str,
    offset: usize,
}

fn tokenize(input: &str) -> Result<Vec<Token<'_>>, TypeRefError> {
    let mut lexer = LogosToken::lexer(input);
    let mut tokens = Vec::new();
    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(kind) => tokens.push(Token {
                kind,
                text: lexer.slice(),
                offset: span.start,
            }),
            Err(()) => {
                return Err(TypeRefError::Unexpected {
                    found: lexer.slice().to_string(),
                    offset: span.start,
                });
            }
        }
    }
    Ok(tokens)
}

// ============================================================================
// PARSER
// ============================================================================

struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<Token<'a>> {
        self.tokens.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<Token<'a>> {
        let token = self.peek()?;
        self.pos += 1;
        Some(token)
    }

    fn type_ref(&mut self) -> Result<TypeRef<'a>, TypeRefError> {
        let token = self.bump().ok_or(TypeRefError::Unclosed)?;
        if token.kind != LogosToken::Name {
            return Err(TypeRefError::Unexpected {
                found: token.text.to_string(),
                offset: token.offset,
            });
        }

        match self.peek() {
            Some(next) if next.kind == LogosToken::LParen => {
                if token.text != "Collection" {
                    return Err(TypeRefError::Unexpected {
                        found: next.text.to_string(),
                        offset: next.offset,
                    });
                }
                if self.depth == MAX_COLLECTION_DEPTH {
                    return Err(TypeRefError::TooDeep {
                        max: MAX_COLLECTION_DEPTH,
                        offset: token.offset,
                    });
                }
                self.bump();
                self.depth += 1;
                let inner = self.type_ref()?;
                self.depth -= 1;
                match self.bump() {
                    Some(close) if close.kind == LogosToken::RParen => {
                        Ok(TypeRef::Collection(Box::new(inner)))
                    }
                    Some(other) => Err(TypeRefError::Unexpected {
                        found: other.text.to_string(),
                        offset: other.offset,
                    }),
                    None => Err(TypeRefError::Unclosed),
                }
            }
            _ => Ok(TypeRef::Named(token.text)),
        }
    }
}
