pub mod binary;
pub mod equation;
pub mod error;
pub mod expr;
pub mod fmt;
pub mod literal;
pub mod paren;
pub mod token;
pub mod unary;

use equation::Equation;
use econ_error::ErrorKind;
use error::{kind, Error};
use super::tokenizer::{tokenize_complete, Token, TokenKind};
use std::ops::Range;

/// Parses a complete equation, such as `Q = 3040 - 25P`. All of the input must be consumed.
pub fn parse_equation(source: &str) -> Result<Equation, Error> {
    Parser::new(source).try_parse_full::<Equation>()
}

/// A high-level parser for market equations. This is the type to use to parse an arbitrary
/// equation string into an abstract syntax tree.
#[derive(Debug, Clone)]
pub struct Parser<'source> {
    /// The tokens that this parser is currently parsing.
    tokens: Box<[Token<'source>]>,

    /// The index of the **next** token to be parsed.
    cursor: usize,
}

impl<'source> Parser<'source> {
    /// Create a new parser for the given source.
    pub fn new(source: &'source str) -> Self {
        Self {
            tokens: tokenize_complete(source),
            cursor: 0,
        }
    }

    /// Creates an error that points at the current token, or the end of the source code if the
    /// cursor is at the end of the stream.
    pub fn error(&self, kind: impl ErrorKind + 'static) -> Error {
        Error::new(vec![self.span()], kind)
    }

    /// Returns a span pointing at the end of the source code.
    pub fn eof_span(&self) -> Range<usize> {
        self.tokens.last().map_or(0..0, |token| token.span.end..token.span.end)
    }

    /// Returns the span of the current non-whitespace token, or the end of the source code if
    /// there are no more such tokens.
    pub fn span(&self) -> Range<usize> {
        self.tokens[self.cursor..]
            .iter()
            .find(|token| !token.is_whitespace())
            .map_or(self.eof_span(), |token| token.span.clone())
    }

    /// Set the cursor of this parser to the cursor of another parser. Both parsers must have been
    /// created from the same source.
    pub fn set_cursor(&mut self, other: &Parser) {
        self.cursor = other.cursor;
    }

    /// Returns the next token to be parsed, then advances the cursor. Whitespace tokens are
    /// skipped.
    ///
    /// Returns an EOF error if there are no more tokens.
    pub fn next_token(&mut self) -> Result<Token<'source>, Error> {
        while self.cursor < self.tokens.len() {
            let token = &self.tokens[self.cursor];
            self.cursor += 1;
            if token.is_whitespace() {
                continue;
            } else {
                // cloning is cheap: only Range<_> is cloned
                return Ok(token.clone());
            }
        }

        Err(self.error(kind::UnexpectedEof))
    }

    /// Returns the kind of the next non-whitespace token without advancing the cursor.
    pub fn peek_kind(&self) -> Option<TokenKind> {
        self.tokens[self.cursor..]
            .iter()
            .find(|token| !token.is_whitespace())
            .map(|token| token.kind)
    }

    /// Advances the cursor past any whitespace tokens.
    fn skip_whitespace(&mut self) {
        while self.tokens.get(self.cursor).is_some_and(Token::is_whitespace) {
            self.cursor += 1;
        }
    }

    /// Speculatively parses a value from the given stream of tokens. This function can be used
    /// in the [`Parse::parse`] implementation of a type with the given [`Parser`], as it will
    /// automatically backtrack the cursor position if parsing fails.
    ///
    /// If parsing is successful, the stream is advanced past the consumed tokens and the parsed
    /// value is returned. Otherwise, the stream is left unchanged and an error is returned.
    pub fn try_parse<T: Parse>(&mut self) -> Result<T, Error> {
        self.try_parse_with_fn(T::parse)
    }

    /// Speculatively parses a value from the given stream of tokens, using a custom parsing
    /// function to parse the value.
    ///
    /// If parsing is successful, the stream is advanced past the consumed tokens and the parsed
    /// value is returned. Otherwise, the stream is left unchanged and an error is returned.
    pub fn try_parse_with_fn<T, F>(&mut self, f: F) -> Result<T, Error>
    where
        F: FnOnce(&mut Parser<'source>) -> Result<T, Error>,
    {
        let start = self.cursor;
        match f(self) {
            Ok(value) => Ok(value),
            err => {
                self.cursor = start;
                err
            },
        }
    }

    /// Attempts to parse a value from the given stream of tokens. All the tokens must be consumed
    /// by the parser; if not, an error is returned.
    pub fn try_parse_full<T: Parse>(&mut self) -> Result<T, Error> {
        let value = T::parse(self)?;
        self.skip_whitespace();
        match self.peek_kind() {
            None => Ok(value),
            Some(TokenKind::CloseParen) => Err(self.error(kind::UnclosedParenthesis { opening: false })),
            Some(_) => Err(self.error(kind::ExpectedEof)),
        }
    }
}

/// Any type that can be parsed from a source of tokens.
pub trait Parse: Sized {
    /// Parses a value from the given stream of tokens, advancing the stream past the consumed
    /// tokens if parsing is successful.
    ///
    /// This function should be used by consumers of the library.
    fn parse(input: &mut Parser) -> Result<Self, Error>;
}

/// The associativity of a binary or unary operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    /// The binary / unary operation is left-associative.
    ///
    /// For binary operations, this means `a op b op c` is evaluated as `(a op b) op c`.
    Left,

    /// The binary / unary operation is right-associative.
    ///
    /// For binary operations, this means `a op b op c` is evaluated as `a op (b op c)`. For unary
    /// operations, this means `op op a` is evaluated as `op (op a)` (the operators appear to the
    /// left of the operand).
    Right,
}

/// The precedence of an operation, in order from lowest precedence (evaluated last) to highest
/// precedence (evaluated first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    /// Any precedence.
    Any,

    /// Precedence of addition (`+`) and subtraction (`-`), which separate terms.
    Term,

    /// Precedence of multiplication (`*`) and division (`/`), which separate factors.
    Factor,

    /// Precedence of unary negation (`-`) and unary plus (`+`).
    Neg,

    /// Precedence of exponentiation (`^`).
    Exp,
}
