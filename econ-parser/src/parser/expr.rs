use std::ops::Range;
use crate::{
    parser::{
        binary::Binary,
        error::{kind, Error},
        literal::Literal,
        paren::Paren,
        unary::Unary,
        Parse,
        Parser,
        Precedence,
    },
    tokenizer::TokenKind,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Represents a general expression on either side of a market equation.
///
/// An expression is built from numbers, symbols such as `P`, parentheses, and the arithmetic
/// operators. In `Q = 3040 - 25P`, both `Q` and `3040 - 25P` are expressions.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Expr {
    /// A literal value.
    Literal(Literal),

    /// A parenthesized expression, such as `(1 + 2)`.
    Paren(Paren),

    /// A unary operation, such as `-P`.
    Unary(Unary),

    /// A binary operation, such as `1 + 2`.
    Binary(Binary),
}

impl Expr {
    /// Returns the span of the expression.
    pub fn span(&self) -> Range<usize> {
        match self {
            Expr::Literal(literal) => literal.span(),
            Expr::Paren(paren) => paren.span(),
            Expr::Unary(unary) => unary.span(),
            Expr::Binary(binary) => binary.span(),
        }
    }
}

impl Parse for Expr {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        if input.peek_kind() == Some(TokenKind::CloseParen) {
            return Err(input.error(kind::UnclosedParenthesis { opening: false }));
        }

        let lhs = input.try_parse_with_fn(Unary::parse_or_lower)?;
        Binary::parse_expr(input, lhs, Precedence::Any)
    }
}

/// Represents a primary expression.
///
/// Primary expressions are the simplest expressions, and are the building blocks of more complex
/// expressions.
#[derive(Debug, Clone, PartialEq)]
pub enum Primary {
    /// A literal value.
    Literal(Literal),

    /// A parenthesized expression, such as `(1 + 2)`.
    Paren(Paren),
}

impl Primary {
    /// Returns the span of the primary expression.
    pub fn span(&self) -> Range<usize> {
        match self {
            Primary::Literal(literal) => literal.span(),
            Primary::Paren(paren) => paren.span(),
        }
    }

    /// Returns true if the given token kind can begin a primary expression.
    pub fn starts_with(kind: TokenKind) -> bool {
        matches!(
            kind,
            TokenKind::Int | TokenKind::Float | TokenKind::Name | TokenKind::OpenParen
        )
    }
}

impl Parse for Primary {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        if input.peek_kind() == Some(TokenKind::OpenParen) {
            input.try_parse::<Paren>().map(Self::Paren)
        } else {
            input.try_parse::<Literal>().map(Self::Literal)
        }
    }
}

impl From<Primary> for Expr {
    fn from(primary: Primary) -> Self {
        match primary {
            Primary::Literal(literal) => Self::Literal(literal),
            Primary::Paren(paren) => Self::Paren(paren),
        }
    }
}
