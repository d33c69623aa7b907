use std::ops::Range;
use crate::{
    parser::{
        error::{kind, Error},
        token::{Float, Int, Name},
        Parse,
        Parser,
    },
    tokenizer::TokenKind,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A number literal, such as `25` or `1.8`.
///
/// The lexeme is kept as written so that it can be converted into an exact value later.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LitNum {
    /// The value of the number literal, exactly as it appears in the source.
    pub value: String,

    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

impl Parse for LitNum {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        if let Ok(int) = input.try_parse::<Int>() {
            return Ok(Self { value: int.lexeme, span: int.span });
        }

        input.try_parse::<Float>()
            .map(|float| Self { value: float.lexeme, span: float.span })
    }
}

/// A symbol literal, such as `P` or `Q`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LitSym {
    /// The name of the symbol.
    pub name: String,

    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

impl Parse for LitSym {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        input.try_parse::<Name>()
            .map(|name| Self { name: name.lexeme, span: name.span })
    }
}

/// Represents a literal value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Literal {
    /// A number literal.
    Number(LitNum),

    /// A symbol literal.
    Symbol(LitSym),
}

impl Literal {
    /// Returns the span of the literal.
    pub fn span(&self) -> Range<usize> {
        match self {
            Literal::Number(num) => num.span.clone(),
            Literal::Symbol(sym) => sym.span.clone(),
        }
    }
}

impl Parse for Literal {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        if let Ok(num) = input.try_parse::<LitNum>() {
            return Ok(Self::Number(num));
        }
        if let Ok(sym) = input.try_parse::<LitSym>() {
            return Ok(Self::Symbol(sym));
        }

        let token = input.next_token()?;
        Err(Error::new(vec![token.span], kind::UnexpectedToken {
            expected: &[TokenKind::Int, TokenKind::Float, TokenKind::Name, TokenKind::OpenParen],
            found: token.kind,
        }))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn number_keeps_lexeme() {
        let mut parser = Parser::new("  .5");
        let num = parser.try_parse_full::<LitNum>().unwrap();
        assert_eq!(num, LitNum { value: ".5".to_string(), span: 2..4 });
    }

    #[test]
    fn symbol() {
        let mut parser = Parser::new("Qd");
        let lit = parser.try_parse_full::<Literal>().unwrap();
        assert_eq!(lit, Literal::Symbol(LitSym { name: "Qd".to_string(), span: 0..2 }));
    }

    #[test]
    fn unexpected_operator() {
        let mut parser = Parser::new("*");
        let err = parser.try_parse::<Literal>().unwrap_err();
        assert_eq!(err.spans, vec![0..1]);
    }
}
