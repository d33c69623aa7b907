use std::ops::Range;
use super::{
    error::{kind, Error},
    expr::Expr,
    token::Assign,
    Parse,
    Parser,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An equation of the form `lhs = rhs`, such as `Q = 3040 - 25P`.
///
/// The parser accepts any expression on the left-hand side. Deciding which left-hand sides are
/// meaningful (`Q`, `Qd`, `Qs`) is left to the consumer.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Equation {
    /// The left-hand side of the equation.
    pub lhs: Expr,

    /// The right-hand side of the equation.
    pub rhs: Expr,

    /// The region of the source code that this equation was parsed from.
    pub span: Range<usize>,
}

impl Equation {
    /// Returns the span of the equation.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }
}

impl Parse for Equation {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let lhs = input.try_parse::<Expr>()?;
        input.try_parse::<Assign>()
            .map_err(|_| input.error(kind::MissingEquals))?;
        let rhs = input.try_parse::<Expr>()?;
        let span = lhs.span().start..rhs.span().end;
        Ok(Self { lhs, rhs, span })
    }
}
