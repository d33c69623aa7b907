//! [`Display`] implementations for the syntax tree.
//!
//! The output follows the source closely: implicit multiplication is printed by juxtaposition,
//! exponentiation without surrounding spaces, and every other binary operator with one space on
//! each side. Parentheses are printed only where the user wrote them.

use std::fmt::{Display, Formatter, Result};
use super::{
    binary::Binary,
    equation::Equation,
    expr::Expr,
    literal::{Literal, LitNum, LitSym},
    paren::Paren,
    token::op::{BinOpKind, UnaryOpKind},
    unary::Unary,
};

impl Display for LitNum {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "{}", self.value)
    }
}

impl Display for LitSym {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "{}", self.name)
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            Literal::Number(num) => num.fmt(f),
            Literal::Symbol(sym) => sym.fmt(f),
        }
    }
}

impl Display for Paren {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "({})", self.expr)
    }
}

impl Display for Unary {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self.op.kind {
            UnaryOpKind::Neg => write!(f, "-{}", self.operand),
            UnaryOpKind::Pos => write!(f, "+{}", self.operand),
        }
    }
}

impl Display for Binary {
    fn fmt(&self, f: &mut Formatter) -> Result {
        if self.op.implicit {
            return write!(f, "{}{}", self.lhs, self.rhs);
        }

        match self.op.kind {
            BinOpKind::Exp => write!(f, "{}^{}", self.lhs, self.rhs),
            kind => write!(f, "{} {} {}", self.lhs, kind.symbol(), self.rhs),
        }
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            Expr::Literal(literal) => literal.fmt(f),
            Expr::Paren(paren) => paren.fmt(f),
            Expr::Unary(unary) => unary.fmt(f),
            Expr::Binary(binary) => binary.fmt(f),
        }
    }
}

impl Display for Equation {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "{} = {}", self.lhs, self.rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::parser::parse_equation;

    #[test]
    fn fmt_display() {
        let equation = parse_equation("Q=3040-25P").unwrap();
        assert_eq!(equation.to_string(), "Q = 3040 - 25P");
    }

    #[test]
    fn fmt_display_powers() {
        let equation = parse_equation("Qs = 1.8 + 9 * P ** 2").unwrap();
        assert_eq!(equation.to_string(), "Qs = 1.8 + 9 * P^2");
    }
}
