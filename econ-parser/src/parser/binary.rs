use std::ops::Range;
use super::{
    expr::{Expr, Primary},
    error::Error,
    token::op::{BinOp, BinOpKind},
    unary::Unary,
    Associativity,
    Parser,
    Precedence,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A binary operator, or implicit multiplication.
#[derive(Debug, Clone, PartialEq)]
enum BinOpExt {
    /// A binary operator, such as `+` or `*`.
    Op(BinOp),

    /// Implicit multiplication, such as `25P` or `P(P + 1)`.
    ///
    /// This is not a real operator, but it is treated as one for the purposes of parsing.
    ImplicitMultiplication,
}

impl BinOpExt {
    /// Returns the precedence of the binary operator.
    fn precedence(&self) -> Precedence {
        match self {
            BinOpExt::Op(op) => op.precedence(),
            BinOpExt::ImplicitMultiplication => Precedence::Factor,
        }
    }
}

impl From<BinOp> for BinOpExt {
    fn from(op: BinOp) -> Self {
        BinOpExt::Op(op)
    }
}

/// Returns true if the next token begins an operand that is implicitly multiplied with whatever
/// came before it.
fn implicit_operand_follows(input: &Parser) -> bool {
    input.peek_kind().is_some_and(Primary::starts_with)
}

/// Builds the node for an implicit multiplication of `lhs` and `rhs`. The operator's span is the
/// (possibly empty) gap between the two operands.
fn implicit_mul(lhs: Expr, rhs: Expr) -> Expr {
    let (start_span, end_span) = (lhs.span().start, rhs.span().end);
    let op_span = lhs.span().end..rhs.span().start;
    Expr::Binary(Binary {
        lhs: Box::new(lhs),
        op: BinOp {
            kind: BinOpKind::Mul,
            implicit: true,
            span: op_span,
        },
        rhs: Box::new(rhs),
        span: start_span..end_span,
    })
}

/// A binary expression, such as `1 + 2`. Binary expressions can include nested expressions.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Binary {
    /// The left-hand side of the binary expression.
    pub lhs: Box<Expr>,

    /// The operator of the binary expression.
    pub op: BinOp,

    /// The right-hand side of the binary expression.
    pub rhs: Box<Expr>,

    /// The region of the source code that this binary expression was parsed from.
    pub span: Range<usize>,
}

impl Binary {
    /// Returns the span of the binary expression.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// After parsing the left-hand-side, the operator, and the right-hand-side of a potential
    /// binary expression, parse ahead to see if the right-hand-side is incomplete.
    fn complete_rhs(
        input: &mut Parser,
        lhs: Expr,
        op: BinOpExt,
        mut rhs: Expr,
    ) -> Result<Expr, Error> {
        let precedence = op.precedence();

        loop {
            // before creating the `lhs op rhs` node, check the precedence of the following
            // operator, if any; `3 + 4 * 5` must not become `(3 + 4) * 5`

            // clone the input stream to emulate peeking
            let mut input_ahead = input.clone();
            if let Ok(next_op) = input_ahead.try_parse::<BinOp>() {
                if next_op.precedence() > precedence || next_op.associativity() == Associativity::Right {
                    // higher precedence or right associative: `rhs` is the start of a deeper
                    // expression
                    rhs = Self::parse_expr(input, rhs, next_op.precedence())?;
                } else {
                    // lower precedence, or equal precedence and left-associativity, as in
                    // `1 * 2 + 3` or `1 * 2 * 3`; let the outer loop handle it
                    break;
                }
            } else {
                // there is no operator; an operand right here means implicit multiplication
                //
                // if the current operator binds at least as tightly as multiplication, the
                // operand belongs to the outer expression instead: `2^3P` is `(2^3)P`
                if precedence >= BinOpKind::Mul.precedence() || !implicit_operand_follows(input) {
                    break;
                }

                // the new operand may itself be raised to a power, as in `10 - 25P^2`
                let operand: Expr = input.try_parse::<Primary>()?.into();
                rhs = Self::complete_rhs(input, rhs, BinOpExt::ImplicitMultiplication, operand)?;
            }
        }

        // create the binary node representing `lhs op rhs`
        let (start_span, end_span) = (lhs.span().start, rhs.span().end);
        match op {
            BinOpExt::Op(op) => Ok(Expr::Binary(Binary {
                lhs: Box::new(lhs),
                op,
                rhs: Box::new(rhs),
                span: start_span..end_span,
            })),
            BinOpExt::ImplicitMultiplication => Ok(implicit_mul(lhs, rhs)),
        }
    }

    /// Parses the remainder of a binary expression whose left-hand side is `lhs`, consuming only
    /// operators with a precedence of at least `precedence`.
    pub fn parse_expr(
        input: &mut Parser,
        mut lhs: Expr,
        precedence: Precedence,
    ) -> Result<Expr, Error> {
        loop {
            let mut input_ahead = input.clone();
            match input_ahead.try_parse::<BinOp>() {
                Ok(op) if op.precedence() >= precedence => {
                    input.set_cursor(&input_ahead);
                    let rhs = Unary::parse_or_lower(input)?;
                    lhs = Self::complete_rhs(input, lhs, op.into(), rhs)?;
                },
                // an operator that binds too loosely ends this expression
                Ok(_) => break,
                Err(_) if BinOpKind::Mul.precedence() >= precedence && implicit_operand_follows(input) => {
                    let rhs: Expr = input.try_parse::<Primary>()?.into();
                    lhs = Self::complete_rhs(input, lhs, BinOpExt::ImplicitMultiplication, rhs)?;
                },
                Err(_) => break,
            }
        }

        Ok(lhs)
    }
}
