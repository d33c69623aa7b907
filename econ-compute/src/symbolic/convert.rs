//! Conversion of a parsed expression into a [`RationalFn`].

use econ_error::Error;
use econ_parser::parser::{
    binary::Binary,
    expr::Expr,
    literal::Literal,
    token::op::{BinOpKind, UnaryOpKind},
    unary::Unary,
};
use crate::primitive::{rational_from_str, to_i64};
use super::{error::*, RationalFn};

/// Normalizes expressions in a single variable into [`RationalFn`]s.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer<'a> {
    /// The name of the only symbol allowed in the expression.
    pub variable: &'a str,

    /// The maximum degree of any intermediate numerator or denominator.
    pub max_degree: usize,
}

impl Normalizer<'_> {
    /// Normalizes the given expression.
    pub fn normalize(&self, expr: &Expr) -> Result<RationalFn, Error> {
        let result = match expr {
            Expr::Literal(Literal::Number(num)) => rational_from_str(&num.value)
                .map(RationalFn::constant)
                .ok_or_else(|| Error::new(vec![num.span.clone()], InvalidNumber {
                    literal: num.value.clone(),
                }))?,
            Expr::Literal(Literal::Symbol(sym)) => self.symbol(&sym.name)
                .ok_or_else(|| Error::new(vec![sym.span.clone()], UnknownVariable {
                    name: sym.name.clone(),
                    expected: self.variable.to_string(),
                }))?,
            Expr::Paren(paren) => self.normalize(&paren.expr)?,
            Expr::Unary(unary) => self.unary(unary)?,
            Expr::Binary(binary) => self.binary(binary)?,
        };

        self.check_degree(result, expr)
    }

    /// Converts a symbol. Repeating the variable, as in `PP`, multiplies it by itself.
    fn symbol(&self, name: &str) -> Option<RationalFn> {
        if self.variable.is_empty() || name.len() % self.variable.len() != 0 {
            return None;
        }

        let count = name.len() / self.variable.len();
        let all_variable = (0..count)
            .all(|i| &name[i * self.variable.len()..(i + 1) * self.variable.len()] == self.variable);
        if !all_variable {
            return None;
        }

        RationalFn::x().powi(count as i64)
    }

    fn unary(&self, unary: &Unary) -> Result<RationalFn, Error> {
        let operand = self.normalize(&unary.operand)?;
        Ok(match unary.op.kind {
            UnaryOpKind::Neg => -&operand,
            UnaryOpKind::Pos => operand,
        })
    }

    fn binary(&self, binary: &Binary) -> Result<RationalFn, Error> {
        let lhs = self.normalize(&binary.lhs)?;

        if binary.op.kind == BinOpKind::Exp {
            let exponent = self.exponent(&binary.rhs)?;
            return lhs.powi(exponent)
                .ok_or_else(|| Error::new(vec![binary.span()], DivisionByZero));
        }

        let rhs = self.normalize(&binary.rhs)?;
        match binary.op.kind {
            BinOpKind::Add => Ok(&lhs + &rhs),
            BinOpKind::Sub => Ok(&lhs - &rhs),
            BinOpKind::Mul => Ok(&lhs * &rhs),
            BinOpKind::Div => lhs.checked_div(&rhs)
                .ok_or_else(|| Error::new(vec![binary.rhs.span()], DivisionByZero)),
            BinOpKind::Exp => unreachable!("exponents are handled above"),
        }
    }

    /// Evaluates an exponent, which must be an integer constant no larger in magnitude than the
    /// maximum degree.
    fn exponent(&self, expr: &Expr) -> Result<i64, Error> {
        let value = self.normalize(expr)?;
        let n = value.as_constant()
            .and_then(|c| to_i64(&c))
            .ok_or_else(|| Error::new(vec![expr.span()], NonIntegerExponent))?;

        if n.unsigned_abs() > self.max_degree as u64 {
            return Err(Error::new(vec![expr.span()], ExponentTooLarge {
                degree: n.unsigned_abs(),
                max: self.max_degree,
            }));
        }
        Ok(n)
    }

    fn check_degree(&self, value: RationalFn, expr: &Expr) -> Result<RationalFn, Error> {
        let degree = value.degree();
        if degree > self.max_degree {
            Err(Error::new(vec![expr.span()], ExponentTooLarge {
                degree: degree as u64,
                max: self.max_degree,
            }))
        } else {
            Ok(value)
        }
    }
}

impl RationalFn {
    /// Normalizes the given expression into a rational function of `variable`. The degree of the
    /// numerator and the denominator may not exceed `max_degree`.
    ///
    /// ```
    /// use econ_compute::symbolic::RationalFn;
    /// use econ_parser::parser::parse_equation;
    ///
    /// let equation = parse_equation("Q = 59(P) - 3(P^2)").unwrap();
    /// let curve = RationalFn::from_expr(&equation.rhs, "P", 16).unwrap();
    /// assert!(!curve.is_linear());
    /// assert_eq!(curve.eval_f64(2.0), Some(106.0));
    /// ```
    pub fn from_expr(expr: &Expr, variable: &str, max_degree: usize) -> Result<Self, Error> {
        Normalizer { variable, max_degree }.normalize(expr)
    }
}

#[cfg(test)]
mod tests {
    use econ_parser::parser::parse_equation;
    use pretty_assertions::assert_eq;
    use crate::{primitive::rational, symbolic::Polynomial};
    use super::*;

    fn normalize(source: &str) -> Result<RationalFn, Error> {
        let equation = parse_equation(source).unwrap();
        RationalFn::from_expr(&equation.rhs, "P", 16)
    }

    fn coeffs(func: &RationalFn) -> Vec<rug::Rational> {
        func.as_polynomial().unwrap().coeffs().to_vec()
    }

    #[test]
    fn linear_demand() {
        let demand = normalize("Q = 3040 - 25P").unwrap();
        assert_eq!(coeffs(&demand), vec![rational(3040), rational(-25)]);
    }

    #[test]
    fn decimal_coefficients_are_exact() {
        let supply = normalize("Q = 1.8 + 9P").unwrap();
        assert_eq!(coeffs(&supply), vec![rational((9, 5)), rational(9)]);
    }

    #[test]
    fn parentheses_and_powers() {
        let curve = normalize("Q = 2(P + 1)^2 - P").unwrap();
        assert_eq!(coeffs(&curve), vec![rational(2), rational(3), rational(2)]);
    }

    #[test]
    fn repeated_variable() {
        let curve = normalize("Q = 100 - PP").unwrap();
        assert_eq!(coeffs(&curve), vec![rational(100), rational(0), rational(-1)]);
    }

    #[test]
    fn rational_curve() {
        let curve = normalize("Q = 100 / (P + 1)").unwrap();
        assert!(curve.as_polynomial().is_none());
        assert_eq!(curve.denominator(), &Polynomial::new(vec![rational(1), rational(1)]));
    }

    #[test]
    fn negative_exponent() {
        let curve = normalize("Q = 50P^-1").unwrap();
        assert_eq!(curve.eval(&rational(5)), Some(rational(10)));
    }

    #[test]
    fn unknown_variable() {
        let err = normalize("Q = 10 - 2X").unwrap_err();
        assert_eq!(err.spans, vec![10..11]);
    }

    #[test]
    fn fractional_exponent() {
        let err = normalize("Q = P^0.5").unwrap_err();
        assert_eq!(err.spans, vec![6..9]);
    }

    #[test]
    fn exponent_must_be_constant() {
        assert!(normalize("Q = 2^P").is_err());
    }

    #[test]
    fn degree_limit() {
        assert!(normalize("Q = P^17").is_err());
        assert!(normalize("Q = (P^9)(P^9)").is_err());
        assert!(normalize("Q = P^16").is_ok());
    }

    #[test]
    fn division_by_zero() {
        let err = normalize("Q = 10 / (P - P)").unwrap_err();
        assert_eq!(err.spans, vec![9..16]);
    }
}
