use econ_compute::{
    primitive::rational_from_f64,
    symbolic::{error::UnsupportedLhs, RationalFn},
};
use econ_parser::parser::{expr::Expr, literal::Literal, parse_equation};
use crate::{error::Error, inverse::InverseCurve, options::SolverOptions};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The name of the price variable.
pub const PRICE: &str = "P";

/// The names accepted on the left-hand side of a curve.
pub const QUANTITY_NAMES: &[&str] = &["Q", "Qd", "Qs", "q"];

/// Which side of the market a curve describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Side {
    Demand,
    Supply,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Side::Demand => write!(f, "demand"),
            Side::Supply => write!(f, "supply"),
        }
    }
}

/// A demand or supply curve: quantity as a function of the price `P`.
///
/// The curve is stored as an exact [`RationalFn`], so the linearity flag, the derivative and
/// shifted copies are all exact.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Curve {
    side: Side,
    func: RationalFn,
}

impl Curve {
    /// Parses a curve such as `Q = 3040 - 25P` with the default [`SolverOptions`].
    pub fn parse(side: Side, source: &str) -> Result<Self, Error> {
        Self::parse_with(side, source, &SolverOptions::default())
    }

    /// Parses a curve such as `Q = 3040 - 25P`. The degree of the curve is limited by
    /// [`SolverOptions::max_degree`].
    pub fn parse_with(side: Side, source: &str, options: &SolverOptions) -> Result<Self, Error> {
        let wrap = |error| Error::Parse {
            side,
            input: source.to_string(),
            error,
        };

        let equation = parse_equation(source).map_err(wrap)?;
        let lhs_is_quantity = matches!(
            &equation.lhs,
            Expr::Literal(Literal::Symbol(sym)) if QUANTITY_NAMES.contains(&sym.name.as_str())
        );
        if !lhs_is_quantity {
            return Err(wrap(econ_error::Error::new(
                vec![equation.lhs.span()],
                UnsupportedLhs { allowed: QUANTITY_NAMES },
            )));
        }

        let func = RationalFn::from_expr(&equation.rhs, PRICE, options.max_degree).map_err(wrap)?;
        Ok(Self { side, func })
    }

    /// Creates a curve from a rational function of the price.
    pub fn from_fn(side: Side, func: RationalFn) -> Self {
        Self { side, func }
    }

    /// Returns which side of the market this curve describes.
    pub fn side(&self) -> Side {
        self.side
    }

    /// Returns the quantity as a function of price.
    pub fn function(&self) -> &RationalFn {
        &self.func
    }

    /// Evaluates the quantity at the given price. Returns [`None`] at a pole.
    pub fn eval(&self, price: f64) -> Option<f64> {
        self.func.eval_f64(price)
    }

    /// Returns the derivative of quantity with respect to price.
    pub fn derivative(&self) -> Self {
        Self { side: self.side, func: self.func.derivative() }
    }

    /// Returns true if the second derivative with respect to price is identically zero.
    pub fn is_linear(&self) -> bool {
        self.func.is_linear()
    }

    /// Returns the curve evaluated at `P + offset`. A tax on producers, for example, shifts the
    /// supply curve by the negated rate: sellers receive `P - t` when buyers pay `P`.
    ///
    /// Returns [`None`] if `offset` is not finite.
    pub fn shifted(&self, offset: f64) -> Option<Self> {
        let offset = rational_from_f64(offset)?;
        Some(Self { side: self.side, func: self.func.shift(&offset) })
    }

    /// Returns the inverse of this curve, giving price as a function of quantity.
    pub fn inverse(&self, options: &SolverOptions) -> InverseCurve<'_> {
        InverseCurve::new(self, *options)
    }
}

impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Q = {}", self.func.display(PRICE))
    }
}
