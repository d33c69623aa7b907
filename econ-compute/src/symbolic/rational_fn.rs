use crate::{
    numerical::{quadrature, roots},
    primitive::{is_zero, rational},
};
use rug::Rational;
use std::{fmt, ops::{Add, Mul, Neg, Sub}};
use super::poly::{fmt_rational, Polynomial};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The number of subintervals used when integrating a rational function numerically.
pub const SIMPSON_INTERVALS: usize = 4096;

/// A quotient of two polynomials, `num(x) / den(x)`.
///
/// The representation is kept canonical: the numerator and denominator share no common factor
/// and the denominator is monic. A rational function whose denominator is the constant `1` is a
/// plain polynomial.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RationalFn {
    num: Polynomial,
    den: Polynomial,
}

impl RationalFn {
    /// Creates the rational function `num / den`. Returns [`None`] if the denominator is the zero
    /// polynomial.
    pub fn new(num: Polynomial, den: Polynomial) -> Option<Self> {
        if den.is_zero() {
            return None;
        }
        if num.is_zero() {
            return Some(Self::from(num));
        }

        let common = num.gcd(&den);
        let (num, _) = num.div_rem(&common)?;
        let (den, _) = den.div_rem(&common)?;
        let lead = Rational::from(den.leading().recip_ref());
        Some(Self {
            num: num.scale(&lead),
            den: den.scale(&lead),
        })
    }

    /// The constant function `c`.
    pub fn constant<T>(c: T) -> Self
    where
        Rational: From<T>,
    {
        Self::from(Polynomial::constant(c))
    }

    /// The identity function `x`.
    pub fn x() -> Self {
        Self::from(Polynomial::x())
    }

    /// Returns the numerator.
    pub fn numerator(&self) -> &Polynomial {
        &self.num
    }

    /// Returns the denominator.
    pub fn denominator(&self) -> &Polynomial {
        &self.den
    }

    /// Returns the function as a polynomial, if the denominator is constant.
    pub fn as_polynomial(&self) -> Option<&Polynomial> {
        self.den.as_constant().map(|_| &self.num)
    }

    /// Returns the value of the function if it is constant.
    pub fn as_constant(&self) -> Option<Rational> {
        self.as_polynomial().and_then(Polynomial::as_constant)
    }

    /// Returns true if this is the zero function.
    pub fn is_zero(&self) -> bool {
        self.num.is_zero()
    }

    /// Returns the larger of the degrees of the numerator and the denominator.
    pub fn degree(&self) -> usize {
        self.num.degree().unwrap_or(0).max(self.den.degree().unwrap_or(0))
    }

    /// Returns true if the second derivative of the function is identically zero. For a function
    /// in canonical form this means it is a polynomial of degree at most one.
    pub fn is_linear(&self) -> bool {
        self.as_polynomial().is_some_and(Polynomial::is_linear)
    }

    /// Divides `self` by `rhs`. Returns [`None`] if `rhs` is the zero function.
    pub fn checked_div(&self, rhs: &RationalFn) -> Option<Self> {
        Self::new(&self.num * &rhs.den, &self.den * &rhs.num)
    }

    /// Raises the function to an integer power. Negative powers take the reciprocal. Returns
    /// [`None`] if the function is zero and the power is negative.
    pub fn powi(&self, n: i64) -> Option<Self> {
        let magnitude = u32::try_from(n.unsigned_abs()).ok()?;
        if n >= 0 {
            Self::new(self.num.pow(magnitude), self.den.pow(magnitude))
        } else {
            Self::new(self.den.pow(magnitude), self.num.pow(magnitude))
        }
    }

    /// Evaluates the function exactly. Returns [`None`] at a pole.
    pub fn eval(&self, x: &Rational) -> Option<Rational> {
        let den = self.den.eval(x);
        if is_zero(&den) {
            None
        } else {
            Some(self.num.eval(x) / den)
        }
    }

    /// Evaluates the function in floating point. Returns [`None`] at a pole or if the result is
    /// not finite.
    pub fn eval_f64(&self, x: f64) -> Option<f64> {
        let value = self.num.eval_f64(x) / self.den.eval_f64(x);
        value.is_finite().then_some(value)
    }

    /// Returns the derivative, found with the quotient rule.
    pub fn derivative(&self) -> Self {
        let num = &(&self.num.derivative() * &self.den) - &(&self.num * &self.den.derivative());
        let den = &self.den * &self.den;
        // the square of a nonzero polynomial is nonzero
        Self::new(num, den).unwrap_or_else(|| Self::constant(0))
    }

    /// Returns the function `f(x + c)`.
    pub fn shift(&self, c: &Rational) -> Self {
        Self::new(self.num.shift(c), self.den.shift(c))
            .unwrap_or_else(|| self.clone())
    }

    /// Returns the real zeros of the function in ascending order, excluding the poles.
    pub fn real_zeros(&self, tolerance: f64) -> Vec<f64> {
        roots::real_roots(&self.num, tolerance)
            .into_iter()
            .filter(|&x| self.den.eval_f64(x) != 0.0)
            .collect()
    }

    /// Evaluates the definite integral of the function from `a` to `b`. Polynomials are
    /// integrated exactly with the power rule; anything else is integrated numerically.
    ///
    /// Returns [`None`] if the function is not finite somewhere on the interval.
    pub fn integral_f64(&self, a: f64, b: f64) -> Option<f64> {
        if let Some(poly) = self.as_polynomial() {
            return Some(poly.integral_f64(a, b));
        }

        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let pole_inside = self.den.as_constant().is_none()
            && roots::real_roots(&self.den, 1e-12).iter().any(|&x| x >= lo && x <= hi);
        if pole_inside {
            return None;
        }

        let value = quadrature::simpson(
            |x| self.eval_f64(x).unwrap_or(f64::NAN),
            a,
            b,
            SIMPSON_INTERVALS,
        );
        value.is_finite().then_some(value)
    }
}

impl From<Polynomial> for RationalFn {
    fn from(poly: Polynomial) -> Self {
        Self { num: poly, den: Polynomial::constant(1) }
    }
}

impl Add<&RationalFn> for &RationalFn {
    type Output = RationalFn;

    fn add(self, rhs: &RationalFn) -> RationalFn {
        let num = &(&self.num * &rhs.den) + &(&rhs.num * &self.den);
        RationalFn::new(num, &self.den * &rhs.den).unwrap_or_else(|| RationalFn::constant(0))
    }
}

impl Sub<&RationalFn> for &RationalFn {
    type Output = RationalFn;

    fn sub(self, rhs: &RationalFn) -> RationalFn {
        self + &-rhs
    }
}

impl Mul<&RationalFn> for &RationalFn {
    type Output = RationalFn;

    fn mul(self, rhs: &RationalFn) -> RationalFn {
        RationalFn::new(&self.num * &rhs.num, &self.den * &rhs.den)
            .unwrap_or_else(|| RationalFn::constant(0))
    }
}

impl Neg for &RationalFn {
    type Output = RationalFn;

    fn neg(self) -> RationalFn {
        RationalFn { num: -&self.num, den: self.den.clone() }
    }
}

/// Displays a [`RationalFn`] using the given variable name.
pub struct RationalFnDisplay<'a> {
    func: &'a RationalFn,
    var: &'a str,
}

impl RationalFn {
    /// Returns a value that displays the function using the given variable name.
    pub fn display<'a>(&'a self, var: &'a str) -> RationalFnDisplay<'a> {
        RationalFnDisplay { func: self, var }
    }
}

impl fmt::Display for RationalFnDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.func.den.as_constant() {
            Some(c) if c == 1 => write!(f, "{}", self.func.num.display(self.var)),
            Some(c) => {
                write!(f, "({}) / ", self.func.num.display(self.var))?;
                fmt_rational(f, &c)
            },
            None => write!(
                f,
                "({}) / ({})",
                self.func.num.display(self.var),
                self.func.den.display(self.var),
            ),
        }
    }
}

impl fmt::Display for RationalFn {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.display("x").fmt(f)
    }
}
