use crate::primitive::{is_zero, rational};
use rug::Rational;
use std::{fmt, ops::{Add, Mul, Neg, Sub}};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A polynomial in one variable with exact rational coefficients.
///
/// Coefficients are stored densely in ascending order of degree, so `coeffs[i]` is the
/// coefficient of `x^i`. Trailing zero coefficients are always trimmed, which makes the zero
/// polynomial the empty vector and lets [`PartialEq`] compare polynomials structurally.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Polynomial {
    coeffs: Vec<Rational>,
}

impl Polynomial {
    /// Creates a polynomial from coefficients in ascending order of degree.
    pub fn new(coeffs: Vec<Rational>) -> Self {
        let mut poly = Self { coeffs };
        poly.trim();
        poly
    }

    /// The zero polynomial.
    pub fn zero() -> Self {
        Self { coeffs: Vec::new() }
    }

    /// The constant polynomial `c`.
    pub fn constant<T>(c: T) -> Self
    where
        Rational: From<T>,
    {
        Self::new(vec![Rational::from(c)])
    }

    /// The polynomial `x`.
    pub fn x() -> Self {
        Self::new(vec![rational(0), rational(1)])
    }

    /// The monomial `c * x^n`.
    pub fn monomial(c: Rational, n: usize) -> Self {
        let mut coeffs = vec![Rational::new(); n];
        coeffs.push(c);
        Self::new(coeffs)
    }

    fn trim(&mut self) {
        while self.coeffs.last().is_some_and(is_zero) {
            self.coeffs.pop();
        }
    }

    /// Returns the coefficients in ascending order of degree.
    pub fn coeffs(&self) -> &[Rational] {
        &self.coeffs
    }

    /// Returns the coefficient of `x^n`, which is zero past the degree of the polynomial.
    pub fn coeff(&self, n: usize) -> Rational {
        self.coeffs.get(n).cloned().unwrap_or_default()
    }

    /// Returns the degree of the polynomial, or [`None`] for the zero polynomial.
    pub fn degree(&self) -> Option<usize> {
        self.coeffs.len().checked_sub(1)
    }

    /// Returns true if this is the zero polynomial.
    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// Returns the value of the polynomial if it is constant.
    pub fn as_constant(&self) -> Option<Rational> {
        match self.degree() {
            None => Some(Rational::new()),
            Some(0) => Some(self.coeffs[0].clone()),
            Some(_) => None,
        }
    }

    /// Returns the leading coefficient, or zero for the zero polynomial.
    pub fn leading(&self) -> Rational {
        self.coeffs.last().cloned().unwrap_or_default()
    }

    /// Returns true if the second derivative of the polynomial is identically zero.
    pub fn is_linear(&self) -> bool {
        self.derivative().derivative().is_zero()
    }

    /// Multiplies every coefficient by `k`.
    pub fn scale(&self, k: &Rational) -> Self {
        Self::new(self.coeffs.iter().map(|c| Rational::from(c * k)).collect())
    }

    /// Raises the polynomial to the `n`th power by repeated squaring.
    pub fn pow(&self, mut n: u32) -> Self {
        let mut base = self.clone();
        let mut result = Self::constant(1);
        while n > 0 {
            if n & 1 == 1 {
                result = &result * &base;
            }
            base = &base * &base;
            n >>= 1;
        }
        result
    }

    /// Evaluates the polynomial exactly using Horner's method.
    pub fn eval(&self, x: &Rational) -> Rational {
        self.coeffs.iter().rev().fold(Rational::new(), |acc, c| acc * x + c)
    }

    /// Evaluates the polynomial in floating point using Horner's method.
    pub fn eval_f64(&self, x: f64) -> f64 {
        self.coeffs.iter().rev().fold(0.0, |acc, c| acc * x + c.to_f64())
    }

    /// Returns the derivative of the polynomial.
    pub fn derivative(&self) -> Self {
        Self::new(
            self.coeffs
                .iter()
                .enumerate()
                .skip(1)
                .map(|(n, c)| Rational::from(c * n as u32))
                .collect(),
        )
    }

    /// Returns the antiderivative of the polynomial with a zero constant term, found with the
    /// power rule.
    pub fn antiderivative(&self) -> Self {
        let mut coeffs = Vec::with_capacity(self.coeffs.len() + 1);
        coeffs.push(Rational::new());
        coeffs.extend(
            self.coeffs
                .iter()
                .enumerate()
                .map(|(n, c)| Rational::from(c / (n as u32 + 1))),
        );
        Self::new(coeffs)
    }

    /// Evaluates the definite integral of the polynomial from `a` to `b` exactly.
    pub fn integral(&self, a: &Rational, b: &Rational) -> Rational {
        let anti = self.antiderivative();
        anti.eval(b) - anti.eval(a)
    }

    /// Evaluates the definite integral of the polynomial from `a` to `b` in floating point.
    pub fn integral_f64(&self, a: f64, b: f64) -> f64 {
        let anti = self.antiderivative();
        anti.eval_f64(b) - anti.eval_f64(a)
    }

    /// Returns the polynomial `p(x + c)`, the Taylor shift of `p` by `c`.
    pub fn shift(&self, c: &Rational) -> Self {
        let inner = Self::new(vec![c.clone(), rational(1)]);
        self.compose(&inner)
    }

    /// Returns the composition `p(q(x))`.
    pub fn compose(&self, inner: &Polynomial) -> Self {
        self.coeffs.iter().rev().fold(Self::zero(), |acc, c| {
            &(&acc * inner) + &Self::constant(c)
        })
    }

    /// Divides `self` by `divisor`, returning the quotient and remainder. Returns [`None`] if the
    /// divisor is the zero polynomial.
    pub fn div_rem(&self, divisor: &Polynomial) -> Option<(Polynomial, Polynomial)> {
        let divisor_degree = divisor.degree()?;
        let lead = divisor.leading();
        let mut remainder = self.coeffs.clone();
        let mut quotient = vec![Rational::new(); self.coeffs.len().saturating_sub(divisor_degree)];

        while remainder.len() > divisor_degree {
            let shift = remainder.len() - 1 - divisor_degree;
            let factor = Rational::from(remainder[remainder.len() - 1].clone() / &lead);
            for (i, c) in divisor.coeffs.iter().enumerate() {
                remainder[shift + i] -= Rational::from(&factor * c);
            }
            quotient[shift] = factor;
            remainder.pop();
            while remainder.last().is_some_and(is_zero) {
                remainder.pop();
            }
        }

        Some((Self::new(quotient), Self::new(remainder)))
    }

    /// Returns the monic greatest common divisor of two polynomials, or the zero polynomial if
    /// both are zero.
    pub fn gcd(&self, other: &Polynomial) -> Self {
        let (mut a, mut b) = (self.clone(), other.clone());
        while let Some((_, r)) = a.div_rem(&b) {
            a = b;
            b = r;
        }

        match a.degree() {
            None => a,
            Some(_) => {
                let lead = a.leading();
                a.scale(&Rational::from(lead.recip_ref()))
            },
        }
    }

    /// Returns the coefficients converted to [`f64`].
    pub fn to_f64_coeffs(&self) -> Vec<f64> {
        self.coeffs.iter().map(Rational::to_f64).collect()
    }

    /// Returns a value that displays the polynomial using the given variable name.
    pub fn display<'a>(&'a self, var: &'a str) -> PolyDisplay<'a> {
        PolyDisplay { poly: self, var }
    }
}

impl Add<&Polynomial> for &Polynomial {
    type Output = Polynomial;

    fn add(self, rhs: &Polynomial) -> Polynomial {
        let len = self.coeffs.len().max(rhs.coeffs.len());
        Polynomial::new((0..len).map(|i| self.coeff(i) + rhs.coeff(i)).collect())
    }
}

impl Sub<&Polynomial> for &Polynomial {
    type Output = Polynomial;

    fn sub(self, rhs: &Polynomial) -> Polynomial {
        let len = self.coeffs.len().max(rhs.coeffs.len());
        Polynomial::new((0..len).map(|i| self.coeff(i) - rhs.coeff(i)).collect())
    }
}

impl Mul<&Polynomial> for &Polynomial {
    type Output = Polynomial;

    fn mul(self, rhs: &Polynomial) -> Polynomial {
        if self.is_zero() || rhs.is_zero() {
            return Polynomial::zero();
        }

        let mut coeffs = vec![Rational::new(); self.coeffs.len() + rhs.coeffs.len() - 1];
        for (i, a) in self.coeffs.iter().enumerate() {
            for (j, b) in rhs.coeffs.iter().enumerate() {
                coeffs[i + j] += Rational::from(a * b);
            }
        }
        Polynomial::new(coeffs)
    }
}

impl Neg for &Polynomial {
    type Output = Polynomial;

    fn neg(self) -> Polynomial {
        Polynomial::new(self.coeffs.iter().map(|c| Rational::from(-c)).collect())
    }
}

/// Formats a rational coefficient: integers as integers, anything else as a decimal.
pub(crate) fn fmt_rational(f: &mut fmt::Formatter, r: &Rational) -> fmt::Result {
    if *r.denom() == 1 {
        write!(f, "{}", r.numer())
    } else {
        write!(f, "{}", r.to_f64())
    }
}

/// Displays a [`Polynomial`] in ascending order of degree, such as `3040 - 25P`.
pub struct PolyDisplay<'a> {
    poly: &'a Polynomial,
    var: &'a str,
}

impl fmt::Display for PolyDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.poly.is_zero() {
            return write!(f, "0");
        }

        let mut first = true;
        for (n, c) in self.poly.coeffs.iter().enumerate() {
            if is_zero(c) {
                continue;
            }

            let negative = c.cmp0().is_lt();
            match (first, negative) {
                (true, true) => write!(f, "-")?,
                (true, false) => (),
                (false, true) => write!(f, " - ")?,
                (false, false) => write!(f, " + ")?,
            }
            first = false;

            let abs = Rational::from(c.abs_ref());
            if n == 0 || abs != 1 {
                fmt_rational(f, &abs)?;
            }
            match n {
                0 => (),
                1 => write!(f, "{}", self.var)?,
                _ => write!(f, "{}^{}", self.var, n)?,
            }
        }
        Ok(())
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.display("x").fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn poly(coeffs: &[i64]) -> Polynomial {
        Polynomial::new(coeffs.iter().map(|&c| rational(c)).collect())
    }

    #[test]
    fn trims_trailing_zeros() {
        assert_eq!(poly(&[1, 2, 0, 0]).degree(), Some(1));
        assert_eq!(poly(&[0, 0]), Polynomial::zero());
        assert_eq!(Polynomial::zero().degree(), None);
    }

    #[test]
    fn arithmetic() {
        let a = poly(&[1, 1]);
        let b = poly(&[-1, 1]);
        assert_eq!(&a * &b, poly(&[-1, 0, 1]));
        assert_eq!(&a + &b, poly(&[0, 2]));
        assert_eq!(&a - &a, Polynomial::zero());
        assert_eq!(a.pow(3), poly(&[1, 3, 3, 1]));
    }

    #[test]
    fn evaluation() {
        let p = poly(&[3040, -25]);
        assert_eq!(p.eval(&rational(100)), rational(540));
        assert_eq!(p.eval_f64(100.0), 540.0);
    }

    #[test]
    fn calculus() {
        let p = poly(&[1, 2, 3]);
        assert_eq!(p.derivative(), poly(&[2, 6]));
        assert_eq!(p.antiderivative(), poly(&[0, 1, 1, 1]));
        assert_eq!(p.integral(&rational(0), &rational(2)), rational(14));
    }

    #[test]
    fn linearity() {
        assert!(poly(&[4, -2]).is_linear());
        assert!(poly(&[4]).is_linear());
        assert!(!poly(&[0, 59, -3]).is_linear());
    }

    #[test]
    fn taylor_shift() {
        // (x + 2)^2 = x^2 + 4x + 4
        assert_eq!(poly(&[0, 0, 1]).shift(&rational(2)), poly(&[4, 4, 1]));
    }

    #[test]
    fn division() {
        let (q, r) = poly(&[-1, 0, 1]).div_rem(&poly(&[-1, 1])).unwrap();
        assert_eq!(q, poly(&[1, 1]));
        assert_eq!(r, Polynomial::zero());

        let (q, r) = poly(&[1, 0, 1]).div_rem(&poly(&[0, 2])).unwrap();
        assert_eq!(q, Polynomial::new(vec![rational(0), rational((1, 2))]));
        assert_eq!(r, poly(&[1]));

        assert!(poly(&[1]).div_rem(&Polynomial::zero()).is_none());
    }

    #[test]
    fn gcd_is_monic() {
        let a = poly(&[-2, 0, 2]);
        let b = poly(&[3, 3]);
        assert_eq!(a.gcd(&b), poly(&[1, 1]));
    }

    #[test]
    fn display() {
        assert_eq!(poly(&[3040, -25]).display("P").to_string(), "3040 - 25P");
        assert_eq!(poly(&[0, -1, 3]).display("P").to_string(), "-P + 3P^2");
        let decimal = Polynomial::new(vec![rational((9, 5)), rational(9)]);
        assert_eq!(decimal.display("P").to_string(), "1.8 + 9P");
    }
}
