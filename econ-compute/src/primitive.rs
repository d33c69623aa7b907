//! Functions to construct [`Integer`]s and [`Rational`]s from various types.

use rug::{ops::Pow, Integer, Rational};

/// Creates an [`Integer`] with the given value.
pub fn int<T>(n: T) -> Integer
where
    Integer: From<T>,
{
    Integer::from(n)
}

/// Creates a [`Rational`] with the given value.
pub fn rational<T>(n: T) -> Rational
where
    Rational: From<T>,
{
    Rational::from(n)
}

/// Returns true if the given rational is zero.
pub fn is_zero(r: &Rational) -> bool {
    r.cmp0().is_eq()
}

/// Parses a decimal number literal, such as `25`, `1.8`, `3.` or `.5`, into an exact
/// [`Rational`]. Returns [`None`] if the string is not a decimal literal.
///
/// `1.8` becomes exactly `9/5`, not the nearest binary floating point value.
pub fn rational_from_str(s: &str) -> Option<Rational> {
    let (whole, frac) = s.split_once('.').unwrap_or((s, ""));
    if whole.is_empty() && frac.is_empty() {
        return None;
    }
    if !whole.chars().chain(frac.chars()).all(|c| c.is_ascii_digit()) {
        return None;
    }

    let digits = format!("{}{}", whole, frac);
    let numer = Integer::from_str_radix(&digits, 10).ok()?;
    let denom = int(10).pow(frac.len() as u32);
    Some(Rational::from((numer, denom)))
}

/// Converts an [`f64`] into the exact [`Rational`] with the same value. Returns [`None`] for NaN
/// and the infinities.
pub fn rational_from_f64(f: f64) -> Option<Rational> {
    Rational::from_f64(f)
}

/// Attempts to convert an integral [`Rational`] into an [`i64`].
pub fn to_i64(r: &Rational) -> Option<i64> {
    if *r.denom() == 1 {
        r.numer().to_i64()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_literals_are_exact() {
        assert_eq!(rational_from_str("1.8"), Some(rational((9, 5))));
        assert_eq!(rational_from_str(".5"), Some(rational((1, 2))));
        assert_eq!(rational_from_str("3."), Some(rational(3)));
        assert_eq!(rational_from_str("3040"), Some(rational(3040)));
        assert_eq!(rational_from_str("0.125"), Some(rational((1, 8))));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(rational_from_str("."), None);
        assert_eq!(rational_from_str("1.2.3"), None);
        assert_eq!(rational_from_str("P"), None);
    }

    #[test]
    fn integral_rationals() {
        assert_eq!(to_i64(&rational(-4)), Some(-4));
        assert_eq!(to_i64(&rational((1, 2))), None);
    }
}
